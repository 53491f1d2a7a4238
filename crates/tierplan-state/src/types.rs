//! Domain types for the tierplan topology store.

use std::collections::BTreeMap;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use tierplan_core::{NetworkCategory, Resources, Tier};

use crate::catalog::FlavorCatalog;

// ── Compute ───────────────────────────────────────────────────────

/// A physical or virtual compute node. Identity is `(name, availability_zone)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeNode {
    pub name: String,
    pub availability_zone: String,
    pub tier: Tier,
    pub capacity: Resources,
}

impl ComputeNode {
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.availability_zone)
    }
}

/// Networks attached to a node, grouped by category.
///
/// Within a category the identifiers keep attachment order; index 0 is the
/// network used wherever a single network of that category is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    by_category: BTreeMap<NetworkCategory, Vec<String>>,
}

impl NetworkAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, category: NetworkCategory, identifier: impl Into<String>) {
        self.by_category.entry(category).or_default().push(identifier.into());
    }

    /// Builder form of [`attach`](Self::attach).
    pub fn with(mut self, category: NetworkCategory, identifier: impl Into<String>) -> Self {
        self.attach(category, identifier);
        self
    }

    /// The first network of a category, if any.
    pub fn first(&self, category: NetworkCategory) -> Option<&str> {
        self.all(category).first().map(String::as_str)
    }

    pub fn all(&self, category: NetworkCategory) -> &[String] {
        self.by_category.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, category: NetworkCategory) -> bool {
        !self.all(category).is_empty()
    }

    /// Access networks, one per point of attachment.
    pub fn access(&self) -> &[String] {
        self.all(NetworkCategory::Access)
    }
}

/// A compute node plus everything the planner derives for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeInfo {
    pub node: ComputeNode,
    pub networks: NetworkAttachment,
    /// Set on the single node chosen to host the control bundle.
    pub is_ctrl_host: bool,
    /// Leftover capacity for this node's cluster flavor. Zero until placed.
    pub cluster_res: Resources,
}

impl ComputeInfo {
    pub fn new(node: ComputeNode, networks: NetworkAttachment) -> Self {
        Self {
            node,
            networks,
            is_ctrl_host: false,
            cluster_res: Resources::ZERO,
        }
    }

    pub fn tier(&self) -> Tier {
        self.node.tier
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn access_count(&self) -> usize {
        self.networks.access().len()
    }
}

// ── Flavor ────────────────────────────────────────────────────────

/// A named resource template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub name: String,
    pub resources: Resources,
}

impl Flavor {
    pub fn new(name: impl Into<String>, resources: Resources) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }
}

// ── Store metadata ────────────────────────────────────────────────

/// Endpoints of infrastructure services the platform relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraServices {
    pub dns: Option<String>,
    pub sdn_controller: Option<String>,
}

/// Scalar platform configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMetadata {
    pub tenant_id: String,
    pub cidr: Ipv4Net,
    pub mtu: u32,
    pub dhcp_agents: u32,
    pub enable_ipv4_rules: bool,
    pub sia_ip_frontend: Option<String>,
    pub parent_domain: String,
}

/// Everything one planning run needs, loaded up front.
///
/// `computes` keeps ingestion order; that order decides descriptor naming,
/// block order, and which DC node wins a control-host tie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyStore {
    pub computes: Vec<ComputeInfo>,
    pub subnets: BTreeMap<NetworkCategory, String>,
    pub security_groups: BTreeMap<NetworkCategory, String>,
    pub infra_services: InfraServices,
    pub metadata: PlatformMetadata,
    pub flavors: FlavorCatalog,
}

impl TopologyStore {
    pub fn security_group(&self, category: NetworkCategory) -> Option<&str> {
        self.security_groups
            .get(&category)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn subnet(&self, category: NetworkCategory) -> Option<&str> {
        self.subnets
            .get(&category)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Index of the node marked as control host, if any.
    pub fn ctrl_host_index(&self) -> Option<usize> {
        self.computes.iter().position(|c| c.is_ctrl_host)
    }

    pub fn count_tier(&self, tier: Tier) -> usize {
        self.computes.iter().filter(|c| c.tier() == tier).count()
    }
}
