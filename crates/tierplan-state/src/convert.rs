//! Ingestion: [`InfraDescriptor`] → [`TopologyStore`].
//!
//! Every check the planner relies on happens here: tiers and categories
//! resolve to known values, compute nodes reference declared networks, the
//! CIDR parses, sizes and the DHCP agent count are in range, and the flavor
//! catalog is complete.

use std::collections::{BTreeMap, HashMap, HashSet};

use ipnet::Ipv4Net;
use tierplan_core::config::CategorisedConfig;
use tierplan_core::{InfraDescriptor, MAX_DHCP_AGENTS, NetworkCategory, Resources, Tier};
use tracing::debug;

use crate::catalog::FlavorCatalog;
use crate::error::{StateError, StateResult};
use crate::types::*;

impl TopologyStore {
    /// Build a topology store from a parsed infra descriptor.
    pub fn from_descriptor(descriptor: &InfraDescriptor) -> StateResult<Self> {
        if descriptor.compute_nodes.is_empty() {
            return Err(StateError::Incomplete("compute_nodes"));
        }
        if descriptor.networks.is_empty() {
            return Err(StateError::Incomplete("networks"));
        }

        let mut network_categories: HashMap<&str, NetworkCategory> = HashMap::new();
        for net in &descriptor.networks {
            network_categories.insert(net.identifier.as_str(), net.category.parse()?);
        }

        let mut seen = HashSet::new();
        let mut computes = Vec::with_capacity(descriptor.compute_nodes.len());
        for cn in &descriptor.compute_nodes {
            if !seen.insert((cn.name.as_str(), cn.availability_zone.as_str())) {
                return Err(StateError::DuplicateNode {
                    name: cn.name.clone(),
                    zone: cn.availability_zone.clone(),
                });
            }
            if cn.networks.is_empty() {
                return Err(StateError::NoNetworks(cn.name.clone()));
            }

            let mut networks = NetworkAttachment::new();
            for id in &cn.networks {
                let category = network_categories.get(id.as_str()).ok_or_else(|| {
                    StateError::UnknownNetwork {
                        node: cn.name.clone(),
                        network: id.clone(),
                    }
                })?;
                networks.attach(*category, id.clone());
            }

            let node = ComputeNode {
                name: cn.name.clone(),
                availability_zone: cn.availability_zone.clone(),
                tier: cn.tier.parse::<Tier>()?,
                capacity: plausible(
                    Resources::new(cn.vcpus, cn.ram, cn.disk),
                    || format!("compute node '{}'", cn.name),
                )?,
            };
            debug!(node = %node.name, tier = %node.tier, ?networks, "compute node ingested");
            computes.push(ComputeInfo::new(node, networks));
        }

        let meta = &descriptor.metadata;
        let cidr: Ipv4Net = meta.cidr.parse().map_err(|e: ipnet::AddrParseError| {
            StateError::InvalidCidr {
                cidr: meta.cidr.clone(),
                reason: e.to_string(),
            }
        })?;

        if meta.dhcp_agents > MAX_DHCP_AGENTS {
            return Err(StateError::DhcpAgentsOutOfRange {
                value: meta.dhcp_agents,
                max: MAX_DHCP_AGENTS,
            });
        }

        let flavors = descriptor
            .flavors
            .iter()
            .map(|f| {
                let resources = plausible(Resources::new(f.vcpus, f.ram, f.disk), || {
                    format!("flavor '{}'", f.name)
                })?;
                Ok(Flavor::new(f.name.clone(), resources))
            })
            .collect::<StateResult<Vec<_>>>()?;
        let flavors = FlavorCatalog::from_flavors(flavors)?;

        Ok(TopologyStore {
            computes,
            subnets: by_category(&descriptor.subnets)?,
            security_groups: by_category(&descriptor.security_groups)?,
            infra_services: InfraServices {
                dns: descriptor.infrastructure_services.dns.clone(),
                sdn_controller: descriptor.infrastructure_services.sdn_controller.clone(),
            },
            metadata: PlatformMetadata {
                tenant_id: meta.tenant.clone(),
                cidr,
                mtu: meta.mtu,
                dhcp_agents: meta.dhcp_agents,
                enable_ipv4_rules: meta.ipv4_rules,
                sia_ip_frontend: meta.sia_ip_frontend.clone(),
                parent_domain: meta.parent_domain.clone(),
            },
            flavors,
        })
    }
}

fn plausible(resources: Resources, what: impl FnOnce() -> String) -> StateResult<Resources> {
    if resources.is_plausible() {
        Ok(resources)
    } else {
        Err(StateError::ImplausibleResources { what: what(), resources })
    }
}

/// Index identifiers by category. A later entry replaces an earlier one.
fn by_category(entries: &[CategorisedConfig]) -> StateResult<BTreeMap<NetworkCategory, String>> {
    let mut map = BTreeMap::new();
    for entry in entries {
        map.insert(entry.category.parse()?, entry.identifier.clone());
    }
    Ok(map)
}
