//! Advisory assessment: every placement check, none of them fatal.
//!
//! This is the pre-flight view of a topology. Where [`plan`](crate::plan)
//! stops at the first node that cannot carry its tier's workload, `assess`
//! records it and keeps going so the operator sees every problem at once.

use serde::Serialize;
use tierplan_core::{FlavorRole, QuotaLimits};
use tierplan_state::TopologyStore;
use tracing::debug;

use crate::advisory::{Advisory, AdvisoryCategory};
use crate::networks::check_required_networks;
use crate::placer::{ControlHostSelection, select_control_host, verify_node};
use crate::quota::{QuotaRequirement, check_quotas, platform_resource_requirement};

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub control_host: ControlHostSelection,
    pub requirement: QuotaRequirement,
    pub advisories: Vec<Advisory>,
}

impl Assessment {
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Run control-host selection, node verification, network and (optionally)
/// quota checks, collecting every finding as an advisory.
pub fn assess(store: &mut TopologyStore, limits: Option<&QuotaLimits>) -> Assessment {
    let mut advisories = Vec::new();

    let control_host = select_control_host(store);
    if let Some(miss) = control_host.miss() {
        advisories.push(Advisory::new(AdvisoryCategory::ComputeNode, miss.to_string()));
    }
    advisories.extend(verify_nodes_advisory(store));
    advisories.extend(check_required_networks(store));

    let requirement = platform_resource_requirement(store);
    if let Some(limits) = limits {
        advisories.extend(check_quotas(&requirement, limits));
    }

    debug!(findings = advisories.len(), "topology assessed");
    Assessment {
        control_host,
        requirement,
        advisories,
    }
}

/// Verify every non-control node, reporting each failure instead of
/// stopping at the first.
fn verify_nodes_advisory(store: &mut TopologyStore) -> Vec<Advisory> {
    let sr = store.flavors.resources(FlavorRole::Sr);
    store
        .computes
        .iter_mut()
        .filter(|c| !c.is_ctrl_host)
        .filter_map(|info| verify_node(info, sr).err())
        .map(|e| Advisory::new(AdvisoryCategory::ComputeNode, e.to_string()))
        .collect()
}
