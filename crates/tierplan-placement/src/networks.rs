//! Required network categories per tier.

use tierplan_core::{NetworkCategory, Tier};
use tierplan_state::{ComputeInfo, TopologyStore};

use crate::advisory::{Advisory, AdvisoryCategory};
use crate::placer::has_multiple_data_centres;

use NetworkCategory::*;

const DC_FULL: &[NetworkCategory] = &[Data, Wan, SdnCtrl, Mgmt, Msp, Ps, ClmcSfemc, Sia, Cluster];
const DC_CONTROL: &[NetworkCategory] = &[Data, Wan, SdnCtrl, Mgmt, Msp, Ps, ClmcSfemc, Sia];
const SR_CLUSTER: &[NetworkCategory] = &[Data, SdnCtrl, Mgmt, Cluster];
const FAR_EDGE: &[NetworkCategory] = &[Data, SdnCtrl, Mgmt, Cluster, Access];
const MIST: &[NetworkCategory] = &[Data, Mgmt, SdnCtrl, Access];

/// Categories a node must have attached, given what it will host.
///
/// A lone DC node carries the bundle and a cluster; with several DCs the
/// control host drops the cluster network and the others only need what a
/// router-plus-cluster needs.
pub fn required_networks(info: &ComputeInfo, single_dc: bool) -> &'static [NetworkCategory] {
    match info.tier() {
        Tier::DataCentre if single_dc => DC_FULL,
        Tier::DataCentre if info.is_ctrl_host => DC_CONTROL,
        Tier::DataCentre | Tier::Edge => SR_CLUSTER,
        Tier::FarEdge => FAR_EDGE,
        Tier::Mist => MIST,
    }
}

/// One advisory per missing category per node, in store order.
pub fn check_required_networks(store: &TopologyStore) -> Vec<Advisory> {
    let single_dc = !has_multiple_data_centres(store);
    store
        .computes
        .iter()
        .flat_map(|info| {
            required_networks(info, single_dc)
                .iter()
                .filter(move |cat| !info.networks.has(**cat))
                .map(move |cat| {
                    Advisory::new(
                        AdvisoryCategory::Networks,
                        format!(
                            "network of category {cat} is not attached to {} type node {}",
                            info.tier(),
                            info.name()
                        ),
                    )
                })
        })
        .collect()
}
