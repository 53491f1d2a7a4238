//! Placement engine: control-host selection and per-tier capacity checks.
//!
//! Placement runs in two passes over the store, in store order:
//! 1. [`select_control_host`] picks the one DC node that carries the
//!    control bundle (and, with a single DC, a router plus a cluster)
//! 2. [`verify_all_other_nodes`] checks every remaining node against its
//!    tier's minimum and sizes its cluster capacity
//!
//! Only `is_ctrl_host` and `cluster_res` are written back to the store.

use serde::Serialize;
use thiserror::Error;
use tierplan_core::{FlavorRole, MIN_CLUSTER, NetworkCategory, Resources, Tier};
use tierplan_state::{ComputeInfo, FlavorCatalog, TopologyStore};
use tracing::{debug, info};

use crate::error::{PlacementError, PlacementResult};

/// Why no control host could be chosen. Callers surface these as advisories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMiss {
    #[error("no compute node found associated with network type 'wan'")]
    NoWanDataCentre,

    #[error("no compute node found satisfying the resource requirements of the control functions")]
    NoCandidate,
}

/// Outcome of [`select_control_host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlHostSelection {
    Found(usize),
    NotFound(SelectionMiss),
}

impl ControlHostSelection {
    pub fn index(&self) -> Option<usize> {
        match self {
            ControlHostSelection::Found(i) => Some(*i),
            ControlHostSelection::NotFound(_) => None,
        }
    }

    /// Index to report when a miss is downgraded to an advisory: the chosen
    /// node, or the first node in the store.
    pub fn index_or_default(&self) -> usize {
        self.index().unwrap_or(0)
    }

    pub fn miss(&self) -> Option<SelectionMiss> {
        match self {
            ControlHostSelection::Found(_) => None,
            ControlHostSelection::NotFound(miss) => Some(*miss),
        }
    }
}

/// Result of a full placement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub control_host: ControlHostSelection,
    /// Exactly one `data_centre` node exists, so the control host also
    /// runs a router and a cluster.
    pub single_data_centre: bool,
}

/// True iff more than one node has tier `data_centre`.
pub fn has_multiple_data_centres(store: &TopologyStore) -> bool {
    store.count_tier(Tier::DataCentre) > 1
}

/// Resources consumed by the control bundle, which always runs two routers.
pub fn control_function_requirement(catalog: &FlavorCatalog) -> Resources {
    let bundle: Resources = [
        FlavorRole::Ps,
        FlavorRole::Pce,
        FlavorRole::Clmc,
        FlavorRole::Sfemc,
        FlavorRole::Frontend,
        FlavorRole::Moose,
        FlavorRole::Nm,
    ]
    .into_iter()
    .map(|role| catalog.resources(role))
    .sum();
    bundle + catalog.resources(FlavorRole::Sr).scaled(2)
}

/// Choose the node that hosts the control bundle and mark it.
///
/// Candidates are `data_centre` nodes with a `wan` network, scanned in store
/// order; the first whose capacity covers the requirement wins. When nothing
/// fits, the scan is retried once with the RAM requirement lowered by half of
/// the monitor flavor's RAM. Other dimensions are not relaxed.
pub fn select_control_host(store: &mut TopologyStore) -> ControlHostSelection {
    for info in &mut store.computes {
        info.is_ctrl_host = false;
    }

    let candidates: Vec<usize> = store
        .computes
        .iter()
        .enumerate()
        .filter(|(_, c)| c.tier() == Tier::DataCentre && c.networks.has(NetworkCategory::Wan))
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        debug!("no data_centre node with a wan network");
        return ControlHostSelection::NotFound(SelectionMiss::NoWanDataCentre);
    }

    let single_dc = !has_multiple_data_centres(store);
    let sr = store.flavors.resources(FlavorRole::Sr);
    let clmc_ram = store.flavors.resources(FlavorRole::Clmc).ram;

    let mut required = control_function_requirement(&store.flavors);
    if single_dc {
        required += sr + MIN_CLUSTER;
    }

    let mut winner = first_fit(&store.computes, &candidates, &required);
    if winner.is_none() {
        required.ram -= clmc_ram / 2;
        debug!(%required, "retrying control host selection with relaxed ram");
        winner = first_fit(&store.computes, &candidates, &required);
    }

    let Some(index) = winner else {
        debug!(%required, candidates = candidates.len(), "no candidate fits the control bundle");
        return ControlHostSelection::NotFound(SelectionMiss::NoCandidate);
    };

    let host = &mut store.computes[index];
    host.is_ctrl_host = true;
    if single_dc {
        // The cluster floor only gates admission; it is not reserved.
        host.cluster_res = Resources::available(host.node.capacity, required - MIN_CLUSTER);
    }
    info!(
        node = %host.node.name,
        zone = %host.node.availability_zone,
        single_dc,
        cluster_res = %host.cluster_res,
        "control host selected"
    );
    ControlHostSelection::Found(index)
}

fn first_fit(computes: &[ComputeInfo], candidates: &[usize], required: &Resources) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&i| required.fits_within(&computes[i].node.capacity))
}

/// Check every node other than the control host against its tier's minimum
/// and assign its cluster capacity. The first failure aborts the pass.
pub fn verify_all_other_nodes(store: &mut TopologyStore) -> PlacementResult<()> {
    let sr = store.flavors.resources(FlavorRole::Sr);
    for info in store.computes.iter_mut().filter(|c| !c.is_ctrl_host) {
        verify_node(info, sr)?;
    }
    Ok(())
}

/// Verify one non-control node and set its `cluster_res`. On failure the
/// node is left untouched.
pub(crate) fn verify_node(info: &mut ComputeInfo, sr: Resources) -> PlacementResult<()> {
    let capacity = info.node.capacity;
    match info.tier() {
        Tier::DataCentre | Tier::Edge => {
            ensure_fits(info, sr + MIN_CLUSTER)?;
            info.cluster_res = Resources::available(capacity, sr);
        }
        Tier::FarEdge => {
            let n = access_networks(info)?;
            let routers = sr.scaled(2 * n);
            ensure_fits(info, routers + MIN_CLUSTER.scaled(n))?;
            info.cluster_res = Resources::available(capacity, routers).scaled_down(n);
        }
        Tier::Mist => {
            let n = access_networks(info)?;
            ensure_fits(info, sr.scaled(n))?;
        }
    }
    debug!(
        node = %info.node.name,
        tier = %info.tier(),
        cluster_res = %info.cluster_res,
        "node verified"
    );
    Ok(())
}

fn access_networks(info: &ComputeInfo) -> PlacementResult<i64> {
    match info.access_count() {
        0 => Err(PlacementError::NoAccessNetwork {
            node: info.node.name.clone(),
            tier: info.tier(),
        }),
        n => Ok(n as i64),
    }
}

fn ensure_fits(info: &ComputeInfo, required: Resources) -> PlacementResult<()> {
    if required.fits_within(&info.node.capacity) {
        Ok(())
    } else {
        Err(PlacementError::InsufficientCapacity {
            node: info.node.name.clone(),
            tier: info.tier(),
            required,
            capacity: info.node.capacity,
        })
    }
}

/// Run both placement passes.
///
/// A missing control host is not an error here; the miss is carried in the
/// returned [`Placement`]. Node verification failures are.
pub fn plan(store: &mut TopologyStore) -> PlacementResult<Placement> {
    let control_host = select_control_host(store);
    verify_all_other_nodes(store)?;
    Ok(Placement {
        control_host,
        single_data_centre: !has_multiple_data_centres(store),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    const BIG: Resources = Resources::new(32, 65536, 500);

    #[test]
    fn control_requirement_counts_two_routers() {
        // six small roles, the monitor, two routers
        assert_eq!(control_function_requirement(&catalog()), Resources::new(12, 14336, 120));
    }

    #[test]
    fn single_dc_host_keeps_leftover_after_bundle_and_router() {
        let mut s = store(vec![dc_with_wan("dc1", BIG)]);
        assert_eq!(select_control_host(&mut s), ControlHostSelection::Found(0));

        let host = &s.computes[0];
        assert!(host.is_ctrl_host);
        // capacity - (bundle + one SR)
        assert_eq!(host.cluster_res, Resources::new(18, 49152, 360));
    }

    #[test]
    fn wan_node_wins_regardless_of_order() {
        let no_wan = node("dc0", Tier::DataCentre, BIG, &[(NetworkCategory::Data, "data-net")]);
        let mut s = store(vec![no_wan, dc_with_wan("dc1", BIG)]);
        assert_eq!(select_control_host(&mut s), ControlHostSelection::Found(1));
        assert!(!s.computes[0].is_ctrl_host);
        // multi-DC: control host gets no cluster
        assert_eq!(s.computes[1].cluster_res, Resources::ZERO);
    }

    #[test]
    fn first_fitting_candidate_in_store_order() {
        let mut s = store(vec![
            dc_with_wan("small", Resources::new(4, 4096, 40)),
            dc_with_wan("a", BIG),
            dc_with_wan("b", BIG),
        ]);
        assert_eq!(select_control_host(&mut s).index(), Some(1));
        assert_eq!(s.computes.iter().filter(|c| c.is_ctrl_host).count(), 1);
    }

    #[test]
    fn no_wan_is_reported_as_miss() {
        let mut s = store(vec![node("dc1", Tier::DataCentre, BIG, &[])]);
        let selection = select_control_host(&mut s);
        assert_eq!(selection.miss(), Some(SelectionMiss::NoWanDataCentre));
        assert_eq!(selection.index_or_default(), 0);
        assert!(s.ctrl_host_index().is_none());
    }

    #[test]
    fn relaxed_ram_retry_admits_tight_node() {
        // single DC needs 18432 MB; the retry lowers that by 2048
        let tight = Resources::new(16, 16384, 142);
        let mut s = store(vec![dc_with_wan("dc1", tight)]);
        assert_eq!(select_control_host(&mut s), ControlHostSelection::Found(0));
        // leftover uses the relaxed requirement
        assert_eq!(s.computes[0].cluster_res, Resources::new(2, 2048, 2));
    }

    #[test]
    fn retry_does_not_relax_cpu() {
        let mut s = store(vec![dc_with_wan("dc1", Resources::new(15, 65536, 500))]);
        assert_eq!(
            select_control_host(&mut s),
            ControlHostSelection::NotFound(SelectionMiss::NoCandidate)
        );
    }

    #[test]
    fn reselection_clears_previous_host() {
        let mut s = store(vec![dc_with_wan("a", BIG), dc_with_wan("b", BIG)]);
        s.computes[1].is_ctrl_host = true;
        select_control_host(&mut s);
        assert!(s.computes[0].is_ctrl_host);
        assert!(!s.computes[1].is_ctrl_host);
    }

    #[test]
    fn edge_node_keeps_capacity_minus_router() {
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("e1", Tier::Edge, Resources::new(8, 8192, 80), &[]),
        ]);
        plan(&mut s).unwrap();
        assert_eq!(s.computes[1].cluster_res, Resources::new(6, 6144, 60));
    }

    #[test]
    fn far_edge_splits_leftover_per_access_network() {
        let access = [
            (NetworkCategory::Access, "acc-1"),
            (NetworkCategory::Access, "acc-2"),
            (NetworkCategory::Access, "acc-3"),
        ];
        // 3 x 2 x SR = (12, 12288, 120); 3 x floor = (6, 6144, 6)
        let capacity = Resources::new(21, 21000, 150);
        let mut s = store(vec![dc_with_wan("dc1", BIG), node("fe1", Tier::FarEdge, capacity, &access)]);
        plan(&mut s).unwrap();
        assert_eq!(s.computes[1].cluster_res, Resources::new(3, 2904, 10));
    }

    #[test]
    fn far_edge_short_on_capacity_fails() {
        let access = [(NetworkCategory::Access, "acc-1"), (NetworkCategory::Access, "acc-2")];
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("fe1", Tier::FarEdge, Resources::new(8, 65536, 500), &access),
        ]);
        let err = plan(&mut s).unwrap_err();
        assert!(matches!(err, PlacementError::InsufficientCapacity { ref node, .. } if node == "fe1"));
    }

    #[test]
    fn mist_without_access_network_is_fatal() {
        let mut s = store(vec![dc_with_wan("dc1", BIG), node("m1", Tier::Mist, BIG, &[])]);
        let err = plan(&mut s).unwrap_err();
        assert_eq!(
            err,
            PlacementError::NoAccessNetwork { node: "m1".to_string(), tier: Tier::Mist }
        );
        assert_eq!(err.to_string(), "no access network attached to mist compute node 'm1'");
    }

    #[test]
    fn mist_gets_no_cluster() {
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("m1", Tier::Mist, Resources::new(4, 4096, 40), &[(NetworkCategory::Access, "acc-1")]),
        ]);
        plan(&mut s).unwrap();
        assert_eq!(s.computes[1].cluster_res, Resources::ZERO);
    }

    #[test]
    fn undersized_secondary_dc_is_fatal() {
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("dc2", Tier::DataCentre, Resources::new(3, 8192, 80), &[]),
        ]);
        let err = plan(&mut s).unwrap_err();
        assert!(err.to_string().starts_with(
            "min. resources required are not available on data_centre compute node 'dc2'"
        ));
    }

    #[test]
    fn plan_reports_single_dc_and_miss() {
        let mut s = store(vec![node("dc1", Tier::DataCentre, BIG, &[])]);
        let placement = plan(&mut s).unwrap();
        assert!(placement.single_data_centre);
        assert_eq!(
            placement.control_host,
            ControlHostSelection::NotFound(SelectionMiss::NoWanDataCentre)
        );
        // without a control host the DC node is verified like any other
        assert_eq!(s.computes[0].cluster_res, Resources::new(30, 63488, 480));
    }

    #[test]
    fn verified_cluster_capacity_is_non_negative() {
        let access = [(NetworkCategory::Access, "acc-1")];
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("e1", Tier::Edge, Resources::new(4, 4096, 22), &[]),
            node("fe1", Tier::FarEdge, Resources::new(6, 6144, 42), &access),
        ]);
        plan(&mut s).unwrap();
        assert!(s.computes.iter().all(|c| c.cluster_res.is_non_negative()));
    }
}
