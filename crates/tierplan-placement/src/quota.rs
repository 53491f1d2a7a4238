//! Platform-wide resource demand, for comparison against a tenant quota.
//!
//! Demand is summed per node in units of work. Each unit carries its own
//! instance, port, and subnet counts; cores and RAM come from the flavor
//! catalog plus whatever cluster capacity placement assigned to the node.

use serde::Serialize;
use tierplan_core::{FlavorRole, QuotaLimits, Resources, Tier};
use tierplan_state::TopologyStore;
use tracing::debug;

use crate::advisory::{Advisory, AdvisoryCategory};
use crate::placer::{control_function_requirement, has_multiple_data_centres};

/// Subnets created during infrastructure setup (sia, wan, mgmt, sdnctrl).
pub const FIXED_SUBNETS: i64 = 4;
/// Security groups the platform expects (mgmt, msp, sdnctrl, sia, wan).
pub const FIXED_SECURITY_GROUPS: i64 = 5;
pub const FIXED_SECURITY_GROUP_RULES: i64 = 17;

/// Aggregate demand of one platform deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuotaRequirement {
    pub cores: i64,
    pub ram: i64,
    pub instances: i64,
    pub ports: i64,
    pub subnets: i64,
}

/// Fixed per-unit counts. Cores and RAM are supplied at accounting time.
struct UnitOfWork {
    instances: i64,
    ports: i64,
    subnets: i64,
}

// pce-nm-sr-ps (4/16/2), sr-clmc-sfemc (3/11/1), frontend (1/2/0), moose (1/4/0)
const CONTROL_BUNDLE: UnitOfWork = UnitOfWork { instances: 9, ports: 33, subnets: 3 };
const SR_CLUSTER: UnitOfWork = UnitOfWork { instances: 2, ports: 6, subnets: 1 };
const SR_POA: UnitOfWork = UnitOfWork { instances: 1, ports: 4, subnets: 1 };

impl QuotaRequirement {
    fn add(&mut self, unit: &UnitOfWork, res: Resources) {
        self.cores += res.vcpus;
        self.ram += res.ram;
        self.instances += unit.instances;
        self.ports += unit.ports;
        self.subnets += unit.subnets;
    }
}

/// Sum the demand of every node in the store.
///
/// Reads the placement annotations (`is_ctrl_host`, `cluster_res`), so call
/// it after placement has run. Nothing is written.
pub fn platform_resource_requirement(store: &TopologyStore) -> QuotaRequirement {
    let control = control_function_requirement(&store.flavors);
    let sr = store.flavors.resources(FlavorRole::Sr);
    let single_dc = !has_multiple_data_centres(store);

    let mut q = QuotaRequirement::default();
    for info in &store.computes {
        let sr_cluster = sr + info.cluster_res;
        match info.tier() {
            Tier::DataCentre if single_dc => {
                q.add(&CONTROL_BUNDLE, control);
                q.add(&SR_CLUSTER, sr_cluster);
            }
            Tier::DataCentre if info.is_ctrl_host => q.add(&CONTROL_BUNDLE, control),
            Tier::DataCentre | Tier::Edge => q.add(&SR_CLUSTER, sr_cluster),
            Tier::FarEdge => {
                for _ in 0..info.access_count() {
                    q.add(&SR_POA, sr);
                    q.add(&SR_CLUSTER, sr_cluster);
                }
            }
            Tier::Mist => {
                for _ in 0..info.access_count() {
                    q.add(&SR_POA, sr);
                }
            }
        }
    }

    // gateway port plus one per DHCP agent
    q.ports += 1 + i64::from(store.metadata.dhcp_agents);
    debug!(?q, "platform resource requirement");
    q
}

/// Compare demand against quota limits. One advisory per exceeded limit.
pub fn check_quotas(required: &QuotaRequirement, limits: &QuotaLimits) -> Vec<Advisory> {
    let subnets = required.subnets + FIXED_SUBNETS;
    let checks = [
        (required.cores, limits.cores, "cores are insufficient, required number of cores are"),
        (required.ram, limits.ram, "ram is insufficient, required ram is"),
        (
            required.instances,
            limits.instances,
            "instances are insufficient, required number of instances are",
        ),
        (required.ports, limits.ports, "ports are insufficient, required number of ports are"),
        (subnets, limits.subnets, "subnets are insufficient, required number of subnets are"),
        (
            FIXED_SECURITY_GROUPS,
            limits.security_groups,
            "security groups are insufficient, required number of security groups are",
        ),
        (
            FIXED_SECURITY_GROUP_RULES,
            limits.security_group_rules,
            "security group rules are insufficient, required number of security group rules are",
        ),
    ];

    checks
        .into_iter()
        .filter(|(needed, limit, _)| needed > limit)
        .map(|(needed, _, msg)| Advisory::new(AdvisoryCategory::Quotas, format!("{msg}: {needed}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::placer::plan;
    use tierplan_core::NetworkCategory;

    const BIG: Resources = Resources::new(32, 65536, 500);

    fn roomy_limits() -> QuotaLimits {
        QuotaLimits {
            cores: 1000,
            ram: 1_000_000,
            instances: 100,
            ports: 500,
            subnets: 100,
            security_groups: 10,
            security_group_rules: 100,
        }
    }

    #[test]
    fn single_dc_counts_bundle_and_router_cluster() {
        let mut s = store(vec![dc_with_wan("dc1", BIG)]);
        plan(&mut s).unwrap();
        let q = platform_resource_requirement(&s);

        // bundle (12, 14336) + SR (2, 2048) + cluster (18, 49152)
        assert_eq!(q.cores, 32);
        assert_eq!(q.ram, 65536);
        assert_eq!(q.instances, 11);
        // 33 + 6 + gateway + 3 dhcp agents
        assert_eq!(q.ports, 43);
        assert_eq!(q.subnets, 4);
    }

    #[test]
    fn multi_dc_splits_bundle_and_clusters() {
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("dc2", Tier::DataCentre, Resources::new(8, 8192, 80), &[]),
        ]);
        plan(&mut s).unwrap();
        let q = platform_resource_requirement(&s);

        // bundle only on dc1; dc2 is SR + (capacity - SR) = capacity
        assert_eq!(q.cores, 12 + 8);
        assert_eq!(q.instances, 9 + 2);
        assert_eq!(q.ports, 33 + 6 + 4);
    }

    #[test]
    fn far_edge_and_mist_scale_with_access_networks() {
        let two = [(NetworkCategory::Access, "acc-1"), (NetworkCategory::Access, "acc-2")];
        let mut s = store(vec![
            dc_with_wan("dc1", BIG),
            node("fe1", Tier::FarEdge, BIG, &two),
            node("m1", Tier::Mist, BIG, &two),
        ]);
        plan(&mut s).unwrap();
        let q = platform_resource_requirement(&s);

        // dc1: 9 + 2; fe1: 2 x (1 + 2); m1: 2 x 1
        assert_eq!(q.instances, 11 + 6 + 2);
        assert_eq!(q.subnets, 4 + 4 + 2);
    }

    #[test]
    fn quotas_within_limits_are_silent() {
        let mut s = store(vec![dc_with_wan("dc1", BIG)]);
        plan(&mut s).unwrap();
        let q = platform_resource_requirement(&s);
        assert!(check_quotas(&q, &roomy_limits()).is_empty());
    }

    #[test]
    fn exceeded_limits_name_the_requirement() {
        let q = QuotaRequirement { cores: 40, ram: 1024, instances: 11, ports: 43, subnets: 4 };
        let limits = QuotaLimits { cores: 20, subnets: 7, security_groups: 4, ..roomy_limits() };
        let advisories = check_quotas(&q, &limits);

        let text: Vec<_> = advisories.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(
            text,
            [
                "cores are insufficient, required number of cores are: 40",
                "subnets are insufficient, required number of subnets are: 8",
                "security groups are insufficient, required number of security groups are: 5",
            ]
        );
        assert!(advisories.iter().all(|a| a.category == AdvisoryCategory::Quotas));
    }
}
