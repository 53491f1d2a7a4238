//! Store builders shared by the unit tests.

use std::collections::BTreeMap;

use tierplan_core::{FlavorRole, NetworkCategory, Resources, Tier};
use tierplan_state::{
    ComputeInfo, ComputeNode, Flavor, FlavorCatalog, InfraServices, NetworkAttachment,
    PlatformMetadata, TopologyStore,
};

/// SR flavor used by every fixture store.
pub const SR: Resources = Resources::new(2, 2048, 20);
/// Monitor flavor; its RAM drives the relaxed retry.
pub const CLMC: Resources = Resources::new(2, 4096, 20);
/// Every other role.
pub const SMALL: Resources = Resources::new(1, 1024, 10);

pub fn catalog() -> FlavorCatalog {
    let flavors = FlavorRole::ALL.iter().map(|role| {
        let res = match role {
            FlavorRole::Sr => SR,
            FlavorRole::Clmc => CLMC,
            _ => SMALL,
        };
        Flavor::new(role.flavor_name(), res)
    });
    FlavorCatalog::from_flavors(flavors).unwrap()
}

pub fn node(name: &str, tier: Tier, capacity: Resources, networks: &[(NetworkCategory, &str)]) -> ComputeInfo {
    let mut attachment = NetworkAttachment::new();
    for (cat, id) in networks {
        attachment.attach(*cat, *id);
    }
    ComputeInfo::new(
        ComputeNode {
            name: name.to_string(),
            availability_zone: "nova".to_string(),
            tier,
            capacity,
        },
        attachment,
    )
}

/// A DC node with the given capacity and a WAN attachment (plus data).
pub fn dc_with_wan(name: &str, capacity: Resources) -> ComputeInfo {
    node(
        name,
        Tier::DataCentre,
        capacity,
        &[(NetworkCategory::Data, "data-net"), (NetworkCategory::Wan, "wan-net")],
    )
}

pub fn store(computes: Vec<ComputeInfo>) -> TopologyStore {
    TopologyStore {
        computes,
        subnets: BTreeMap::new(),
        security_groups: BTreeMap::new(),
        infra_services: InfraServices::default(),
        metadata: PlatformMetadata {
            tenant_id: "tenant-a".to_string(),
            cidr: "10.20.0.0/16".parse().unwrap(),
            mtu: 1400,
            dhcp_agents: 3,
            enable_ipv4_rules: false,
            sia_ip_frontend: None,
            parent_domain: "flame.example".to_string(),
        },
        flavors: catalog(),
    }
}
