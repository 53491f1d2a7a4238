//! Topologies shared by the unit tests.

use tierplan_core::InfraDescriptor;
use tierplan_state::TopologyStore;

pub const PASSWORD: &str = "Ab3dEf6hIj9k";

const COMMON: &str = r#"
[metadata]
tenant = "tenant-a"
cidr = "10.20.0.0/16"
mtu = 1400
dhcp_agents = 3
ipv4_rules = true
sia_ip_frontend = "192.0.2.10"
parent_domain = "flame.example"

[infrastructure_services]
dns = "8.8.8.8"
sdn_controller = "172.16.0.10"

[[networks]]
identifier = "data-net"
category = "data"

[[networks]]
identifier = "wan-net"
category = "wan"

[[networks]]
identifier = "sdn-net"
category = "sdnctrl"

[[networks]]
identifier = "mgmt-net"
category = "mgmt"

[[networks]]
identifier = "msp-net"
category = "msp"

[[networks]]
identifier = "ps-net"
category = "ps"

[[networks]]
identifier = "clmc-net"
category = "clmc-sfemc"

[[networks]]
identifier = "sia-net"
category = "sia"

[[networks]]
identifier = "cluster-net"
category = "cluster"

[[networks]]
identifier = "acc-1"
category = "access"

[[networks]]
identifier = "acc-2"
category = "access"

[[networks]]
identifier = "acc-3"
category = "access"

[[security_groups]]
identifier = "sg-mgmt"
category = "mgmt"

[[security_groups]]
identifier = "sg-sdnctrl"
category = "sdnctrl"

[[security_groups]]
identifier = "sg-msp"
category = "msp"

[[security_groups]]
identifier = "sg-sia"
category = "sia"

[[security_groups]]
identifier = "sg-wan"
category = "wan"

[[subnets]]
identifier = "sub-sia"
category = "sia"

[[flavors]]
name = "pce"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "nm"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "sr"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "ps"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "frontend"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "moose"
vcpus = 1
ram = 1024
disk = 10

[[flavors]]
name = "clmc"
vcpus = 2
ram = 4096
disk = 20

[[flavors]]
name = "sfemc"
vcpus = 1
ram = 1024
disk = 10
"#;

const DC1: &str = r#"
[[compute_nodes]]
name = "dc1"
availability_zone = "nova"
tier = "data_centre"
vcpus = 32
ram = 65536
disk = 500
networks = ["data-net", "wan-net", "sdn-net", "mgmt-net", "msp-net", "ps-net", "clmc-net", "sia-net", "cluster-net"]
"#;

const OTHERS: &str = r#"
[[compute_nodes]]
name = "dc2"
availability_zone = "nova"
tier = "data_centre"
vcpus = 8
ram = 8192
disk = 80
networks = ["data-net", "sdn-net", "mgmt-net", "cluster-net"]

[[compute_nodes]]
name = "fe1"
availability_zone = "edge"
tier = "far_edge"
vcpus = 16
ram = 32768
disk = 200
networks = ["data-net", "sdn-net", "mgmt-net", "cluster-net", "acc-1", "acc-2", "acc-3"]

[[compute_nodes]]
name = "m1"
availability_zone = "edge"
tier = "mist"
vcpus = 4
ram = 4096
disk = 40
networks = ["data-net", "sdn-net", "mgmt-net", "acc-1", "acc-2"]
"#;

fn store_from(toml: &str) -> TopologyStore {
    let descriptor = InfraDescriptor::from_toml_str(toml).unwrap();
    TopologyStore::from_descriptor(&descriptor).unwrap()
}

/// One fully attached DC node.
pub fn single_dc_store() -> TopologyStore {
    store_from(&format!("{COMMON}{DC1}"))
}

/// dc1 (wan) + dc2, a far-edge node with three access networks, a mist node with two.
pub fn mixed_store() -> TopologyStore {
    store_from(&format!("{COMMON}{DC1}{OTHERS}"))
}

pub fn placed(mut store: TopologyStore) -> TopologyStore {
    tierplan_placement::plan(&mut store).unwrap();
    store
}
