//! Infra descriptor and planner configuration parsing (TOML).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The infrastructure topology handed to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfraDescriptor {
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub infrastructure_services: InfraServicesConfig,
    #[serde(default)]
    pub template: TemplateSettings,
    pub networks: Vec<NetworkConfig>,
    #[serde(default)]
    pub subnets: Vec<CategorisedConfig>,
    #[serde(default)]
    pub security_groups: Vec<CategorisedConfig>,
    pub compute_nodes: Vec<ComputeNodeConfig>,
    pub flavors: Vec<FlavorConfig>,
}

/// Largest DHCP agent count whose derived MSP addresses (up to `2D + 6`)
/// still fit a host octet.
pub const MAX_DHCP_AGENTS: u32 = 124;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub tenant: String,
    pub cidr: String,
    pub mtu: u32,
    pub dhcp_agents: u32,
    #[serde(default)]
    pub ipv4_rules: bool,
    pub sia_ip_frontend: Option<String>,
    #[serde(default)]
    pub parent_domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraServicesConfig {
    pub dns: Option<String>,
    pub sdn_controller: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub identifier: String,
    pub category: String,
}

/// A subnet or security group: an identifier filed under a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorisedConfig {
    pub identifier: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeNodeConfig {
    pub name: String,
    pub availability_zone: String,
    pub tier: String,
    pub vcpus: i64,
    /// MB.
    pub ram: i64,
    /// GB.
    pub disk: i64,
    /// Network identifiers, in attachment order.
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorConfig {
    pub name: String,
    pub vcpus: i64,
    pub ram: i64,
    pub disk: i64,
}

/// Names and paths baked into the emitted descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Prefix for every block's `type:` path.
    pub template_dir: String,
    pub key_pair: String,
    pub msp_subnet: String,
    pub cluster_flavor_prefix: String,
    pub description: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template_dir: "heat".to_string(),
            key_pair: "flame".to_string(),
            msp_subnet: "flame-msp".to_string(),
            cluster_flavor_prefix: "flame-cluster".to_string(),
            description: "FLAME platform with clusters and platform services".to_string(),
        }
    }
}

/// Tenant quota limits the platform requirement is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub cores: i64,
    pub ram: i64,
    pub instances: i64,
    pub ports: i64,
    pub subnets: i64,
    pub security_groups: i64,
    pub security_group_rules: i64,
}

impl InfraDescriptor {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let descriptor: InfraDescriptor = toml::from_str(content)?;
        Ok(descriptor)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl QuotaLimits {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let limits: QuotaLimits = toml::from_str(&content)?;
        Ok(limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[metadata]
tenant = "t-1"
cidr = "10.10.0.0/16"
mtu = 1450
dhcp_agents = 2

[[networks]]
identifier = "net-wan"
category = "wan"

[[compute_nodes]]
name = "dc1"
availability_zone = "nova"
tier = "data_centre"
vcpus = 32
ram = 65536
disk = 500
networks = ["net-wan"]

[[flavors]]
name = "sr"
vcpus = 1
ram = 1024
disk = 10
"#;

    #[test]
    fn test_parse_minimal() {
        let d = InfraDescriptor::from_toml_str(MINIMAL).unwrap();
        assert_eq!(d.metadata.cidr, "10.10.0.0/16");
        assert_eq!(d.compute_nodes[0].networks, vec!["net-wan"]);
        assert!(!d.metadata.ipv4_rules);
        assert!(d.subnets.is_empty());
        assert_eq!(d.template, TemplateSettings::default());
    }

    #[test]
    fn test_template_overrides() {
        let toml_str = format!("{MINIMAL}\n[template]\ntemplate_dir = \"/opt/heat\"\n");
        let d = InfraDescriptor::from_toml_str(&toml_str).unwrap();
        assert_eq!(d.template.template_dir, "/opt/heat");
        assert_eq!(d.template.key_pair, "flame");
    }

    #[test]
    fn test_reserialize() {
        let d = InfraDescriptor::from_toml_str(MINIMAL).unwrap();
        let out = d.to_toml_string().unwrap();
        assert!(out.contains("dc1"));
        assert!(out.contains("data_centre"));
    }

    #[test]
    fn test_missing_metadata_rejected() {
        assert!(InfraDescriptor::from_toml_str("networks = []").is_err());
    }
}
