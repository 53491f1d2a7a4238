pub mod config;
pub mod resources;
pub mod types;

pub use config::{InfraDescriptor, MAX_DHCP_AGENTS, QuotaLimits, TemplateSettings};
pub use resources::{MAX_RESOURCES, MIN_CLUSTER, Resources};
pub use types::*;
