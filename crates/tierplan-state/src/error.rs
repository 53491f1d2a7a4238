//! Error types for the tierplan state crate.

use thiserror::Error;
use tierplan_core::{MAX_RESOURCES, Resources, UnknownVariant};

/// Result type alias for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors raised while ingesting a topology or touching the artifact store.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    #[error("flavor {0} is not present in the catalog")]
    MissingFlavor(&'static str),

    #[error("invalid cidr '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("incomplete infra descriptor: {0} is empty")]
    Incomplete(&'static str),

    #[error("compute node '{node}' references unknown network '{network}'")]
    UnknownNetwork { node: String, network: String },

    #[error("compute node '{0}' has no network connected to it")]
    NoNetworks(String),

    #[error("dhcp_agents = {value} is out of range: derived MSP addresses need it to be at most {max}")]
    DhcpAgentsOutOfRange { value: u32, max: u32 },

    #[error(
        "{what} declares {resources}: vcpus and ram must be positive, disk non-negative, \
         and no dimension above {}",
        MAX_RESOURCES
    )]
    ImplausibleResources { what: String, resources: Resources },

    #[error("duplicate compute node '{name}' in availability zone '{zone}'")]
    DuplicateNode { name: String, zone: String },

    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),
}
