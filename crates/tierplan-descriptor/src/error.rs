//! Descriptor error types.

use thiserror::Error;
use tierplan_placement::PlacementError;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("invalid node password: {0}")]
    InvalidPassword(&'static str),

    #[error("{value} dhcp agents push derived addresses past the last octet (at most {max})")]
    DhcpAgentsOutOfRange { value: u32, max: u32 },

    #[error("topology needs {routers} router subnets but the lan prefix has room for {max}")]
    TooManyRouters { routers: usize, max: u32 },
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;
