//! Placement error types.

use thiserror::Error;
use tierplan_core::{Resources, Tier};

/// Fatal placement failures. Any of these aborts the planning run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(
        "min. resources required are not available on {tier} compute node '{node}': \
         required {required}, capacity {capacity}"
    )]
    InsufficientCapacity {
        node: String,
        tier: Tier,
        required: Resources,
        capacity: Resources,
    },

    #[error("no access network attached to {tier} compute node '{node}'")]
    NoAccessNetwork { node: String, tier: Tier },
}

pub type PlacementResult<T> = Result<T, PlacementError>;
