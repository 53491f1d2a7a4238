//! tierplan placement engine.
//!
//! Decides which compute node hosts the control-function bundle, how much
//! residual capacity each node keeps for its cluster flavor, and how much
//! the whole platform asks of the tenant's quota. It does NOT emit the
//! deployment descriptor (that's `tierplan-descriptor`); it only annotates
//! the [`TopologyStore`](tierplan_state::TopologyStore) the compiler reads.
//!
//! # Components
//!
//! - **`placer`**: control-host selection and per-tier capacity verification
//! - **`quota`**: platform-wide resource requirement and quota comparison
//! - **`networks`**: required network categories per tier
//! - **`assess`**: advisory run combining all checks without failing

pub mod advisory;
pub mod assess;
pub mod error;
pub mod networks;
pub mod placer;
pub mod quota;

#[cfg(test)]
pub(crate) mod fixtures;

pub use advisory::{Advisory, AdvisoryCategory};
pub use assess::{Assessment, assess};
pub use error::{PlacementError, PlacementResult};
pub use networks::{check_required_networks, required_networks};
pub use placer::{
    ControlHostSelection, Placement, SelectionMiss, control_function_requirement,
    has_multiple_data_centres, plan, select_control_host, verify_all_other_nodes,
};
pub use quota::{QuotaRequirement, check_quotas, platform_resource_requirement};
