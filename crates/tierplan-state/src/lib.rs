//! tierplan-state: the in-memory topology the planner works on.
//!
//! A [`TopologyStore`] is built once per planning request from an
//! [`InfraDescriptor`](tierplan_core::InfraDescriptor) (see [`convert`]).
//! The placement engine writes only `is_ctrl_host` and `cluster_res` on its
//! [`ComputeInfo`] records; everything else is read-only after ingestion.
//!
//! Derived artifacts (cluster flavors, the node password) are persisted in
//! an [`ArtifactStore`] backed by [redb](https://docs.rs/redb). All values
//! are JSON-serialized into redb's `&[u8]` value columns.

pub mod catalog;
pub mod convert;
pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use catalog::FlavorCatalog;
pub use error::{StateError, StateResult};
pub use store::ArtifactStore;
pub use types::*;
