//! tierplan descriptor compiler.
//!
//! Turns a placed [`TopologyStore`] into a HEAT template: one resource
//! block per placement decision, chained by `depends_on` into a single
//! linear order. The compiler never decides placement itself; [`generate`]
//! runs the placement engine first and compiles only if it succeeds.
//!
//! # Components
//!
//! - **`context`**: per-run state (router counter, previous block, password)
//! - **`block`**: one resource block and its rendering
//! - **`compiler`**: the per-tier state machine
//! - **`flavors`**: cluster flavors derived from placement
//! - **`password`**: node password generation

pub mod block;
pub mod compiler;
pub mod context;
pub mod error;
pub mod flavors;
pub mod password;

#[cfg(test)]
pub(crate) mod fixtures;

pub use block::ResourceBlock;
pub use compiler::{Descriptor, HEAT_TEMPLATE_VERSION, compile};
pub use context::{DerivedAddresses, GenerationContext, MAX_ROUTERS};
pub use error::{DescriptorError, DescriptorResult};
pub use flavors::{cluster_flavor_name, cluster_flavors};
pub use password::NodePassword;

use tierplan_core::TemplateSettings;
use tierplan_placement::Placement;
use tierplan_state::{Flavor, TopologyStore};
use tracing::info;

/// Everything one generation run produces.
#[derive(Debug, Clone)]
pub struct Generated {
    /// `placement.control_host` is `NotFound` when no node could take the
    /// control bundle; the descriptor then carries routers and clusters only.
    pub placement: Placement,
    pub descriptor: Descriptor,
    /// Flavors to record alongside the descriptor.
    pub cluster_flavors: Vec<Flavor>,
}

/// Place, then compile. A fatal placement failure aborts before any
/// output is produced.
///
/// A missing control host is not fatal here. The descriptor is compiled
/// without a control bundle and the miss is reported on the result, so
/// callers that must not deploy such a template check it:
///
/// ```no_run
/// # use tierplan_core::TemplateSettings;
/// # use tierplan_descriptor::{DescriptorResult, NodePassword, generate};
/// # use tierplan_state::TopologyStore;
/// # fn run(store: &mut TopologyStore) -> DescriptorResult<()> {
/// let password = NodePassword::generate(&mut rand::thread_rng());
/// let out = generate(store, &TemplateSettings::default(), password)?;
/// if let Some(miss) = out.placement.control_host.miss() {
///     eprintln!("refusing to deploy: {miss}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn generate(
    store: &mut TopologyStore,
    settings: &TemplateSettings,
    password: NodePassword,
) -> DescriptorResult<Generated> {
    let placement = tierplan_placement::plan(store)?;
    let descriptor = compile(store, settings, password)?;
    let cluster_flavors = cluster_flavors(store, settings);
    info!(
        blocks = descriptor.blocks.len(),
        cluster_flavors = cluster_flavors.len(),
        control_host = ?placement.control_host,
        "descriptor generated"
    );
    Ok(Generated {
        placement,
        descriptor,
        cluster_flavors,
    })
}
