pub mod check;
pub mod generate;
pub mod plan;

use std::path::Path;

use anyhow::Context;
use tierplan_core::{InfraDescriptor, TemplateSettings};
use tierplan_state::TopologyStore;

/// Read and ingest an infra descriptor.
pub fn load(path: &str) -> anyhow::Result<(TopologyStore, TemplateSettings)> {
    let descriptor = InfraDescriptor::from_file(Path::new(path))
        .with_context(|| format!("failed to read infra descriptor {path}"))?;
    let store = TopologyStore::from_descriptor(&descriptor)?;
    Ok((store, descriptor.template))
}
