//! Cluster flavors sized from the capacity placement left on each node.

use tierplan_core::TemplateSettings;
use tierplan_state::{ComputeInfo, Flavor, TopologyStore};

/// `{prefix}-{name}-{availability_zone}`.
pub fn cluster_flavor_name(prefix: &str, info: &ComputeInfo) -> String {
    format!("{prefix}-{}-{}", info.node.name, info.node.availability_zone)
}

/// One flavor per node whose cluster capacity is non-zero in every
/// dimension, in store order.
pub fn cluster_flavors(store: &TopologyStore, settings: &TemplateSettings) -> Vec<Flavor> {
    store
        .computes
        .iter()
        .filter(|c| c.cluster_res.is_fully_populated())
        .map(|c| Flavor::new(cluster_flavor_name(&settings.cluster_flavor_prefix, c), c.cluster_res))
        .collect()
}
