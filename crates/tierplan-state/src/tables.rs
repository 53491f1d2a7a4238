//! redb table definitions for the artifact store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized domain types).

use redb::TableDefinition;

/// Cluster flavors keyed by flavor name (`{prefix}-{node}-{zone}`).
pub const CLUSTER_FLAVORS: TableDefinition<&str, &[u8]> = TableDefinition::new("cluster_flavors");

/// Generation settings keyed by setting name (e.g. `node-passwd`).
pub const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");
