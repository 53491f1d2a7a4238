//! ArtifactStore: redb-backed persistence for derived planning artifacts.
//!
//! A descriptor run produces two artifacts worth keeping: the cluster
//! flavors sized by the placement engine and the node password baked into
//! every block. The store supports both on-disk and in-memory backends
//! (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::Flavor;

/// Settings key under which the node password is kept.
const NODE_PASSWORD_KEY: &str = "node-passwd";

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe artifact store backed by redb.
#[derive(Clone)]
pub struct ArtifactStore {
    db: Arc<Database>,
}

impl ArtifactStore {
    /// Open (or create) a persistent artifact store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "artifact store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory artifact store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory artifact store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(CLUSTER_FLAVORS).map_err(map_err!(Table))?;
        txn.open_table(SETTINGS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Cluster flavors ────────────────────────────────────────────

    /// Drop every stored cluster flavor and store `flavors` in one transaction.
    pub fn replace_cluster_flavors(&self, flavors: &[Flavor]) -> StateResult<()> {
        let encoded: Vec<(String, Vec<u8>)> = flavors
            .iter()
            .map(|f| -> StateResult<(String, Vec<u8>)> {
                Ok((f.name.clone(), serde_json::to_vec(f).map_err(map_err!(Serialize))?))
            })
            .collect::<StateResult<_>>()?;

        let stale = self.cluster_flavor_names()?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CLUSTER_FLAVORS).map_err(map_err!(Table))?;
            for key in &stale {
                table.remove(key.as_str()).map_err(map_err!(Write))?;
            }
            for (key, value) in &encoded {
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(removed = stale.len(), stored = encoded.len(), "cluster flavors replaced");
        Ok(())
    }

    /// List stored cluster flavors, ordered by name.
    pub fn list_cluster_flavors(&self) -> StateResult<Vec<Flavor>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CLUSTER_FLAVORS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let flavor: Flavor =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(flavor);
        }
        Ok(results)
    }

    /// Delete all cluster flavors. Returns the number deleted.
    pub fn clear_cluster_flavors(&self) -> StateResult<u32> {
        let keys = self.cluster_flavor_names()?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let count = keys.len() as u32;
        {
            let mut table = txn.open_table(CLUSTER_FLAVORS).map_err(map_err!(Table))?;
            for key in &keys {
                table.remove(key.as_str()).map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(count)
    }

    fn cluster_flavor_names(&self) -> StateResult<Vec<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CLUSTER_FLAVORS).map_err(map_err!(Table))?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    // ── Node password ──────────────────────────────────────────────

    /// Store the node password, replacing any previous one.
    pub fn put_node_password(&self, password: &str) -> StateResult<()> {
        let value = serde_json::to_vec(password).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SETTINGS).map_err(map_err!(Table))?;
            table
                .insert(NODE_PASSWORD_KEY, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!("node password stored");
        Ok(())
    }

    pub fn node_password(&self) -> StateResult<Option<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SETTINGS).map_err(map_err!(Table))?;
        match table.get(NODE_PASSWORD_KEY).map_err(map_err!(Read))? {
            Some(guard) => {
                let password: String =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(password))
            }
            None => Ok(None),
        }
    }
}
