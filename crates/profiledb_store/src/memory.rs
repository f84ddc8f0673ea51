//! In-memory store for testing and ephemeral deployments.

use crate::error::StoreResult;
use crate::store::ProfileStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory record store.
///
/// Suitable for unit tests, integration tests, and deployments that do
/// not need persistence. Records do not survive process restarts.
///
/// # Thread safety
///
/// The map lives behind a single `RwLock`; a `put` swaps the whole
/// record under the write lock, so a reader always observes one
/// complete prior write. The lock is held only for the map operation
/// itself, so writers to distinct identities contend only briefly.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every record. Useful in tests.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, identity: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.records.read().get(identity).cloned())
    }

    fn put(&self, identity: &str, record: &[u8]) -> StoreResult<()> {
        self.records
            .write()
            .insert(identity.to_string(), record.to_vec());
        Ok(())
    }

    fn contains(&self, identity: &str) -> StoreResult<bool> {
        Ok(self.records.read().contains_key(identity))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.records.read().len())
    }
}
