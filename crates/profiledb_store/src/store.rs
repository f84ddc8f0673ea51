//! Store trait definition.

use crate::error::StoreResult;

/// A durable mapping from an identity token to a serialized record.
///
/// Stores are **opaque blob maps**. They provide get and put by
/// identity; the layer above owns serialization and validation, and a
/// store never inspects the bytes it is given.
///
/// # Invariants
///
/// - `put` replaces the full stored record for an identity, creating
///   it if absent
/// - `get` returns exactly the bytes of one complete prior `put`,
///   never an interleaved mix of two writes
/// - concurrent `put` calls to the same identity serialize; calls to
///   distinct identities do not block each other
/// - I/O failure surfaces as [`crate::StoreError::Unavailable`], never
///   silently swallowed
///
/// # Implementors
///
/// - [`crate::MemoryStore`] - For testing and ephemeral use
/// - [`crate::FileStore`] - For persistent storage
pub trait ProfileStore: Send + Sync {
    /// Returns the stored record for `identity`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get(&self, identity: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replaces the full stored record for `identity`.
    ///
    /// After this returns successfully the record is durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails; the previous
    /// record, if any, is left intact in that case.
    fn put(&self, identity: &str, record: &[u8]) -> StoreResult<()>;

    /// Returns true if a record exists for `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn contains(&self, identity: &str) -> StoreResult<bool> {
        Ok(self.get(identity)?.is_some())
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn len(&self) -> StoreResult<usize>;

    /// Returns true if the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
