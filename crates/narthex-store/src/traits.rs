use narthex_types::KeyId;

use crate::error::StoreResult;

/// Write-once store of Key Records.
///
/// All implementations must satisfy these invariants:
/// - At most one `register` call per identifier ever succeeds, across every
///   thread and process sharing the store.
/// - A record is never overwritten or left partially written.
/// - The store never interprets record contents.
pub trait KeyStore: Send + Sync {
    /// Create the record for `id` holding exactly `body_length` bytes of `body`.
    ///
    /// Returns [`StoreError::AlreadyRegistered`](crate::StoreError::AlreadyRegistered)
    /// without touching the existing record if one is present. If fewer than
    /// `body_length` bytes can be stored, nothing is left behind.
    fn register(&self, id: KeyId, body: &[u8], body_length: usize) -> StoreResult<()>;

    /// Read a record back. Returns `Ok(None)` if it does not exist.
    fn load(&self, id: KeyId) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether a record exists for `id`.
    fn contains(&self, id: KeyId) -> StoreResult<bool>;

    /// All registered identifiers, sorted ascending.
    fn list(&self) -> StoreResult<Vec<KeyId>>;
}
