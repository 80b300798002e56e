use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use narthex_types::KeyId;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyStore;

/// In-memory, HashMap-based key store.
///
/// Intended for tests and embedding. Exclusivity comes from the write lock
/// rather than the filesystem, so it only holds within one process.
pub struct InMemoryKeyStore {
    records: RwLock<HashMap<KeyId, Vec<u8>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn register(&self, id: KeyId, body: &[u8], body_length: usize) -> StoreResult<()> {
        if body.len() < body_length {
            return Err(StoreError::ShortWrite {
                expected: body_length,
                written: body.len(),
            });
        }
        let mut map = self.records.write().expect("lock poisoned");
        match map.entry(id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyRegistered(id)),
            Entry::Vacant(slot) => {
                slot.insert(body[..body_length].to_vec());
                Ok(())
            }
        }
    }

    fn load(&self, id: KeyId) -> StoreResult<Option<Vec<u8>>> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.get(&id).cloned())
    }

    fn contains(&self, id: KeyId) -> StoreResult<bool> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.contains_key(&id))
    }

    fn list(&self) -> StoreResult<Vec<KeyId>> {
        let map = self.records.read().expect("lock poisoned");
        let mut ids: Vec<KeyId> = map.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyStore")
            .field("record_count", &self.len())
            .finish()
    }
}
