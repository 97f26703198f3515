use dashmap::DashMap;
use serde_json::Value;

use super::{Collection, DocumentStore, StoreError};

/// In-memory store, handy for tests and throwaway instances.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<Collection, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }

    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        self.collections.insert(collection, records.to_vec());
        Ok(())
    }
}
