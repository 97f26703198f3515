use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::Collection;

/// Per-collection locks serializing load-modify-save cycles.
///
/// Only guards writers inside this process. Two processes sharing a data
/// directory still race, and the last write wins.
#[derive(Default)]
pub struct CollectionLocks {
    locks: DashMap<Collection, Arc<Mutex<()>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `collection`. Released on drop.
    pub async fn acquire(&self, collection: Collection) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(collection)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
