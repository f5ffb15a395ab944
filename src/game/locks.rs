use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per created match
///
/// Holding the guard serializes the load -> mutate -> store -> publish cycle of a
/// match, so two concurrent moves can never both read the same pre-move state.
/// Entries exist only for registered ids; unknown ids never grow the table.
#[derive(Default)]
pub struct MatchLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MatchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the lock for a newly created match
    pub async fn register(&self, match_id: &str) {
        self.locks
            .lock()
            .await
            .entry(match_id.to_string())
            .or_default();
    }

    /// Locks a registered match; `None` for an id that was never registered
    pub async fn acquire(&self, match_id: &str) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let locks = self.locks.lock().await;
            Arc::clone(locks.get(match_id)?)
        };
        Some(lock.lock_owned().await)
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}
