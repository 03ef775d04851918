use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// Serialization points for check-then-act sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// User name/email uniqueness (signup and identity updates).
    Identity,
    /// Project number assignment for one user id.
    UserProjects(i32),
    /// Task number assignment for one project id.
    ProjectTasks(i32),
}

/// Registry of per-key async mutexes.
///
/// Entries are dropped once nobody holds or waits on them, so the map only
/// grows with the number of keys in flight.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    slots: Mutex<HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Never call this while holding a
    /// database connection or transaction.
    pub async fn acquire(&self, key: LockKey) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key).or_default())
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
