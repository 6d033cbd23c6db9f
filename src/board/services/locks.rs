//! Per-column serialisation of remote writes.
//!
//! Each column id maps to one async mutex. Tokio mutexes grant the lock in
//! request order, so writes against a column are applied in the order they
//! were issued and a slower, older write cannot land after a newer one.

use crate::board::domain::ColumnId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-column write locks.
#[derive(Debug, Clone, Default)]
pub struct ColumnLocks {
    locks: Arc<Mutex<HashMap<ColumnId, Arc<AsyncMutex<()>>>>>,
}

/// Held column locks; released on drop.
#[derive(Debug)]
pub struct ColumnGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl ColumnLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, id: &ColumnId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    /// Waits for exclusive write access to one column.
    pub async fn lock(&self, id: &ColumnId) -> ColumnGuard {
        let guard = self.handle(id).lock_owned().await;
        ColumnGuard {
            _guards: vec![guard],
        }
    }

    /// Waits for exclusive write access to two columns.
    ///
    /// Locks are taken in id order so two opposite moves cannot deadlock.
    pub async fn lock_pair(&self, first: &ColumnId, second: &ColumnId) -> ColumnGuard {
        if first == second {
            return self.lock(first).await;
        }
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let low_guard = self.handle(low).lock_owned().await;
        let high_guard = self.handle(high).lock_owned().await;
        ColumnGuard {
            _guards: vec![low_guard, high_guard],
        }
    }

    /// Returns whether a column is currently locked.
    #[must_use]
    pub fn is_locked(&self, id: &ColumnId) -> bool {
        self.handle(id).try_lock().is_err()
    }
}
