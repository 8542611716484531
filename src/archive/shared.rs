//! Mutex-guarded archive handle.

use std::sync::{Arc, Mutex, MutexGuard};

use super::epsilon_box::{EpsilonBoxArchive, Insertion};
use crate::core::Solution;

/// A cloneable, thread-safe handle to one [`EpsilonBoxArchive`].
///
/// Only needed when several independent evaluation streams feed the same
/// archive. Each insertion is O(archive size) and happens at generation
/// granularity, so a single lock is enough.
#[derive(Debug, Clone)]
pub struct SharedArchive {
    inner: Arc<Mutex<EpsilonBoxArchive>>,
}

impl SharedArchive {
    pub fn new(archive: EpsilonBoxArchive) -> Self {
        Self {
            inner: Arc::new(Mutex::new(archive)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EpsilonBoxArchive> {
        // a panic while holding the lock cannot break the archive invariants:
        // `insert` decides before it mutates
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, solution: Solution) -> Insertion {
        self.lock().insert(solution)
    }

    pub fn add(&self, solution: Solution) -> bool {
        self.lock().add(solution)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Solution> {
        self.lock().snapshot()
    }

    /// Runs `f` with exclusive access to the archive.
    pub fn with<T>(&self, f: impl FnOnce(&mut EpsilonBoxArchive) -> T) -> T {
        f(&mut self.lock())
    }
}
