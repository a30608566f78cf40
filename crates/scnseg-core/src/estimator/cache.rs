//! Exact-range memo of density estimates.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Density values keyed by the exact `(start, end)` range they were sampled for.
///
/// Shared by every estimate issued during one run. Entries are never evicted.
#[derive(Debug, Default)]
pub struct DensityCache {
    entries: Mutex<HashMap<(u64, u64), f64>>,
}

impl DensityCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(u64, u64), f64>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, start: u64, end: u64) -> Option<f64> {
        self.lock().get(&(start, end)).copied()
    }

    /// Stores `density` unless another caller already stored a value for this key.
    /// Returns the value held by the cache afterwards.
    pub fn insert(&self, start: u64, end: u64, density: f64) -> f64 {
        *self.lock().entry((start, end)).or_insert(density)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
