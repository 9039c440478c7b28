//! Memoized analysis reports keyed by the input configuration. A report is recomputed only
//! when the catalog or analysis settings change.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::analysis::analyzer::AnalysisReport;
use crate::error::AnalysisError;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Arc<AnalysisReport>>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

#[derive(Debug)]
pub struct AnalysisCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl AnalysisCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Stable key for any serializable input (e.g. `(catalog, config)`).
    pub fn fingerprint<K: Serialize>(key: &K) -> Option<String> {
        serde_json::to_string(key).ok()
    }

    pub fn get<K: Serialize>(&self, key: &K) -> Option<Arc<AnalysisReport>> {
        let fingerprint = Self::fingerprint(key)?;
        self.lock().entries.get(&fingerprint).cloned()
    }

    /// Cached report for `key`, or run `compute` and cache its result. Failures are not cached.
    /// The lock is not held while computing.
    pub fn get_or_compute<K, F>(&self, key: &K, compute: F) -> Result<Arc<AnalysisReport>, AnalysisError>
    where
        K: Serialize,
        F: FnOnce() -> Result<AnalysisReport, AnalysisError>,
    {
        let Some(fingerprint) = Self::fingerprint(key) else {
            return compute().map(Arc::new);
        };
        if let Some(hit) = self.lock().entries.get(&fingerprint) {
            tracing::debug!("analysis cache hit");
            return Ok(Arc::clone(hit));
        }

        let report = Arc::new(compute()?);
        let mut state = self.lock();
        if !state.entries.contains_key(&fingerprint) {
            while state.order.len() >= self.capacity {
                if let Some(oldest) = state.order.pop_front() {
                    state.entries.remove(&oldest);
                }
            }
            state.order.push_back(fingerprint.clone());
        }
        state.entries.insert(fingerprint, Arc::clone(&report));
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
