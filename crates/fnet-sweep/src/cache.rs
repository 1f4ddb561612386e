use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fnet_stats::{Statistic, StatisticName};

type Key = (PathBuf, StatisticName);

/// Statistics computed during one aggregation run, keyed by run directory and
/// statistic name.
///
/// Entries are only ever added; a fresh [`crate::Aggregator`] starts empty.
#[derive(Debug, Default)]
pub struct StatCache {
    entries: Mutex<HashMap<Key, Arc<Statistic>>>,
    hits: AtomicUsize,
}

impl StatCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Arc<Statistic>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached statistic, counting the hit.
    pub fn get(&self, dir: &Path, name: StatisticName) -> Option<Arc<Statistic>> {
        let found = self.lock().get(&(dir.to_path_buf(), name)).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Stores a statistic and returns the shared copy held by the cache.
    pub fn insert(&self, dir: &Path, name: StatisticName, value: Statistic) -> Arc<Statistic> {
        self.lock()
            .entry((dir.to_path_buf(), name))
            .or_insert_with(|| Arc::new(value))
            .clone()
    }

    /// Number of cached statistics.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}
