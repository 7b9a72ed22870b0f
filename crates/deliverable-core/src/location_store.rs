//! Seam between address-resolution adapters and the location cache.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use deliverable_cache::{CacheError, LocationCache};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::task::JoinError;

/// Boxed future returned by [`LocationStore`] operations.
pub type LocationFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, LocationStoreError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum LocationStoreError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("location cache task failed: {0}")]
    Task(#[from] JoinError),
}

/// Postcode-keyed store of resolved vendor locations.
///
/// Operations are asynchronous so that a slow store never stalls the other
/// vendors sharing the aggregating task.
pub trait LocationStore: Send + Sync {
    /// Unexpired location for `postcode`, without its creation stamp.
    fn get<'a>(&'a self, postcode: &'a str) -> LocationFuture<'a, Option<Map<String, Value>>>;

    /// Stamp and store `location`, replacing any previous entry.
    fn set<'a>(
        &'a self,
        postcode: &'a str,
        location: Map<String, Value>,
    ) -> LocationFuture<'a, ()>;
}

// DuckDB calls block on file I/O and the cache gate, so they run on the
// blocking pool rather than the calling task.
impl LocationStore for LocationCache {
    fn get<'a>(&'a self, postcode: &'a str) -> LocationFuture<'a, Option<Map<String, Value>>> {
        let cache = self.clone();
        let postcode = postcode.to_owned();
        Box::pin(async move {
            let task = tokio::task::spawn_blocking(move || LocationCache::get(&cache, &postcode));
            Ok(task.await??)
        })
    }

    fn set<'a>(
        &'a self,
        postcode: &'a str,
        location: Map<String, Value>,
    ) -> LocationFuture<'a, ()> {
        let cache = self.clone();
        let postcode = postcode.to_owned();
        Box::pin(async move {
            let task = tokio::task::spawn_blocking(move || {
                LocationCache::set(&cache, &postcode, location)
            });
            Ok(task.await??)
        })
    }
}

/// Process-local store without expiry, for offline runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    entries: Mutex<HashMap<String, Map<String, Value>>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, postcode: impl Into<String>, location: Map<String, Value>) -> Self {
        self.lock().insert(postcode.into(), location);
        self
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Map<String, Value>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationStore for MemoryLocationStore {
    fn get<'a>(&'a self, postcode: &'a str) -> LocationFuture<'a, Option<Map<String, Value>>> {
        let entry = self.lock().get(postcode).cloned();
        Box::pin(async move { Ok(entry) })
    }

    fn set<'a>(
        &'a self,
        postcode: &'a str,
        location: Map<String, Value>,
    ) -> LocationFuture<'a, ()> {
        self.lock().insert(postcode.to_owned(), location);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use deliverable_cache::{LocationCacheConfig, ManualClock};
    use serde_json::json;

    use super::*;
    use crate::test_support::object;

    fn cache_in(dir: &tempfile::TempDir) -> LocationCache {
        LocationCache::open_with_clock(
            LocationCacheConfig::at_path(dir.path().join("locations.duckdb")),
            Arc::new(ManualClock::at_unix_seconds(1_000)),
        )
        .expect("open cache")
    }

    #[tokio::test]
    async fn cache_backed_store_round_trips_without_stamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache_in(&dir);
        let store: &dyn LocationStore = &cache;

        store
            .set("NW9 9ED", object(json!({"latitude": 51.5})))
            .await
            .expect("set");

        assert_eq!(
            store.get("NW9 9ED").await.expect("get"),
            Some(object(json!({"latitude": 51.5})))
        );
        assert_eq!(store.get("NW9 9EE").await.expect("get"), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cache_reads_interleave_with_other_work_on_the_same_task() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache_in(&dir);
        cache
            .set("NW9 9ED", object(json!({"latitude": 51.5})))
            .expect("seed");
        let ticks = AtomicUsize::new(0);

        let read = async {
            let found = LocationStore::get(&cache, "NW9 9ED").await.expect("get");
            (found, ticks.load(Ordering::SeqCst))
        };
        let ticker = async {
            ticks.fetch_add(1, Ordering::SeqCst);
        };
        let ((found, ticks_seen), ()) = tokio::join!(read, ticker);

        assert!(found.is_some());
        assert_eq!(ticks_seen, 1);
    }

    #[tokio::test]
    async fn memory_store_keeps_latest_entry() {
        let store = MemoryLocationStore::new().with_entry("AB1", object(json!({"v": 1})));

        store.set("AB1", object(json!({"v": 2}))).await.expect("set");

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("AB1").await.expect("get"),
            Some(object(json!({"v": 2})))
        );
    }
}
