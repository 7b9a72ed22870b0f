//! # Deliverable Cache
//!
//! Postcode-keyed cache of resolved delivery locations, stored in an embedded
//! `DuckDB` file.
//!
//! ## Overview
//!
//! Address-resolution vendors need two round-trips to turn a postcode into a
//! location payload. The payload is stable for days, so it is persisted here
//! and reused until it ages out of the expiry window (7 days by default).
//!
//! - Entries are JSON objects stamped with a numeric `create_date` field
//!   (fractional Unix seconds).
//! - Reading an expired or unreadable entry deletes it and reports a miss.
//! - Writing always replaces the whole entry for that postcode.
//! - Every call opens the database file, operates and closes it again; no
//!   handle is held between calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deliverable_cache::{LocationCache, LocationCacheConfig};
//! use serde_json::{json, Map, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = LocationCache::open(LocationCacheConfig::default())?;
//!
//!     let mut location = Map::new();
//!     location.insert(String::from("latitude"), json!(51.5));
//!     cache.set("AB12 3CD", location)?;
//!
//!     let cached: Option<Map<String, Value>> = cache.get("AB12 3CD")?;
//!     assert!(cached.is_some());
//!     Ok(())
//! }
//! ```

pub mod clock;
mod store;

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use thiserror::Error;
use time::Duration;
use tracing::{debug, warn};

pub use clock::{Clock, ManualClock, SystemClock};

/// Name of the stamped creation-time field inside each stored entry.
pub const CREATE_DATE_FIELD: &str = "create_date";

/// Default namespace (table) holding Uber Eats postcode locations.
pub const DEFAULT_NAMESPACE: &str = "ue_postcodes";

/// Default expiry window: 7 days.
pub const DEFAULT_EXPIRY: Duration = Duration::seconds(604_800);

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error while preparing the cache directory.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded or decoded as JSON.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Namespace is not a plain lowercase identifier.
    #[error("invalid cache namespace '{0}'")]
    InvalidNamespace(String),
}

/// Configuration for the location cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCacheConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Key/value namespace (table name) inside the file.
    pub namespace: String,
    /// Age after which an entry is treated as absent.
    pub expiry: Duration,
}

impl Default for LocationCacheConfig {
    fn default() -> Self {
        Self {
            db_path: resolve_deliverable_home()
                .join("cache")
                .join("locations.duckdb"),
            namespace: String::from(DEFAULT_NAMESPACE),
            expiry: DEFAULT_EXPIRY,
        }
    }
}

impl LocationCacheConfig {
    pub fn at_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }
}

/// Postcode → location cache with time-based expiry.
#[derive(Clone)]
pub struct LocationCache {
    config: LocationCacheConfig,
    clock: Arc<dyn Clock>,
    gate: Arc<Mutex<()>>,
}

impl fmt::Debug for LocationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationCache")
            .field("db_path", &self.config.db_path)
            .field("namespace", &self.config.namespace)
            .field("expiry", &self.config.expiry)
            .finish_non_exhaustive()
    }
}

impl LocationCache {
    /// Open the cache with the system clock.
    pub fn open(config: LocationCacheConfig) -> Result<Self, CacheError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Open the cache with a caller-supplied clock.
    ///
    /// Creates the parent directory and the namespace table, then releases the file.
    pub fn open_with_clock(
        config: LocationCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        if !store::is_valid_namespace(&config.namespace) {
            return Err(CacheError::InvalidNamespace(config.namespace));
        }
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let cache = Self {
            config,
            clock,
            gate: Arc::new(Mutex::new(())),
        };
        {
            let _gate = cache.enter();
            let connection = store::open_connection(cache.db_path())?;
            store::ensure_namespace(&connection, cache.table())?;
        }
        Ok(cache)
    }

    /// Look up the location cached for `postcode`.
    ///
    /// Returns `None` when nothing is stored, when the entry has outlived the
    /// expiry window, or when it is not a JSON object carrying `create_date`.
    /// The last two are deleted before returning so the next write repairs them.
    /// The `create_date` stamp is stripped from the returned payload.
    pub fn get(&self, postcode: &str) -> Result<Option<Map<String, Value>>, CacheError> {
        let _gate = self.enter();
        let connection = store::open_connection(self.db_path())?;

        let Some(raw) = store::select_payload(&connection, self.table(), postcode)? else {
            debug!(postcode, "location cache miss");
            return Ok(None);
        };

        let Some((entry, created)) = decode_entry(&raw) else {
            store::delete_payload(&connection, self.table(), postcode)?;
            warn!(postcode, "evicted unreadable cached location");
            return Ok(None);
        };
        let cutoff = clock::unix_seconds(self.clock.now()) - self.config.expiry.as_seconds_f64();

        if created < cutoff {
            store::delete_payload(&connection, self.table(), postcode)?;
            debug!(postcode, "evicted expired cached location");
            return Ok(None);
        }

        debug!(postcode, "location cache hit");
        Ok(Some(entry))
    }

    /// Stamp `location` with the current time and store it under `postcode`,
    /// replacing any previous entry.
    pub fn set(&self, postcode: &str, mut location: Map<String, Value>) -> Result<(), CacheError> {
        let created = clock::unix_seconds(self.clock.now());
        location.insert(String::from(CREATE_DATE_FIELD), Value::from(created));
        let payload = serde_json::to_string(&Value::Object(location))?;

        let _gate = self.enter();
        let connection = store::open_connection(self.db_path())?;
        store::upsert_payload(&connection, self.table(), postcode, &payload)?;
        debug!(postcode, "stored location in cache");
        Ok(())
    }

    /// Remove any entry for `postcode`; returns whether one existed.
    pub fn evict(&self, postcode: &str) -> Result<bool, CacheError> {
        let _gate = self.enter();
        let connection = store::open_connection(self.db_path())?;
        Ok(store::delete_payload(&connection, self.table(), postcode)?)
    }

    /// Stored entry for `postcode` exactly as persisted, stamp included and
    /// without any expiry check.
    pub fn raw(&self, postcode: &str) -> Result<Option<Value>, CacheError> {
        let _gate = self.enter();
        let connection = store::open_connection(self.db_path())?;
        store::select_payload(&connection, self.table(), postcode)?
            .map(|raw| serde_json::from_str(&raw).map_err(CacheError::from))
            .transpose()
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.config.db_path.as_path()
    }

    fn table(&self) -> &str {
        &self.config.namespace
    }

    fn enter(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Split a stored payload into the location and its `create_date` stamp.
fn decode_entry(raw: &str) -> Option<(Map<String, Value>, f64)> {
    let Ok(Value::Object(mut entry)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };
    let created = entry.remove(CREATE_DATE_FIELD)?.as_f64()?;
    Some((entry, created))
}

/// Resolve the deliverable home directory from environment or default.
fn resolve_deliverable_home() -> PathBuf {
    if let Some(path) = env::var_os("DELIVERABLE_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".deliverable");
    }

    PathBuf::from(".deliverable")
}
