//! # Deliverable Core
//!
//! Asks food-delivery vendors whether they deliver to a postcode.
//!
//! ## Overview
//!
//! - **Vendor adapters** for direct-query vendors (Pizza Hut, Dominos) and
//!   the Uber Eats brand family (McDonalds, KFC, Burger King)
//! - **Per-query sessions** that carry headers and context cookies for one
//!   check and are released when it returns
//! - **Catalog** of vendor factories keyed by slug
//! - **Aggregator** running every vendor concurrently into one report
//! - **Environment configuration** and `tracing` setup shared by both binaries
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Pizza Hut, Dominos and Uber Eats adapters |
//! | [`aggregator`] | Concurrent fan-out and `DeliveryReport` |
//! | [`catalog`] | `VendorCatalog` and its builder |
//! | [`config`] | `DELIVERABLE_*` environment configuration |
//! | [`error`] | `DeliveryError` and `ConfigError` |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`location_store`] | Adapter-facing view of the location cache |
//! | [`session`] | Per-query vendor session |
//! | [`telemetry`] | `tracing-subscriber` initialisation |
//! | [`vendor`] | `Vendor` contract, `VendorError`, identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use deliverable_core::{Aggregator, LocationCache, Postcode, VendorCatalog};
//!
//! let cache = LocationCache::open(Default::default())?;
//! let catalog = VendorCatalog::builder()
//!     .with_location_store(Arc::new(cache))
//!     .with_builtin_vendors()
//!     .build();
//!
//! let report = Aggregator::new(catalog)
//!     .resolve_all(&Postcode::new("ABCD 1EF"))
//!     .await;
//! println!("{}", serde_json::to_string(&report)?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Web      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Aggregator    │────▶│  VendorCatalog   │
//! └────────┬────────┘     └──────────────────┘
//!          │ join_all
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Vendor adapters │────▶│ VendorSession    │──▶ HttpClient
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ LocationCache   │
//! │ (DuckDB)        │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Definitive negatives are `Ok(false)`. Faults carry a [`VendorErrorKind`]:
//!
//! ```rust
//! use deliverable_core::{VendorError, VendorErrorKind};
//!
//! fn describe(error: &VendorError) -> &'static str {
//!     match error.kind() {
//!         VendorErrorKind::Unavailable => "vendor unreachable",
//!         VendorErrorKind::Malformed => "unexpected vendor payload",
//!         VendorErrorKind::LocationUnconfirmed => "session location not acknowledged",
//!         VendorErrorKind::Cache => "location cache failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http_client;
pub mod location_store;
pub mod session;
pub mod telemetry;
pub mod vendor;

#[cfg(test)]
mod test_support;

// Adapter implementations
pub use adapters::{
    AdapterOptions, DominosAdapter, PizzaHutAdapter, UberEatsAdapter, UberEatsBrand,
    DEFAULT_USER_AGENT,
};

// Aggregation
pub use aggregator::{Aggregator, DeliveryReport, OutcomeError, VendorOutcome, VendorSummary};

// Catalog
pub use catalog::{VendorCatalog, VendorCatalogBuilder, VendorSettings};

// Configuration
pub use config::{DeliverableConfig, ServerConfig, TelemetryConfig};

// Error types
pub use error::{ConfigError, DeliveryError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

// Location cache (re-exported from deliverable-cache)
pub use deliverable_cache::{CacheError, LocationCache, LocationCacheConfig};
pub use location_store::{LocationFuture, LocationStore, LocationStoreError, MemoryLocationStore};

pub use session::VendorSession;
pub use telemetry::TelemetryError;

// Vendor contract
pub use vendor::{
    CanDeliver, Postcode, Vendor, VendorError, VendorErrorKind, VendorFactory, VendorFuture,
    VendorId,
};
