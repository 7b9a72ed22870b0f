//! # Deliverable Web
//!
//! HTTP front door over [`deliverable_core::Aggregator`].
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /delivery/food/{postcode}` | Report for every vendor |
//! | `GET /delivery/food/{vendor}/{postcode}` | `{"<name>": {"can_deliver": bool}}` |
//! | `GET /health` | `{"status": "ok"}` |
//!
//! An unknown vendor answers 404 and a failing vendor 502, both with a
//! `detail` message.

pub mod error;
pub mod routes;

pub use error::WebError;
pub use routes::router;
