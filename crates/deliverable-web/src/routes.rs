use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use deliverable_core::{Aggregator, CanDeliver, DeliveryReport, Postcode};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::WebError;

#[derive(Clone)]
struct AppState {
    aggregator: Arc<Aggregator>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

/// Build the service router over `aggregator`.
pub fn router(aggregator: Aggregator) -> Router {
    let state = AppState {
        aggregator: Arc::new(aggregator),
    };

    Router::new()
        .route("/health", get(health))
        .route("/delivery/food/:postcode", get(all_vendors))
        .route("/delivery/food/:vendor/:postcode", get(one_vendor))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn all_vendors(
    State(state): State<AppState>,
    Path(postcode): Path<String>,
) -> Json<DeliveryReport> {
    Json(state.aggregator.resolve_all(&Postcode::new(postcode)).await)
}

async fn one_vendor(
    State(state): State<AppState>,
    Path((vendor, postcode)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, CanDeliver>>, WebError> {
    let (name, record) = state
        .aggregator
        .resolve_one(&vendor, &Postcode::new(postcode))
        .await?;

    Ok(Json(BTreeMap::from([(name, record)])))
}
