use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use deliverable_core::{CacheError, ConfigError, DeliveryError, TelemetryError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("location cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        match self {
            Self::Delivery(DeliveryError::UnknownVendor { .. }) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            }
            Self::Delivery(DeliveryError::Vendor { source, .. }) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "detail": detail, "code": source.code() })),
            )
                .into_response(),
            Self::Config(_) | Self::Telemetry(_) | Self::Cache(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
        }
    }
}
