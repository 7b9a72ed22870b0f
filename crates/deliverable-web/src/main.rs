use std::sync::Arc;

use deliverable_core::{telemetry, Aggregator, DeliverableConfig, LocationCache, VendorCatalog};
use deliverable_web::{router, WebError};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), WebError> {
    let config = DeliverableConfig::from_env()?;
    telemetry::init(&config.telemetry)?;

    let cache = LocationCache::open(config.cache_config())?;
    info!(cache = %cache.db_path().display(), "location cache ready");

    let aggregator = Aggregator::new(
        VendorCatalog::builder()
            .with_location_store(Arc::new(cache))
            .with_settings(config.vendors.clone())
            .with_builtin_vendors()
            .build(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "deliverable web listening");

    axum::serve(listener, router(aggregator)).await?;
    Ok(())
}
