mod cache;
mod check;
mod vendors;

use std::sync::Arc;

use deliverable_core::{Aggregator, DeliverableConfig, LocationCache, VendorCatalog};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// JSON document to print plus the number of vendors that failed.
#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub failures: usize,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self { data, failures: 0 }
    }

    pub fn with_failures(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }
}

pub async fn run(cli: &Cli, config: &DeliverableConfig) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Check(args) => {
            let cache = LocationCache::open(config.cache_config())?;
            let aggregator = Aggregator::new(
                VendorCatalog::builder()
                    .with_location_store(Arc::new(cache))
                    .with_settings(config.vendors.clone())
                    .with_builtin_vendors()
                    .build(),
            );
            check::run(args, &aggregator).await
        }
        Command::Vendors => {
            let aggregator = Aggregator::new(
                VendorCatalog::builder()
                    .with_settings(config.vendors.clone())
                    .with_builtin_vendors()
                    .build(),
            );
            vendors::run(&aggregator)
        }
        Command::Cache(args) => {
            let cache = LocationCache::open(config.cache_config())?;
            cache::run(args, &cache)
        }
    }
}
