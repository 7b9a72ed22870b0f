use deliverable_core::{Aggregator, Postcode};
use serde_json::{Map, Value};
use tracing::info;

use crate::cli::CheckArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &CheckArgs, aggregator: &Aggregator) -> Result<CommandResult, CliError> {
    let postcode = Postcode::new(args.postcode.clone());

    if let Some(slug) = &args.vendor {
        let (name, record) = aggregator.resolve_one(slug, &postcode).await?;
        let mut data = Map::new();
        data.insert(name, serde_json::to_value(record)?);
        return Ok(CommandResult::ok(Value::Object(data)));
    }

    let report = aggregator.resolve_all(&postcode).await;
    info!(
        postcode = %postcode,
        vendors = report.len(),
        failures = report.failures(),
        "delivery check complete"
    );
    Ok(CommandResult::ok(serde_json::to_value(&report)?).with_failures(report.failures()))
}
