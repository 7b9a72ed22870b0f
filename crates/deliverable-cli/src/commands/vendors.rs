use deliverable_core::Aggregator;

use crate::error::CliError;

use super::CommandResult;

pub fn run(aggregator: &Aggregator) -> Result<CommandResult, CliError> {
    let vendors = serde_json::to_value(aggregator.vendors())?;
    Ok(CommandResult::ok(serde_json::json!({ "vendors": vendors })))
}
