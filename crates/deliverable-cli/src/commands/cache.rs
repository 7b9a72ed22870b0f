use deliverable_core::LocationCache;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{CacheArgs, CacheCommand};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CacheEntryView<'a> {
    postcode: &'a str,
    db_path: String,
    entry: Option<Value>,
}

#[derive(Debug, Serialize)]
struct EvictionView<'a> {
    postcode: &'a str,
    evicted: bool,
}

pub fn run(args: &CacheArgs, cache: &LocationCache) -> Result<CommandResult, CliError> {
    let data = match &args.command {
        CacheCommand::Show(target) => serde_json::to_value(CacheEntryView {
            postcode: &target.postcode,
            db_path: cache.db_path().display().to_string(),
            entry: cache.raw(&target.postcode)?,
        })?,
        CacheCommand::Evict(target) => serde_json::to_value(EvictionView {
            postcode: &target.postcode,
            evicted: cache.evict(&target.postcode)?,
        })?,
    };
    Ok(CommandResult::ok(data))
}
