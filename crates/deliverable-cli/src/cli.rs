//! CLI argument definitions for deliverable.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Ask every vendor (or one) whether it delivers to a postcode |
//! | `vendors` | List registered vendor slugs and names |
//! | `cache show` | Print the stored location entry for a postcode |
//! | `cache evict` | Remove the stored location entry for a postcode |
//!
//! # Examples
//!
//! ```bash
//! deliverable check "NW9 9ED" --pretty
//! deliverable check "NW9 9ED" --vendor dominos
//! deliverable cache evict "NW9 9ED"
//! ```

use clap::{Args, Parser, Subcommand};

/// Food delivery availability by postcode.
#[derive(Debug, Parser)]
#[command(
    name = "deliverable",
    author,
    version,
    about = "Ask food delivery vendors whether they deliver to a postcode"
)]
pub struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check delivery availability for a postcode.
    Check(CheckArgs),
    /// List registered vendors.
    Vendors,
    /// Inspect or maintain the location cache.
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Postcode, used verbatim.
    pub postcode: String,

    /// Only ask the vendor with this slug (e.g. `dominos`).
    #[arg(long)]
    pub vendor: Option<String>,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print the stored entry, creation stamp included.
    Show(PostcodeArgs),
    /// Delete the stored entry.
    Evict(PostcodeArgs),
}

#[derive(Debug, Args)]
pub struct PostcodeArgs {
    pub postcode: String,
}
