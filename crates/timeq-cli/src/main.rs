//! `timeq` CLI — resolve compact time expressions into query boundaries.
//!
//! ## Usage
//!
//! ```sh
//! # A single point in time: one hour ago
//! timeq point -- -1h
//!
//! # A half-open range: from two hours ago to one hour ago
//! timeq range --start -2h --end -1h
//!
//! # Yesterday truncated to midnight, against a pinned reference instant
//! timeq point --at 2024-03-15T02:30:00Z -- -1d0h
//! ```
//!
//! Output is the resolved window as pretty-printed JSON
//! (`time_sec`/`start_sec`/`end_sec` seconds-since-epoch, plus an `error`
//! string when the query degraded to the fallback window).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use timeq_engine::run_query;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timeq",
    version,
    about = "Resolve compact relative-time expressions into Unix-timestamp query boundaries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reference instant as RFC 3339 (defaults to the current time)
    #[arg(long, global = true)]
    at: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single point in time
    Point {
        /// Time expression, e.g. "-1d" or "-2h30f"
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Resolve a half-open time range
    Range {
        /// Start expression (empty means the reference instant)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        start: String,
        /// End expression (empty means the reference instant)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        end: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = match &cli.at {
        Some(instant) => DateTime::parse_from_rfc3339(instant)
            .with_context(|| format!("invalid --at instant '{instant}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let window = match &cli.command {
        Commands::Point { expr } => run_query("point", expr, "", "", now),
        Commands::Range { start, end } => run_query("range", "", start, end, now),
    };

    println!("{}", serde_json::to_string_pretty(&window)?);
    Ok(())
}
