//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `partner_scout` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing the JSON report
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use partner_scout::cli::{run, Cli};
use partner_scout::initialization::init_logger_with;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists); PARTNER_SINK_DIR usually lives there
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = cli.global.log_level.clone();
    let log_format = cli.global.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run(cli).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("partner_scout error: {:#}", e);
            process::exit(1);
        }
    }
}
