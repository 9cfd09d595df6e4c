//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_location` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Event printing and the exit code policy
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_location::app::print_event;
use ip_location::initialization::init_logger_with;
use ip_location::{run_lookup, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting IP_LOCATION_ENDPOINT in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format.clone())
        .context("Failed to initialize logger")?;

    let fail_on = config.fail_on.clone();
    match run_lookup(config).await {
        Ok(report) => {
            for event in &report.events {
                print_event(event, &log_format);
            }
            let code = report.exit_code(&fail_on);
            if code != 0 {
                process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("ip_location error: {:#}", e);
            process::exit(1);
        }
    }
}
