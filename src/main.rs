//! Script Sync Tool
//!
//! Puts package scripts from the filesystem into the database and gets them back

// scriptsync/src/main.rs
mod cli;
mod config;
mod db;
mod errors;
mod get;
mod put;
mod utils;

use anyhow::{Context, Result};
use cli::Cli;
use config::{AppConfig, DATABASE_URL_ENV, OperationConfig, resolve_operation};
use errors::AppError;
use std::env;
use std::process::ExitCode;
use utils::redact_url;

/// Main entry point for the script sync tool
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    utils::init_logging(cli.verbose);

    match run_app(cli).await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(AppError::Usage(msg)) => eprintln!("{}", msg),
                _ => eprintln!("❌ Error: {:?}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_app(cli: Cli) -> Result<()> {
    // a missing .env is the normal case
    let _ = dotenv::dotenv();

    let mut app_config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load application configuration")?;

    let operation = resolve_operation(
        &cli,
        &app_config.raw_json_config,
        env::var(DATABASE_URL_ENV).ok(),
    )?;
    app_config.options.show_progress |= cli.progress;

    match operation {
        OperationConfig::Get(get_config) => {
            println!(
                "🚀 Starting Get Process: {} -> {}",
                redact_url(&get_config.db_url),
                get_config.base_dir.display()
            );
            app_config.operation = Some(OperationConfig::Get(get_config));
            get::run_get_flow(&app_config).await.context("Get process failed")?;
        }
        OperationConfig::Put(put_config) => {
            println!(
                "🚀 Starting Put Process: package {} -> {}",
                put_config.package,
                redact_url(&put_config.db_url)
            );
            app_config.operation = Some(OperationConfig::Put(put_config));
            put::run_put_flow(&app_config).await.context("Put process failed")?;
        }
    }
    Ok(())
}
