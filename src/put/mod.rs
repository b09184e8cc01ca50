pub(crate) mod logic;

use anyhow::Result;
use crate::config::AppConfig;

/// Public entry point for the put process.
/// Uploads the package's script files using the resolved put configuration.
pub async fn run_put_flow(app_config: &AppConfig) -> Result<logic::PutSummary> {
    let put_config = match &app_config.operation {
        Some(crate::config::OperationConfig::Put(cfg)) => cfg,
        _ => anyhow::bail!("Put operation selected but no put configuration found."),
    };

    logic::perform_put_orchestration(app_config, put_config).await
}
