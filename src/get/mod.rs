pub(crate) mod logic;

use anyhow::Result;
use crate::config::AppConfig;

/// Public entry point for the get process.
/// Exports every stored script into package directories under the base directory.
pub async fn run_get_flow(app_config: &AppConfig) -> Result<logic::GetSummary> {
    let get_config = match &app_config.operation {
        Some(crate::config::OperationConfig::Get(cfg)) => cfg,
        _ => anyhow::bail!("Get operation selected but no get configuration found."),
    };

    logic::perform_get_orchestration(app_config, get_config).await
}
