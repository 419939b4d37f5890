//! SleepLog - Main Entry Point

use anyhow::Context;
use api::settings::Settings;
use api::{init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    init_logging(&settings.log)?;

    info!("=== SleepLog v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(settings).await
}
