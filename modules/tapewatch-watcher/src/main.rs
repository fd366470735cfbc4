use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tapewatch_common::Config;
use tapewatch_watcher::watcher::Watcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tapewatch_watcher=info".parse()?)
                .add_directive("tapewatch_common=info".parse()?),
        )
        .init();

    info!("Tapewatch starting...");

    // Load config
    let config = Config::from_env();
    config.log_redacted();

    // Run one poll cycle
    let watcher = Watcher::from_config(config);
    let stats = watcher.run().await?;
    info!("Watch run complete. {stats}");

    Ok(())
}
