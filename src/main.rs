// src/main.rs
//
// Rebuilds tmdb_index from the content snapshot in one sequential pass.
// Exit status: 0 when the walk completes (failed partition writes included),
// 1 when configuration or a read fails.

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tmdb_indexer::{FirebaseRestStore, IndexService, IndexerConfig, RemoteStore, RunReport};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. LOGGING
    // `log` records are forwarded to the subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(report) => {
            for partition in report.failed_partitions() {
                warn!("Partition {} was not written", partition.name);
            }
            info!("TMDB index generation completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error generating TMDB index: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<RunReport> {
    // 2. CONFIGURATION
    let config = IndexerConfig::load()?;
    info!("Using database {}", config.database_url);

    // 3. STORE
    let store: Arc<dyn RemoteStore> = Arc::new(FirebaseRestStore::from_config(&config)?);

    // 4. RUN
    let report = IndexService::new(store, config).run().await?;
    Ok(report)
}
