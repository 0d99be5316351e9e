use std::time::Instant;

use anyhow::Result;
use common::Config;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let started = Instant::now();
    let config = Config::from_env()?;
    info!(
        "Ingesting r/{} (limit {})",
        config.pipeline.topic, config.pipeline.limit
    );

    let outcome = orchestrator::run_pipeline(&config).await;
    info!("Finished in {:.2?}", started.elapsed());

    match outcome {
        Ok(_) => {
            info!("success");
            Ok(())
        }
        Err(e) => {
            error!("failed: {:#}", e);
            Err(e)
        }
    }
}
