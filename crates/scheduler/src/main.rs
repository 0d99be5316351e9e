use std::sync::Arc;

use anyhow::Result;
use common::Config;
use scheduler::PipelineScheduler;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    let _ = dotenv::dotenv();

    // Configure tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Arc::new(Config::from_env()?);
    let schedule = config.pipeline.schedule.clone();
    info!(
        "Starting scheduler for r/{} (limit {})",
        config.pipeline.topic, config.pipeline.limit
    );

    let mut scheduler = PipelineScheduler::new().await?;
    scheduler
        .add_exclusive_job(&schedule, move || {
            let config = config.clone();
            async move {
                orchestrator::run_pipeline(&config).await?;
                Ok(())
            }
        })
        .await?;

    info!("Scheduler configured with cron '{}'", schedule);
    info!("Press Ctrl+C to stop the scheduler");

    tokio::select! {
        result = scheduler.run_forever() => {
            result?;
            info!("Scheduler stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received interrupt signal, shutting down...");
        }
    }
    scheduler.shutdown().await?;

    Ok(())
}
