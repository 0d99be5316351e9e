use anyhow::{Context, Result};
use article::ArticleExtractor;
use common::{Config, Pipeline, PipelineOptions, RunReport};
use reddit::RedditFeed;
use store::SqlArticleStore;
use tracing::{info, warn};

/// Builds the Reddit → article → SQLite pipeline from configuration and
/// runs it once for the configured topic and limit.
pub async fn run_pipeline(config: &Config) -> Result<RunReport> {
    let source = RedditFeed::new(&config.reddit)?;
    let enricher = ArticleExtractor::new(&config.article)?;
    let store = SqlArticleStore::connect(&config.database.url)
        .await
        .context("opening article store")?;

    let pipeline = Pipeline::new(
        source,
        enricher,
        store,
        PipelineOptions::from(&config.pipeline),
    );

    let report = pipeline
        .run(&config.pipeline.topic, config.pipeline.limit)
        .await?;
    log_report(&report);
    Ok(report)
}

pub fn log_report(report: &RunReport) {
    for (url, error) in &report.errors {
        warn!("Not stored: {} ({})", url, error);
    }
    info!(
        "Stored {} new articles from {} candidates ({} enriched, {} failed, {} leading skipped) in {:.2?}",
        report.persisted,
        report.attempted,
        report.enriched,
        report.errors.len(),
        report.skipped_leading,
        report.elapsed
    );
}
