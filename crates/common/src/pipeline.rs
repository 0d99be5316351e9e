use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::crawler::{ArticleStore, ContentEnricher, FeedSource};
use crate::error::{PipelineError, PipelineResult};
use crate::models::NormalizedRecord;
use crate::sink::DedupSink;
use crate::snapshot::write_snapshot;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub skip_leading: usize,
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_every: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            skip_leading: config.skip_leading,
            snapshot_path: config.snapshot_path.clone(),
            snapshot_every: config.snapshot_every.max(1),
        }
    }
}

/// Outcome of one run. Per-candidate enrichment failures land in `errors`;
/// fatal failures are returned as `Err` from [`Pipeline::run`] instead.
#[derive(Debug, Default)]
pub struct RunReport {
    pub attempted: usize,
    pub enriched: usize,
    pub persisted: u64,
    pub skipped_leading: usize,
    pub errors: Vec<(String, PipelineError)>,
    pub elapsed: Duration,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted {}, enriched {}, persisted {}, failed {} in {:.2?}",
            self.attempted,
            self.enriched,
            self.persisted,
            self.errors.len(),
            self.elapsed
        )
    }
}

/// Fetch → enrich → assemble → flush, once per run.
///
/// Candidates are enriched one at a time. Nothing reaches the store until
/// the feed is exhausted, so an interrupted run leaves the store untouched.
pub struct Pipeline<F, E, S> {
    source: F,
    enricher: E,
    sink: DedupSink<S>,
    options: PipelineOptions,
}

impl<F, E, S> Pipeline<F, E, S>
where
    F: FeedSource,
    E: ContentEnricher,
    S: ArticleStore,
{
    pub fn new(source: F, enricher: E, store: S, options: PipelineOptions) -> Self {
        Self {
            source,
            enricher,
            sink: DedupSink::new(store),
            options,
        }
    }

    pub fn store(&self) -> &S {
        self.sink.store()
    }

    pub async fn run(&self, topic: &str, limit: usize) -> PipelineResult<RunReport> {
        let started = Instant::now();
        let mut report = RunReport::default();
        let mut batch: Vec<NormalizedRecord> = Vec::new();

        info!(
            "Fetching up to {} posts from {} topic '{}'",
            limit,
            self.source.name(),
            topic
        );
        let mut feed = self.source.fetch(topic, limit);
        let mut position = 0usize;

        while let Some(candidate) = feed.next().await {
            let candidate = candidate?;
            position += 1;

            if position <= self.options.skip_leading {
                debug!("Skipping leading feed item {} ({})", candidate.id, candidate.title);
                report.skipped_leading += 1;
                continue;
            }

            report.attempted += 1;
            match self.enricher.enrich(&candidate.url).await {
                Ok(enriched) => {
                    debug!("Enriched {} from {}", candidate.id, candidate.url);
                    report.enriched += 1;
                    batch.push(NormalizedRecord::assemble(candidate, enriched));
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping {} ({}): {}", candidate.id, candidate.url, e);
                    report.errors.push((candidate.url, e));
                }
                Err(e) => return Err(e),
            }

            if report.attempted % self.options.snapshot_every.max(1) == 0 {
                self.checkpoint(&batch).await;
            }
        }
        drop(feed);

        self.checkpoint(&batch).await;

        info!("Flushing {} enriched articles", batch.len());
        report.persisted = self.sink.persist(batch).await?;
        report.elapsed = started.elapsed();

        info!("Pipeline run finished: {}", report);
        Ok(report)
    }

    async fn checkpoint(&self, batch: &[NormalizedRecord]) {
        if let Some(path) = self.options.snapshot_path.as_deref() {
            save_snapshot(path, batch).await;
        }
    }
}

async fn save_snapshot(path: &Path, batch: &[NormalizedRecord]) {
    if let Err(e) = write_snapshot(path, batch).await {
        warn!("Could not write snapshot to {}: {}", path.display(), e);
    }
}
