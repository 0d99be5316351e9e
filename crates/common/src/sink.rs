use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::crawler::ArticleStore;
use crate::error::{PipelineError, PipelineResult};
use crate::models::NormalizedRecord;

/// Filters a batch against the ids already stored and appends the rest.
///
/// The exists-check and the append are two separate store calls, so two
/// sinks writing to the same store at once can race. Runs must be
/// serialized by the caller.
pub struct DedupSink<S> {
    store: S,
}

impl<S: ArticleStore> DedupSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn persist(&self, batch: Vec<NormalizedRecord>) -> PipelineResult<u64> {
        let received = batch.len();
        let mut seen = self.store.existing_ids().await?;

        let fresh: Vec<NormalizedRecord> = batch
            .into_iter()
            .filter(|record| seen.insert(record.post_id.clone()))
            .collect();

        if fresh.is_empty() {
            info!("No new articles to store ({} already present)", received);
            return Ok(0);
        }

        let written = self.store.append(&fresh).await?;
        info!(
            "Stored {} new articles ({} duplicates dropped)",
            written,
            received - fresh.len()
        );
        Ok(written)
    }
}

/// Process-local store, mainly for exercising the pipeline without a database.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<NormalizedRecord>>,
    appends: AtomicUsize,
    fail_appends: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<NormalizedRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// A store whose appends always fail.
    pub fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<NormalizedRecord> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn ids(&self) -> Vec<String> {
        self.rows().into_iter().map(|row| row.post_id).collect()
    }

    /// Number of append calls that reached the store.
    pub fn append_calls(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn existing_ids(&self) -> PipelineResult<HashSet<String>> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        Ok(rows.iter().map(|row| row.post_id.clone()).collect())
    }

    async fn append(&self, rows: &[NormalizedRecord]) -> PipelineResult<u64> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends {
            return Err(PipelineError::Store("append rejected".into()));
        }

        let mut stored = self
            .rows
            .lock()
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        if let Some(dup) = rows
            .iter()
            .find(|row| stored.iter().any(|existing| existing.post_id == row.post_id))
        {
            return Err(PipelineError::Store(format!(
                "duplicate post_id {}",
                dup.post_id
            )));
        }
        stored.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }
}
