use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::PipelineResult;
use crate::models::{CandidateRecord, EnrichedContent, NormalizedRecord};

/// A ranked external feed. The returned stream is lazy, finite and can only
/// be consumed once; an unreachable upstream surfaces as a
/// `SourceUnavailable` item.
pub trait FeedSource: Send + Sync {
    fn fetch<'a>(
        &'a self,
        topic: &'a str,
        limit: usize,
    ) -> BoxStream<'a, PipelineResult<CandidateRecord>>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait ContentEnricher: Send + Sync {
    async fn enrich(&self, url: &str) -> PipelineResult<EnrichedContent>;
}

#[async_trait]
impl<T: ContentEnricher + ?Sized> ContentEnricher for Arc<T> {
    async fn enrich(&self, url: &str) -> PipelineResult<EnrichedContent> {
        (**self).enrich(url).await
    }
}

/// Append-only persistence keyed by `post_id`.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn existing_ids(&self) -> PipelineResult<HashSet<String>>;

    /// Writes all rows in one bulk operation and returns the number written.
    async fn append(&self, rows: &[NormalizedRecord]) -> PipelineResult<u64>;
}

#[async_trait]
impl<T: ArticleStore + ?Sized> ArticleStore for Arc<T> {
    async fn existing_ids(&self) -> PipelineResult<HashSet<String>> {
        (**self).existing_ids().await
    }

    async fn append(&self, rows: &[NormalizedRecord]) -> PipelineResult<u64> {
        (**self).append(rows).await
    }
}
