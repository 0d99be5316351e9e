pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod snapshot;

pub use config::Config;
pub use crawler::{ArticleStore, ContentEnricher, FeedSource};
pub use error::{PipelineError, PipelineResult};
pub use models::{normalize_whitespace, CandidateRecord, EnrichedContent, NormalizedRecord};
pub use pipeline::{Pipeline, PipelineOptions, RunReport};
pub use sink::{DedupSink, MemoryStore};
