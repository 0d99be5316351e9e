use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Feed source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Article parsing failed: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Snapshot write failed: {0}")]
    Snapshot(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Per-candidate failures that the driver records and moves past.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::Fetch(_) | PipelineError::Parse(_))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_enrichment_failures_are_recoverable() {
        assert!(PipelineError::Fetch("403 Forbidden".into()).is_recoverable());
        assert!(PipelineError::Parse("no body".into()).is_recoverable());
        assert!(!PipelineError::SourceUnavailable("down".into()).is_recoverable());
        assert!(!PipelineError::Store("locked".into()).is_recoverable());
    }
}
