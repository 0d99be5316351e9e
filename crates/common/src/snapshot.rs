use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::NormalizedRecord;

/// Writes the batch as a JSON object keyed by `post_id`, replacing the file.
pub async fn write_snapshot(path: &Path, records: &[NormalizedRecord]) -> PipelineResult<()> {
    let by_id: BTreeMap<&str, &NormalizedRecord> = records
        .iter()
        .map(|record| (record.post_id.as_str(), record))
        .collect();

    let json = serde_json::to_vec_pretty(&by_id)
        .map_err(|e| PipelineError::Snapshot(e.to_string()))?;
    tokio::fs::write(path, json).await?;

    debug!("Wrote snapshot of {} articles to {}", by_id.len(), path.display());
    Ok(())
}

pub async fn read_snapshot(path: &Path) -> PipelineResult<BTreeMap<String, NormalizedRecord>> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| PipelineError::Snapshot(e.to_string()))
}
