use chrono::{DateTime, Utc};
use serde::Serialize;

use medsynth_generate::{ArtifactFormat, DatasetSummary};

/// One uploaded object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtifactReport {
    pub key: String,
    pub collection: String,
    pub format: ArtifactFormat,
    pub content_type: String,
    pub rows: usize,
    pub bytes: u64,
}

/// Outcome of publishing one environment.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    pub environment: String,
    pub prefix: String,
    /// Objects deleted from the prefix before upload.
    pub cleared: usize,
    pub dataset: DatasetSummary,
    pub artifacts: Vec<ArtifactReport>,
    pub duration_ms: u64,
}

/// Report for a full run across environments.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub backend: String,
    pub bucket: String,
    pub window_start: String,
    pub window_end: String,
    pub seed: Option<u64>,
    pub environments: Vec<EnvironmentReport>,
    pub duration_ms: u64,
}
