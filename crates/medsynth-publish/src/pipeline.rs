//! Per-environment publish sequence.
//!
//! For each environment: clear the prefix, generate a fresh batch, upload the
//! patients as CSV, the encounters as NDJSON and the claims as Parquet. The
//! sequence is strictly ordered; the first failing call aborts the run and
//! already-written objects are left in place.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use medsynth_core::EnvironmentPreset;
use medsynth_generate::{ArtifactFormat, Collection, Dataset, DatasetSummary, GenerationEngine};

use crate::errors::PublishError;
use crate::publisher::Publisher;
use crate::report::{EnvironmentReport, RunReport};
use crate::store::ObjectStore;

/// Which collection of a [`Dataset`] an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetPart {
    Patients,
    Encounters,
    Claims,
}

/// Object name and format of one published collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub part: DatasetPart,
    pub filename: &'static str,
    pub format: ArtifactFormat,
}

/// Artifacts written per environment, in upload order.
pub const ARTIFACTS: [ArtifactSpec; 3] = [
    ArtifactSpec {
        part: DatasetPart::Patients,
        filename: "patient_data.csv",
        format: ArtifactFormat::Csv,
    },
    ArtifactSpec {
        part: DatasetPart::Encounters,
        filename: "ehr_data.json",
        format: ArtifactFormat::NdJson,
    },
    ArtifactSpec {
        part: DatasetPart::Claims,
        filename: "claims_data.parquet",
        format: ArtifactFormat::Parquet,
    },
];

impl ArtifactSpec {
    /// Borrow the matching collection out of `dataset`.
    pub fn collection_of<'a>(&self, dataset: &'a Dataset) -> Collection<'a> {
        match self.part {
            DatasetPart::Patients => Collection::Patients(&dataset.patients),
            DatasetPart::Encounters => Collection::Encounters(&dataset.encounters),
            DatasetPart::Claims => Collection::Claims(&dataset.claims),
        }
    }
}

/// Replace an environment's artifacts with a freshly generated batch.
pub async fn publish_environment<S: ObjectStore>(
    publisher: &Publisher<S>,
    engine: &GenerationEngine,
    preset: &EnvironmentPreset,
) -> Result<EnvironmentReport, PublishError> {
    let start = Instant::now();
    info!(
        event = "environment_started",
        environment = preset.name,
        prefix = preset.prefix,
        records = preset.records
    );

    let cleared = publisher.clear(preset.prefix).await?;
    let dataset = engine.generate(preset)?;

    let mut artifacts = Vec::with_capacity(ARTIFACTS.len());
    for spec in &ARTIFACTS {
        let report = publisher
            .publish(
                spec.collection_of(&dataset),
                preset.prefix,
                spec.filename,
                spec.format,
            )
            .await?;
        artifacts.push(report);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        event = "environment_finished",
        environment = preset.name,
        artifacts = artifacts.len(),
        duration_ms
    );

    Ok(EnvironmentReport {
        environment: preset.name.to_string(),
        prefix: preset.prefix.to_string(),
        cleared,
        dataset: DatasetSummary::from(&dataset),
        artifacts,
        duration_ms,
    })
}

/// Full run: verify connectivity, make sure the bucket exists, then publish
/// each preset in order.
///
/// A connectivity failure aborts before any generation. A bucket-creation
/// failure is logged and the run continues against the existing bucket.
pub async fn run<S: ObjectStore>(
    publisher: &Publisher<S>,
    engine: &GenerationEngine,
    presets: &[EnvironmentPreset],
) -> Result<RunReport, PublishError> {
    let start = Instant::now();
    let started_at = Utc::now();
    let run_id = uuid::Uuid::new_v4().to_string();
    info!(event = "run_started", run_id = %run_id, bucket = publisher.bucket());

    publisher.verify_connection().await?;

    if let Err(err) = publisher.ensure_target_exists().await {
        warn!(
            event = "bucket_setup_failed",
            bucket = publisher.bucket(),
            error = %err,
            "continuing with existing bucket"
        );
    }

    let mut environments = Vec::with_capacity(presets.len());
    for preset in presets {
        environments.push(publish_environment(publisher, engine, preset).await?);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(event = "run_finished", run_id = %run_id, status = "success", duration_ms);

    let options = engine.options();
    Ok(RunReport {
        run_id,
        started_at,
        backend: publisher.store().backend().to_string(),
        bucket: publisher.bucket().to_string(),
        window_start: options.window.start().to_string(),
        window_end: options.window.end().to_string(),
        seed: options.seed,
        environments,
        duration_ms,
    })
}
