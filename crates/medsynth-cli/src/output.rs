use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use medsynth_generate::{ArtifactFormat, Dataset, DatasetSummary, GenerationError};
use medsynth_publish::ARTIFACTS;

/// One artifact written by `generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    pub rows: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedEnvironment {
    pub dataset: DatasetSummary,
    pub files: Vec<GeneratedFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("invalid output path: {0}")]
    InvalidPath(PathBuf),
}

/// Encode every artifact of `dataset` into `dir/<prefix>/`, using the same
/// object names a publish run would.
pub fn write_dataset(
    dir: &Path,
    prefix: &str,
    dataset: &Dataset,
) -> Result<GeneratedEnvironment, OutputError> {
    let env_dir = dir.join(prefix.trim_end_matches('/'));
    let mut files = Vec::with_capacity(ARTIFACTS.len());
    for spec in &ARTIFACTS {
        let collection = spec.collection_of(dataset);
        let body = collection.encode(spec.format)?;
        let path = env_dir.join(spec.filename);
        write_bytes_atomic(&path, &body)?;
        tracing::info!(
            event = "artifact_written",
            path = %path.display(),
            rows = collection.len(),
            bytes = body.len()
        );
        files.push(GeneratedFile {
            path,
            format: spec.format,
            rows: collection.len(),
            bytes: body.len() as u64,
        });
    }
    Ok(GeneratedEnvironment {
        dataset: DatasetSummary::from(dataset),
        files,
    })
}

/// Pretty JSON to `path`, or to stdout when no path is given.
pub fn emit_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), OutputError> {
    let data = serde_json::to_vec_pretty(value)?;
    match path {
        Some(path) => {
            write_bytes_atomic(path, &data)?;
            tracing::info!(event = "report_written", path = %path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, OutputError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::InvalidPath(path.to_path_buf()))?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use medsynth_core::DateWindow;
    use medsynth_generate::{GenerateOptions, GenerationEngine};

    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("medsynth_cli_{label}_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn writes_all_artifacts_under_prefix() {
        let dir = temp_dir("generate");
        let engine = GenerationEngine::new(GenerateOptions {
            window: DateWindow::new(
                NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            )
            .unwrap(),
            seed: Some(3),
            max_id_attempts: 8,
        });
        let dataset = engine.generate_counts("dev", 5, 5, 5).unwrap();

        let written = write_dataset(&dir, "dev/", &dataset).unwrap();
        assert_eq!(written.dataset.patients, 5);
        let names: Vec<_> = written
            .files
            .iter()
            .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["patient_data.csv", "ehr_data.json", "claims_data.parquet"]
        );
        for file in &written.files {
            assert!(file.path.starts_with(dir.join("dev")));
            assert_eq!(std::fs::metadata(&file.path).unwrap().len(), file.bytes);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn report_file_replaces_previous_content() {
        let dir = temp_dir("report");
        let path = dir.join("report.json");
        emit_json(&serde_json::json!({"run": 1, "padding": "x".repeat(64)}), Some(&path)).unwrap();
        emit_json(&serde_json::json!({"run": 2}), Some(&path)).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"run": 2}));
        assert!(!dir.join("report.json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
