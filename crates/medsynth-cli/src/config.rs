use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medsynth_core::{DEFAULT_BUCKET, DEFAULT_WINDOW_START, EnvironmentPreset};
use medsynth_publish::S3Settings;

const DEFAULT_LOCAL_ROOT: &str = "./bucket-data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process store; nothing survives the run.
    Memory,
    /// One directory per bucket under `root`.
    #[default]
    Local,
    /// AWS S3 or an S3-interoperable endpoint.
    S3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: BackendKind,
    pub root: PathBuf,
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            root: PathBuf::from(DEFAULT_LOCAL_ROOT),
            endpoint: None,
            region: None,
        }
    }
}

impl StorageSettings {
    pub fn s3(&self) -> S3Settings {
        S3Settings {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
        }
    }
}

/// Contents of `medsynth.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bucket: String,
    pub window_start: NaiveDate,
    pub seed: Option<u64>,
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            window_start: DEFAULT_WINDOW_START,
            seed: None,
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(bucket) = &overrides.bucket {
            self.bucket = bucket.clone();
        }
        if let Some(backend) = overrides.backend {
            self.storage.backend = backend;
        }
        if let Some(root) = &overrides.root {
            self.storage.root = root.clone();
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.storage.endpoint = Some(endpoint.clone());
        }
        if let Some(region) = &overrides.region {
            self.storage.region = Some(region.clone());
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Target bucket name.
    #[arg(long, global = true)]
    pub bucket: Option<String>,
    /// Storage backend.
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendKind>,
    /// Root directory of the local backend.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
    /// Custom S3 endpoint, e.g. https://storage.googleapis.com.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// S3 region.
    #[arg(long, global = true)]
    pub region: Option<String>,
    /// Seed for reproducible batches.
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

/// Which fixed environments a command applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EnvSelection {
    Dev,
    Prod,
    #[default]
    All,
}

impl EnvSelection {
    pub fn presets(self) -> Vec<EnvironmentPreset> {
        match self {
            EnvSelection::Dev => vec![EnvironmentPreset::DEV],
            EnvSelection::Prod => vec![EnvironmentPreset::PROD],
            EnvSelection::All => EnvironmentPreset::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").expect("parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bucket, "health-data-bucket-ju");
        assert_eq!(settings.storage.backend, BackendKind::Local);
        assert_eq!(settings.storage.root, PathBuf::from("./bucket-data"));
    }

    #[test]
    fn parses_full_file() {
        let settings: Settings = toml::from_str(
            r#"
bucket = "synthetic-health"
window_start = "2025-04-01"
seed = 42

[storage]
backend = "s3"
endpoint = "https://storage.googleapis.com"
region = "auto"
"#,
        )
        .expect("parse");

        assert_eq!(settings.bucket, "synthetic-health");
        assert_eq!(
            settings.window_start,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.storage.backend, BackendKind::S3);
        assert_eq!(settings.storage.root, PathBuf::from("./bucket-data"));
        let s3 = settings.storage.s3();
        assert_eq!(s3.endpoint.as_deref(), Some("https://storage.googleapis.com"));
        assert_eq!(s3.region.as_deref(), Some("auto"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let result = toml::from_str::<Settings>("[storage]\nbackend = \"ftp\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut settings = Settings {
            seed: Some(1),
            ..Settings::default()
        };
        settings.apply(&Overrides {
            bucket: Some("other".to_string()),
            backend: Some(BackendKind::Memory),
            seed: Some(7),
            ..Overrides::default()
        });
        assert_eq!(settings.bucket, "other");
        assert_eq!(settings.storage.backend, BackendKind::Memory);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.storage.endpoint, None);
    }

    #[test]
    fn load_without_path_is_default_and_missing_file_errors() {
        assert_eq!(Settings::load(None).expect("defaults"), Settings::default());
        let missing = std::env::temp_dir().join(format!("medsynth-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn selection_expands_to_presets() {
        assert_eq!(EnvSelection::Dev.presets(), vec![EnvironmentPreset::DEV]);
        let all: Vec<_> = EnvSelection::All
            .presets()
            .iter()
            .map(|preset| preset.prefix)
            .collect();
        assert_eq!(all, vec!["dev/", "prod/"]);
    }
}
