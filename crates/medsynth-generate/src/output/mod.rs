//! Encoders for the three artifact formats.

pub mod csv;
pub mod ndjson;
pub mod parquet;

use std::fmt;

use serde::{Deserialize, Serialize};

use medsynth_core::{Claim, Encounter, Patient};

use crate::claims::ClaimsTable;
use crate::errors::GenerationError;

/// Serialization format of a published artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// One JSON object per line.
    #[serde(rename = "ndjson")]
    NdJson,
    /// Parquet with the collection's fixed Arrow schema.
    Parquet,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::NdJson => "ndjson",
            ArtifactFormat::Parquet => "parquet",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "text/csv",
            ArtifactFormat::NdJson => "application/json",
            ArtifactFormat::Parquet => "application/octet-stream",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed record collection ready to be encoded.
#[derive(Debug, Clone, Copy)]
pub enum Collection<'a> {
    Patients(&'a [Patient]),
    Encounters(&'a [Encounter]),
    Claims(&'a ClaimsTable),
}

impl Collection<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Patients(_) => "patients",
            Collection::Encounters(_) => "encounters",
            Collection::Claims(_) => "claims",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Patients(rows) => rows.len(),
            Collection::Encounters(rows) => rows.len(),
            Collection::Claims(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode the collection into an in-memory buffer.
    ///
    /// Only claims carry an Arrow schema; patients and encounters cannot be
    /// written as Parquet.
    pub fn encode(&self, format: ArtifactFormat) -> Result<Vec<u8>, GenerationError> {
        let mut buffer = Vec::new();
        match (self, format) {
            (Collection::Patients(rows), ArtifactFormat::Csv) => {
                csv::write_csv(&mut buffer, &Patient::COLUMNS, rows)?;
            }
            (Collection::Encounters(rows), ArtifactFormat::Csv) => {
                csv::write_csv(&mut buffer, &Encounter::FIELDS, rows)?;
            }
            (Collection::Claims(table), ArtifactFormat::Csv) => {
                csv::write_csv(&mut buffer, &Claim::COLUMNS, table.claims())?;
            }
            (Collection::Patients(rows), ArtifactFormat::NdJson) => {
                ndjson::write_ndjson(&mut buffer, rows)?;
            }
            (Collection::Encounters(rows), ArtifactFormat::NdJson) => {
                ndjson::write_ndjson(&mut buffer, rows)?;
            }
            (Collection::Claims(table), ArtifactFormat::NdJson) => {
                ndjson::write_ndjson(&mut buffer, table.claims())?;
            }
            (Collection::Claims(table), ArtifactFormat::Parquet) => {
                parquet::write_claims_parquet(&mut buffer, table)?;
            }
            (collection, ArtifactFormat::Parquet) => {
                return Err(GenerationError::UnsupportedFormat {
                    collection: collection.name(),
                    format: format.as_str(),
                });
            }
        }
        Ok(buffer)
    }
}
