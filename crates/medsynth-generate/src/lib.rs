//! Synthetic healthcare record generation for medsynth.
//!
//! Produces a patient batch plus encounters and claims that reference it, and
//! encodes each collection as CSV, NDJSON or Parquet.

pub mod claims;
pub mod encounters;
pub mod engine;
pub mod errors;
pub mod ids;
pub mod model;
pub mod output;
pub mod patients;
mod sampling;

pub use claims::{ClaimsTable, claims_schema, generate_claims};
pub use encounters::generate_encounters;
pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use model::{Dataset, DatasetSummary, GenerateOptions};
pub use output::{ArtifactFormat, Collection};
pub use patients::generate_patients;
