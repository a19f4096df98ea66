//! Core record types for medsynth.
//!
//! Defines the patient, encounter and claim records shared by the generators
//! and the publisher, the closed code sets they sample from, the generation
//! window, and the fixed environment presets.

pub mod codes;
pub mod environment;
pub mod error;
pub mod records;
pub mod window;

pub use codes::{ClaimStatus, DiagnosisCode, Gender, InsuranceType, ProcedureCode};
pub use environment::EnvironmentPreset;
pub use error::{Error, Result};
pub use records::{BloodPressure, Claim, Encounter, Patient};
pub use window::{DEFAULT_WINDOW_START, DateWindow};

/// Default storage target for published artifacts.
pub const DEFAULT_BUCKET: &str = "health-data-bucket-ju";
