use serde::Serialize;
use uuid::Uuid;

use medsynth_core::{DEFAULT_WINDOW_START, DateWindow, Encounter, Patient};

use crate::claims::ClaimsTable;
use crate::errors::GenerationError;
use crate::ids::DEFAULT_MAX_ATTEMPTS;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    /// Window that registration, visit and service dates are drawn from.
    pub window: DateWindow,
    /// Base seed. When set, each batch is reproducible.
    pub seed: Option<u64>,
    /// Maximum draws for one unique identifier.
    pub max_id_attempts: u32,
}

impl GenerateOptions {
    /// Options for a run executing today, starting at the fixed window start.
    pub fn for_today() -> Result<Self, GenerationError> {
        Ok(Self {
            window: DateWindow::until_today(DEFAULT_WINDOW_START)?,
            seed: None,
            max_id_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }
}

/// One generated batch: patients plus the records that reference them.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub environment: String,
    pub patients: Vec<Patient>,
    pub encounters: Vec<Encounter>,
    pub claims: ClaimsTable,
}

impl Dataset {
    pub fn patient_ids(&self) -> Vec<Uuid> {
        self.patients.iter().map(|patient| patient.patient_id).collect()
    }
}

/// Row counts of a generated batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatasetSummary {
    pub environment: String,
    pub patients: usize,
    pub encounters: usize,
    pub claims: usize,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            environment: dataset.environment.clone(),
            patients: dataset.patients.len(),
            encounters: dataset.encounters.len(),
            claims: dataset.claims.len(),
        }
    }
}
