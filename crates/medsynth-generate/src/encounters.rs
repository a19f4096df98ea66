use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use medsynth_core::{BloodPressure, DateWindow, DiagnosisCode, Encounter};

use crate::errors::GenerationError;
use crate::sampling::{date_in, pick, round_to};

/// Generate `count` encounters, each for a patient drawn with replacement
/// from `patient_ids`.
pub fn generate_encounters(
    count: usize,
    patient_ids: &[Uuid],
    window: &DateWindow,
    rng: &mut impl Rng,
) -> Result<Vec<Encounter>, GenerationError> {
    let mut encounters = Vec::with_capacity(count);
    for _ in 0..count {
        let patient_id = *patient_ids.choose(rng).ok_or(GenerationError::NoPatients)?;
        encounters.push(Encounter {
            patient_id,
            visit_date: date_in(window, rng),
            diagnosis_code: pick(&DiagnosisCode::ALL, rng),
            heart_rate: rng.random_range(60..=190),
            blood_pressure: BloodPressure {
                systolic: rng.random_range(110..=220),
                diastolic: rng.random_range(70..=90),
            },
            temperature: round_to(rng.random_range(97.0..=99.5), 1),
        });
    }
    Ok(encounters)
}
