use fake::Fake;
use fake::faker::address::en::ZipCode;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;

use medsynth_core::{DateWindow, Gender, InsuranceType, Patient};

use crate::errors::GenerationError;
use crate::ids::UniqueIdSource;
use crate::sampling::{date_in, pick};

/// Generate `count` patients registered inside `window`.
pub fn generate_patients(
    count: usize,
    window: &DateWindow,
    ids: &mut UniqueIdSource,
    rng: &mut impl Rng,
) -> Result<Vec<Patient>, GenerationError> {
    let mut patients = Vec::with_capacity(count);
    for _ in 0..count {
        patients.push(Patient {
            patient_id: ids.next_id(rng)?,
            first_name: FirstName().fake_with_rng(rng),
            last_name: LastName().fake_with_rng(rng),
            age: rng.random_range(0..=100),
            gender: pick(&Gender::ALL, rng),
            zip_code: ZipCode().fake_with_rng(rng),
            insurance_type: pick(&InsuranceType::ALL, rng),
            registration_date: date_in(window, rng),
        });
    }
    Ok(patients)
}
