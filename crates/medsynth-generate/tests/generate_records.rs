use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use medsynth_core::{ClaimStatus, DateWindow, DiagnosisCode, EnvironmentPreset, Gender};
use medsynth_generate::ids::UniqueIdSource;
use medsynth_generate::{
    GenerateOptions, GenerationEngine, claims_schema, generate_encounters, generate_patients,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn window() -> DateWindow {
    DateWindow::new(
        NaiveDate::from_ymd_opt(2025, 3, 11).expect("start"),
        NaiveDate::from_ymd_opt(2026, 1, 31).expect("end"),
    )
    .expect("window")
}

fn options(seed: Option<u64>) -> GenerateOptions {
    GenerateOptions {
        window: window(),
        seed,
        max_id_attempts: 8,
    }
}

fn has_digits(value: f64, digits: i32) -> bool {
    let scaled = value * 10_f64.powi(digits);
    (scaled - scaled.round()).abs() < 1e-6
}

#[test]
fn patients_respect_count_uniqueness_and_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ids = UniqueIdSource::default();
    let patients = generate_patients(500, &window(), &mut ids, &mut rng).expect("patients");

    assert_eq!(patients.len(), 500);
    let unique: HashSet<_> = patients.iter().map(|p| p.patient_id).collect();
    assert_eq!(unique.len(), 500);
    for patient in &patients {
        assert!(patient.age <= 100);
        assert!(Gender::ALL.contains(&patient.gender));
        assert!(window().contains(patient.registration_date));
        assert!(!patient.first_name.is_empty());
        assert!(!patient.last_name.is_empty());
        assert!(!patient.zip_code.is_empty());
    }
}

#[test]
fn encounters_reference_given_patients_and_stay_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut ids = UniqueIdSource::default();
    let patients = generate_patients(20, &window(), &mut ids, &mut rng).expect("patients");
    let patient_ids: Vec<_> = patients.iter().map(|p| p.patient_id).collect();

    let encounters =
        generate_encounters(400, &patient_ids, &window(), &mut rng).expect("encounters");

    assert_eq!(encounters.len(), 400);
    for encounter in &encounters {
        assert!(patient_ids.contains(&encounter.patient_id));
        assert!((60..=190).contains(&encounter.heart_rate));
        assert!((110..=220).contains(&encounter.blood_pressure.systolic));
        assert!((70..=90).contains(&encounter.blood_pressure.diastolic));
        assert!((97.0..=99.5).contains(&encounter.temperature));
        assert!(has_digits(encounter.temperature, 1));
        assert!(window().contains(encounter.visit_date));
        assert_eq!(
            encounter.diagnosis_desc(),
            encounter.diagnosis_code.description()
        );
    }
}

#[test]
fn encounters_without_patients_fail() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let result = generate_encounters(3, &[], &window(), &mut rng);
    assert!(result.is_err());
}

#[test]
fn claims_respect_ranges_and_schema() {
    let engine = GenerationEngine::new(options(Some(21)));
    let dataset = engine
        .generate_counts("test", 30, 0, 300)
        .expect("dataset");
    let patient_ids: HashSet<_> = dataset.patient_ids().into_iter().collect();

    assert_eq!(dataset.claims.len(), 300);
    for claim in dataset.claims.claims() {
        assert!(patient_ids.contains(&claim.patient_id));
        assert!(!patient_ids.contains(&claim.provider_id));
        assert!((100.0..=15000.0).contains(&claim.claim_amount));
        assert!(has_digits(claim.claim_amount, 3));
        assert!(ClaimStatus::ALL.contains(&claim.status));
        assert!(DiagnosisCode::BILLABLE.contains(&claim.diagnosis_code));
        assert_eq!(claim.service_date.time(), NaiveTime::MIN);
        assert!(window().contains(claim.service_date.date()));
    }

    let schema = dataset.claims.schema();
    assert_eq!(schema.fields().len(), 8);
    assert_eq!(schema, claims_schema());
}

#[test]
fn seeded_batches_are_reproducible_and_independent() {
    let engine = GenerationEngine::new(options(Some(42)));
    let first = engine.generate_counts("dev", 25, 25, 25).expect("first");
    let second = engine.generate_counts("dev", 25, 25, 25).expect("second");
    let other = engine.generate_counts("prod", 25, 25, 25).expect("other");

    assert_eq!(first.patients, second.patients);
    assert_eq!(first.encounters, second.encounters);
    assert_eq!(first.claims, second.claims);

    let first_ids: HashSet<_> = first.patient_ids().into_iter().collect();
    assert!(other.patient_ids().iter().all(|id| !first_ids.contains(id)));
    assert!(
        other
            .encounters
            .iter()
            .all(|encounter| !first_ids.contains(&encounter.patient_id))
    );
}

#[test]
fn preset_volume_drives_every_collection() {
    let engine = GenerationEngine::new(options(Some(1)));
    let preset = EnvironmentPreset {
        name: "tiny",
        prefix: "tiny/",
        records: 12,
    };
    let dataset = engine.generate(&preset).expect("dataset");
    assert_eq!(dataset.environment, "tiny");
    assert_eq!(dataset.patients.len(), 12);
    assert_eq!(dataset.encounters.len(), 12);
    assert_eq!(dataset.claims.len(), 12);
}
