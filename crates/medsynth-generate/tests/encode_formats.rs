use std::collections::HashSet;

use arrow::datatypes::{DataType, TimeUnit};
use bytes::Bytes;
use chrono::NaiveDate;
use medsynth_core::{DateWindow, Encounter, Patient};
use medsynth_generate::output::parquet::read_claims_parquet;
use medsynth_generate::{
    ArtifactFormat, ClaimsTable, Collection, Dataset, GenerateOptions, GenerationEngine,
    GenerationError,
};

fn small_dataset(seed: u64) -> Dataset {
    let options = GenerateOptions {
        window: DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 3, 11).expect("start"),
            NaiveDate::from_ymd_opt(2025, 12, 31).expect("end"),
        )
        .expect("window"),
        seed: Some(seed),
        max_id_attempts: 8,
    };
    GenerationEngine::new(options)
        .generate_counts("e2e", 10, 50, 50)
        .expect("generate dataset")
}

#[test]
fn references_resolve_and_claims_round_trip_through_parquet() {
    let dataset = small_dataset(2025);
    let patient_ids: HashSet<_> = dataset.patient_ids().into_iter().collect();
    assert_eq!(patient_ids.len(), 10);
    assert!(
        dataset
            .encounters
            .iter()
            .all(|encounter| patient_ids.contains(&encounter.patient_id))
    );
    assert!(
        dataset
            .claims
            .claims()
            .iter()
            .all(|claim| patient_ids.contains(&claim.patient_id))
    );

    let encoded = Collection::Claims(&dataset.claims)
        .encode(ArtifactFormat::Parquet)
        .expect("encode parquet");
    assert_eq!(&encoded[..4], b"PAR1");

    let decoded = read_claims_parquet(Bytes::from(encoded)).expect("decode parquet");
    assert_eq!(decoded, dataset.claims);

    let schema = decoded.schema();
    assert_eq!(
        schema.field_with_name("service_date").expect("field").data_type(),
        &DataType::Timestamp(TimeUnit::Millisecond, None)
    );
    assert_eq!(
        schema.field_with_name("claim_amount").expect("field").data_type(),
        &DataType::Float64
    );
}

#[test]
fn empty_claims_table_round_trips() {
    let table = ClaimsTable::new(Vec::new());
    let encoded = Collection::Claims(&table)
        .encode(ArtifactFormat::Parquet)
        .expect("encode empty parquet");
    let decoded = read_claims_parquet(Bytes::from(encoded)).expect("decode empty parquet");
    assert!(decoded.is_empty());
}

#[test]
fn patients_csv_has_header_and_parses_back() {
    let dataset = small_dataset(3);
    let encoded = Collection::Patients(&dataset.patients)
        .encode(ArtifactFormat::Csv)
        .expect("encode csv");
    let text = String::from_utf8(encoded).expect("utf8 csv");

    let header = text.lines().next().expect("header line");
    assert_eq!(header, Patient::COLUMNS.join(","));

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let parsed: Vec<Patient> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("parse patients");
    assert_eq!(parsed, dataset.patients);
}

#[test]
fn empty_patient_csv_still_has_header() {
    let encoded = Collection::Patients(&[])
        .encode(ArtifactFormat::Csv)
        .expect("encode csv");
    assert_eq!(
        String::from_utf8(encoded).expect("utf8"),
        format!("{}\n", Patient::COLUMNS.join(","))
    );
}

#[test]
fn encounters_ndjson_is_one_object_per_line() {
    let dataset = small_dataset(4);
    let encoded = Collection::Encounters(&dataset.encounters)
        .encode(ArtifactFormat::NdJson)
        .expect("encode ndjson");
    let text = String::from_utf8(encoded).expect("utf8 ndjson");

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 50);
    for (line, encounter) in lines.iter().zip(&dataset.encounters) {
        let value: serde_json::Value = serde_json::from_str(line).expect("json line");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), Encounter::FIELDS.len());
        assert_eq!(
            object["diagnosis_desc"],
            encounter.diagnosis_code.description()
        );
        let decoded: Encounter = serde_json::from_value(value).expect("decode encounter");
        assert_eq!(&decoded, encounter);
    }
}

#[test]
fn parquet_is_claims_only() {
    let dataset = small_dataset(5);
    let result = Collection::Patients(&dataset.patients).encode(ArtifactFormat::Parquet);
    assert!(matches!(
        result,
        Err(GenerationError::UnsupportedFormat {
            collection: "patients",
            format: "parquet"
        })
    ));
}
