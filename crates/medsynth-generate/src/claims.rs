use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Float64Array, StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{
    DataType, Field, Float64Type, Schema, SchemaRef, TimeUnit, TimestampMillisecondType,
};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveTime};
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use medsynth_core::{Claim, ClaimStatus, DateWindow, DiagnosisCode, ProcedureCode};

use crate::errors::GenerationError;
use crate::ids::UniqueIdSource;
use crate::sampling::{date_in, pick, round_to};

/// Fixed Arrow schema of the claims table.
///
/// The schema never depends on sampled values, so an empty table and a full
/// one encode to the same Parquet layout.
pub fn claims_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("claim_id", DataType::Utf8, false),
        Field::new("patient_id", DataType::Utf8, false),
        Field::new("provider_id", DataType::Utf8, false),
        Field::new(
            "service_date",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            false,
        ),
        Field::new("diagnosis_code", DataType::Utf8, false),
        Field::new("procedure_code", DataType::Utf8, false),
        Field::new("claim_amount", DataType::Float64, false),
        Field::new("status", DataType::Utf8, false),
    ]))
}

/// Claims bound to [`claims_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsTable {
    schema: SchemaRef,
    claims: Vec<Claim>,
}

impl ClaimsTable {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self {
            schema: claims_schema(),
            claims,
        }
    }

    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn into_claims(self) -> Vec<Claim> {
        self.claims
    }

    /// Build one record batch holding every claim.
    pub fn to_record_batch(&self) -> Result<RecordBatch, GenerationError> {
        let claims = &self.claims;
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.claim_id.to_string()),
            )),
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.patient_id.to_string()),
            )),
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.provider_id.to_string()),
            )),
            Arc::new(TimestampMillisecondArray::from(
                claims
                    .iter()
                    .map(|claim| claim.service_date.and_utc().timestamp_millis())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.diagnosis_code.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.procedure_code.as_str()),
            )),
            Arc::new(Float64Array::from(
                claims
                    .iter()
                    .map(|claim| claim.claim_amount)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(
                claims.iter().map(|claim| claim.status.as_str()),
            )),
        ];
        Ok(RecordBatch::try_new(self.schema(), columns)?)
    }

    /// Decode claims from a batch whose schema matches [`claims_schema`].
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self, GenerationError> {
        check_schema(&batch.schema())?;

        let claim_ids = string_column(batch, 0, "claim_id")?;
        let patient_ids = string_column(batch, 1, "patient_id")?;
        let provider_ids = string_column(batch, 2, "provider_id")?;
        let service_dates = batch
            .column(3)
            .as_primitive_opt::<TimestampMillisecondType>()
            .ok_or_else(|| column_type_error("service_date"))?;
        let diagnosis_codes = string_column(batch, 4, "diagnosis_code")?;
        let procedure_codes = string_column(batch, 5, "procedure_code")?;
        let amounts = batch
            .column(6)
            .as_primitive_opt::<Float64Type>()
            .ok_or_else(|| column_type_error("claim_amount"))?;
        let statuses = string_column(batch, 7, "status")?;

        for (index, column) in batch.columns().iter().enumerate() {
            if column.null_count() > 0 {
                return Err(GenerationError::SchemaMismatch(format!(
                    "column {index} contains nulls"
                )));
            }
        }

        let mut claims = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let millis = service_dates.value(row);
            let service_date = DateTime::from_timestamp_millis(millis)
                .map(|value| value.naive_utc())
                .ok_or_else(|| GenerationError::InvalidColumn {
                    column: "service_date",
                    message: format!("timestamp {millis} out of range"),
                })?;
            claims.push(Claim {
                claim_id: parse_uuid("claim_id", claim_ids.value(row))?,
                patient_id: parse_uuid("patient_id", patient_ids.value(row))?,
                provider_id: parse_uuid("provider_id", provider_ids.value(row))?,
                service_date,
                diagnosis_code: parse_code("diagnosis_code", diagnosis_codes.value(row))?,
                procedure_code: parse_code("procedure_code", procedure_codes.value(row))?,
                claim_amount: amounts.value(row),
                status: parse_code("status", statuses.value(row))?,
            });
        }

        Ok(Self::new(claims))
    }
}

/// Generate `count` claims against `patient_ids`.
///
/// Every claim gets a fresh claim id and a fresh provider id; providers are
/// never reused across claims.
pub fn generate_claims(
    count: usize,
    patient_ids: &[Uuid],
    window: &DateWindow,
    ids: &mut UniqueIdSource,
    rng: &mut impl Rng,
) -> Result<ClaimsTable, GenerationError> {
    let mut claims = Vec::with_capacity(count);
    for _ in 0..count {
        let claim_id = ids.next_id(rng)?;
        let patient_id = *patient_ids.choose(rng).ok_or(GenerationError::NoPatients)?;
        let provider_id = ids.next_id(rng)?;
        claims.push(Claim {
            claim_id,
            patient_id,
            provider_id,
            service_date: date_in(window, rng).and_time(NaiveTime::MIN),
            diagnosis_code: pick(&DiagnosisCode::BILLABLE, rng),
            procedure_code: pick(&ProcedureCode::ALL, rng),
            claim_amount: round_to(rng.random_range(100.0..=15000.0), 3),
            status: pick(&ClaimStatus::ALL, rng),
        });
    }
    Ok(ClaimsTable::new(claims))
}

fn check_schema(schema: &Schema) -> Result<(), GenerationError> {
    let expected = claims_schema();
    if schema.fields().len() != expected.fields().len() {
        return Err(GenerationError::SchemaMismatch(format!(
            "expected {} fields, found {}",
            expected.fields().len(),
            schema.fields().len()
        )));
    }
    for (found, wanted) in schema.fields().iter().zip(expected.fields().iter()) {
        if found.name() != wanted.name() || found.data_type() != wanted.data_type() {
            return Err(GenerationError::SchemaMismatch(format!(
                "expected field '{}' {}, found '{}' {}",
                wanted.name(),
                wanted.data_type(),
                found.name(),
                found.data_type()
            )));
        }
    }
    Ok(())
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
    column: &'static str,
) -> Result<&'a StringArray, GenerationError> {
    batch
        .column(index)
        .as_string_opt::<i32>()
        .ok_or_else(|| column_type_error(column))
}

fn column_type_error(column: &'static str) -> GenerationError {
    GenerationError::InvalidColumn {
        column,
        message: "unexpected array type".to_string(),
    }
}

fn parse_uuid(column: &'static str, value: &str) -> Result<Uuid, GenerationError> {
    Uuid::parse_str(value).map_err(|err| GenerationError::InvalidColumn {
        column,
        message: err.to_string(),
    })
}

fn parse_code<T>(column: &'static str, value: &str) -> Result<T, GenerationError>
where
    T: FromStr<Err = medsynth_core::Error>,
{
    value
        .parse()
        .map_err(|err: medsynth_core::Error| GenerationError::InvalidColumn {
            column,
            message: err.to_string(),
        })
}
