use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::codes::{ClaimStatus, DiagnosisCode, Gender, InsuranceType, ProcedureCode};
use crate::error::Error;

/// Patient demographics. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub gender: Gender,
    pub zip_code: String,
    pub insurance_type: InsuranceType,
    pub registration_date: NaiveDate,
}

impl Patient {
    pub const COLUMNS: [&'static str; 8] = [
        "patient_id",
        "first_name",
        "last_name",
        "age",
        "gender",
        "zip_code",
        "insurance_type",
        "registration_date",
    ];
}

/// Systolic/diastolic pair, rendered as `"{systolic}/{diastolic}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

impl FromStr for BloodPressure {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidBloodPressure(value.to_string());
        let (systolic, diastolic) = value.split_once('/').ok_or_else(invalid)?;
        Ok(Self {
            systolic: systolic.trim().parse().map_err(|_| invalid())?,
            diastolic: diastolic.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for BloodPressure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BloodPressure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single clinical visit.
///
/// Serializes with a derived `diagnosis_desc` field next to the code; the
/// description is ignored on deserialization since it is a function of the
/// code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Encounter {
    pub patient_id: Uuid,
    pub visit_date: NaiveDate,
    pub diagnosis_code: DiagnosisCode,
    pub heart_rate: u8,
    pub blood_pressure: BloodPressure,
    pub temperature: f64,
}

impl Encounter {
    pub const FIELDS: [&'static str; 7] = [
        "patient_id",
        "visit_date",
        "diagnosis_code",
        "diagnosis_desc",
        "heart_rate",
        "blood_pressure",
        "temperature",
    ];

    pub fn diagnosis_desc(&self) -> &'static str {
        self.diagnosis_code.description()
    }
}

impl Serialize for Encounter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Encounter", Self::FIELDS.len())?;
        record.serialize_field("patient_id", &self.patient_id)?;
        record.serialize_field("visit_date", &self.visit_date)?;
        record.serialize_field("diagnosis_code", &self.diagnosis_code)?;
        record.serialize_field("diagnosis_desc", self.diagnosis_desc())?;
        record.serialize_field("heart_rate", &self.heart_rate)?;
        record.serialize_field("blood_pressure", &self.blood_pressure)?;
        record.serialize_field("temperature", &self.temperature)?;
        record.end()
    }
}

/// An insurance claim. `service_date` always has a zero time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub service_date: NaiveDateTime,
    pub diagnosis_code: DiagnosisCode,
    pub procedure_code: ProcedureCode,
    pub claim_amount: f64,
    pub status: ClaimStatus,
}

impl Claim {
    pub const COLUMNS: [&'static str; 8] = [
        "claim_id",
        "patient_id",
        "provider_id",
        "service_date",
        "diagnosis_code",
        "procedure_code",
        "claim_amount",
        "status",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_pressure_parses_its_display_form() {
        let bp = BloodPressure {
            systolic: 145,
            diastolic: 82,
        };
        assert_eq!(bp.to_string(), "145/82");
        assert_eq!("145/82".parse::<BloodPressure>().ok(), Some(bp));
        assert!("145-82".parse::<BloodPressure>().is_err());
    }
}
