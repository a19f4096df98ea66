use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Patient gender as recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Coverage class of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceType {
    Private,
    Medicare,
    Medicaid,
}

impl InsuranceType {
    pub const ALL: [InsuranceType; 3] = [
        InsuranceType::Private,
        InsuranceType::Medicare,
        InsuranceType::Medicaid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceType::Private => "Private",
            InsuranceType::Medicare => "Medicare",
            InsuranceType::Medicaid => "Medicaid",
        }
    }
}

/// ICD-10 diagnosis codes used by encounters and claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisCode {
    #[serde(rename = "E11.9")]
    Type2Diabetes,
    #[serde(rename = "I10")]
    EssentialHypertension,
    #[serde(rename = "J45")]
    Asthma,
    #[serde(rename = "N18.9")]
    ChronicKidneyDisease,
    #[serde(rename = "Z00.0")]
    GeneralExam,
}

impl DiagnosisCode {
    /// Codes an encounter may carry.
    pub const ALL: [DiagnosisCode; 5] = [
        DiagnosisCode::Type2Diabetes,
        DiagnosisCode::EssentialHypertension,
        DiagnosisCode::Asthma,
        DiagnosisCode::ChronicKidneyDisease,
        DiagnosisCode::GeneralExam,
    ];

    /// Codes a claim may be billed under. General exams are never billed.
    pub const BILLABLE: [DiagnosisCode; 4] = [
        DiagnosisCode::Type2Diabetes,
        DiagnosisCode::EssentialHypertension,
        DiagnosisCode::Asthma,
        DiagnosisCode::ChronicKidneyDisease,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisCode::Type2Diabetes => "E11.9",
            DiagnosisCode::EssentialHypertension => "I10",
            DiagnosisCode::Asthma => "J45",
            DiagnosisCode::ChronicKidneyDisease => "N18.9",
            DiagnosisCode::GeneralExam => "Z00.0",
        }
    }

    /// Human-readable description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosisCode::Type2Diabetes => "Type 2 diabetes mellitus",
            DiagnosisCode::EssentialHypertension => "Essential hypertension",
            DiagnosisCode::Asthma => "Asthma",
            DiagnosisCode::ChronicKidneyDisease => "Chronic kidney disease",
            DiagnosisCode::GeneralExam => "General medical exam",
        }
    }
}

/// CPT procedure codes used by claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureCode {
    #[serde(rename = "99213")]
    OfficeVisit,
    #[serde(rename = "80053")]
    MetabolicPanel,
    #[serde(rename = "83036")]
    HemoglobinA1c,
    #[serde(rename = "93000")]
    Electrocardiogram,
}

impl ProcedureCode {
    pub const ALL: [ProcedureCode; 4] = [
        ProcedureCode::OfficeVisit,
        ProcedureCode::MetabolicPanel,
        ProcedureCode::HemoglobinA1c,
        ProcedureCode::Electrocardiogram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureCode::OfficeVisit => "99213",
            ProcedureCode::MetabolicPanel => "80053",
            ProcedureCode::HemoglobinA1c => "83036",
            ProcedureCode::Electrocardiogram => "93000",
        }
    }
}

/// Adjudication state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Paid,
    Denied,
    Pending,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Paid,
        ClaimStatus::Denied,
        ClaimStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Paid => "Paid",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::Pending => "Pending",
        }
    }
}

fn parse_code<T: Copy>(
    kind: &'static str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
    value: &str,
) -> Result<T, Error> {
    all.iter()
        .copied()
        .find(|candidate| as_str(candidate) == value)
        .ok_or_else(|| Error::UnknownCode {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_code("gender", &Gender::ALL, Gender::as_str, value)
    }
}

impl FromStr for InsuranceType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_code("insurance type", &InsuranceType::ALL, InsuranceType::as_str, value)
    }
}

impl FromStr for DiagnosisCode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_code("diagnosis code", &DiagnosisCode::ALL, DiagnosisCode::as_str, value)
    }
}

impl FromStr for ProcedureCode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_code("procedure code", &ProcedureCode::ALL, ProcedureCode::as_str, value)
    }
}

impl FromStr for ClaimStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_code("claim status", &ClaimStatus::ALL, ClaimStatus::as_str, value)
    }
}

impl fmt::Display for DiagnosisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProcedureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billable_codes_are_a_subset_of_encounter_codes() {
        for code in DiagnosisCode::BILLABLE {
            assert!(DiagnosisCode::ALL.contains(&code));
        }
        assert!(!DiagnosisCode::BILLABLE.contains(&DiagnosisCode::GeneralExam));
    }

    #[test]
    fn parses_wire_codes() {
        assert_eq!(
            "N18.9".parse::<DiagnosisCode>().ok(),
            Some(DiagnosisCode::ChronicKidneyDisease)
        );
        assert_eq!(
            "83036".parse::<ProcedureCode>().ok(),
            Some(ProcedureCode::HemoglobinA1c)
        );
        assert!(matches!(
            "Refunded".parse::<ClaimStatus>(),
            Err(Error::UnknownCode { kind: "claim status", .. })
        ));
    }

    #[test]
    fn serde_names_match_wire_codes() {
        for code in DiagnosisCode::ALL {
            let json = serde_json::to_string(&code).expect("serialize code");
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
        for code in ProcedureCode::ALL {
            let json = serde_json::to_string(&code).expect("serialize code");
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
