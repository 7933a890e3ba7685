//! Plant identification records parsed from generative model output
//!
//! The model is asked to answer with three `KEY: value` lines:
//!
//! ```text
//! PLANT: Rice
//! DISEASE: Healthy
//! CONFIDENCE: 92
//! ```

use std::collections::HashMap;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Disease label the model uses for a plant with no visible disease
pub const HEALTHY: &str = "Healthy";

/// Disease label used when the model omitted the DISEASE line
pub const UNKNOWN_DISEASE: &str = "Unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentificationError {
    #[error("identification response was empty")]
    EmptyResponse,

    #[error("identification response did not name a plant")]
    MissingPlant,

    #[error("confidence '{0}' is not an integer")]
    InvalidConfidence(String),
}

/// Key/value fields read from the model's answer, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIdentification {
    pub plant: Option<String>,
    pub disease: Option<String>,
    pub confidence: u8,
}

/// A validated plant identification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentificationRecord {
    pub plant: String,
    pub disease: String,
    /// 0-100
    pub confidence: u8,
}

impl IdentificationRecord {
    pub fn is_healthy(&self) -> bool {
        is_healthy(&self.disease)
    }
}

/// True when the disease label means "no disease"
pub fn is_healthy(disease: &str) -> bool {
    disease.eq_ignore_ascii_case(HEALTHY)
}

fn parse_fields(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_uppercase(), value.trim().to_string()))
        .collect()
}

/// Integers of any magnitude clamp to 0..=100; anything else is rejected
fn parse_confidence(value: &str) -> Result<u8, IdentificationError> {
    match value.parse::<i64>() {
        Ok(confidence) => Ok(confidence.clamp(0, 100) as u8),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(100),
            IntErrorKind::NegOverflow => Ok(0),
            _ => Err(IdentificationError::InvalidConfidence(value.to_string())),
        },
    }
}

/// Read PLANT, DISEASE and CONFIDENCE lines from free-form model text.
///
/// Keys are case-insensitive and may appear in any order; lines without a
/// colon are ignored. A missing CONFIDENCE defaults to 0.
pub fn parse_identification(raw: &str) -> Result<ParsedIdentification, IdentificationError> {
    if raw.trim().is_empty() {
        return Err(IdentificationError::EmptyResponse);
    }

    let mut fields = parse_fields(raw);

    let confidence = match fields.get("CONFIDENCE") {
        Some(value) => parse_confidence(value)?,
        None => 0,
    };

    Ok(ParsedIdentification {
        plant: fields.remove("PLANT"),
        disease: fields.remove("DISEASE"),
        confidence,
    })
}

impl TryFrom<ParsedIdentification> for IdentificationRecord {
    type Error = IdentificationError;

    fn try_from(parsed: ParsedIdentification) -> Result<Self, Self::Error> {
        let plant = parsed
            .plant
            .filter(|plant| !plant.is_empty())
            .ok_or(IdentificationError::MissingPlant)?;

        Ok(IdentificationRecord {
            plant,
            disease: parsed
                .disease
                .unwrap_or_else(|| UNKNOWN_DISEASE.to_string()),
            confidence: parsed.confidence,
        })
    }
}

impl std::str::FromStr for IdentificationRecord {
    type Err = IdentificationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_identification(raw)?.try_into()
    }
}
