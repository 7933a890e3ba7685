//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// How the user described the plant to be identified
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Image,
    Text,
    Audio,
}

impl InputKind {
    /// MIME type assumed for inline payloads that carry no data-URL header
    pub fn default_mime_type(&self) -> &'static str {
        match self {
            InputKind::Image => "image/jpeg",
            InputKind::Text => "text/plain",
            InputKind::Audio => "audio/webm",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Image => write!(f, "image"),
            InputKind::Text => write!(f, "text"),
            InputKind::Audio => write!(f, "audio"),
        }
    }
}

/// Treatment preference echoed back with identification results.
///
/// Values other than `chemical` and `organic` are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum TreatmentType {
    #[default]
    Chemical,
    Organic,
    Other(String),
}

impl From<String> for TreatmentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "chemical" => TreatmentType::Chemical,
            "organic" => TreatmentType::Organic,
            _ => TreatmentType::Other(value),
        }
    }
}

impl From<TreatmentType> for String {
    fn from(value: TreatmentType) -> Self {
        match value {
            TreatmentType::Chemical => "chemical".to_string(),
            TreatmentType::Organic => "organic".to_string(),
            TreatmentType::Other(other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treatment_type_known_values() {
        let organic: TreatmentType = serde_json::from_str("\"organic\"").unwrap();
        assert_eq!(organic, TreatmentType::Organic);
        assert_eq!(serde_json::to_string(&TreatmentType::Chemical).unwrap(), "\"chemical\"");
    }

    #[test]
    fn test_treatment_type_echoes_unknown_values() {
        let other: TreatmentType = serde_json::from_str("\"biological\"").unwrap();
        assert_eq!(other, TreatmentType::Other("biological".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"biological\"");
    }
}
