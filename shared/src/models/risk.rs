//! Weather-driven disease risk classification

use serde::{Deserialize, Serialize};

/// Ordinal disease risk level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Score 0
    Low,
    /// Score 1-2
    Moderate,
    /// Score 3-4
    High,
    /// Score 5+
    Critical,
}

impl RiskLevel {
    /// Map an additive risk score to its level
    pub fn from_score(score: u8) -> Self {
        match score {
            5.. => RiskLevel::Critical,
            3..=4 => RiskLevel::High,
            1..=2 => RiskLevel::Moderate,
            0 => RiskLevel::Low,
        }
    }

    /// Display glyph used by the frontend
    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Moderate => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Result of scoring one weather sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u8,
}

impl RiskAssessment {
    pub fn icon(&self) -> &'static str {
        self.level.icon()
    }
}

fn humidity_points(humidity_percent: f64) -> u8 {
    if humidity_percent > 85.0 {
        3
    } else if humidity_percent > 70.0 {
        2
    } else if humidity_percent > 60.0 {
        1
    } else {
        0
    }
}

fn rainfall_points(rainfall_mm: f64) -> u8 {
    if rainfall_mm > 15.0 {
        3
    } else if rainfall_mm > 5.0 {
        2
    } else if rainfall_mm > 1.0 {
        1
    } else {
        0
    }
}

fn temperature_points(temperature_celsius: f64) -> u8 {
    if temperature_celsius > 35.0 || temperature_celsius < 10.0 {
        2
    } else {
        0
    }
}

/// Score temperature, humidity and rainfall into a risk level.
///
/// Inputs are not validated; out-of-range values are scored as-is.
pub fn classify_risk(temperature_celsius: f64, humidity_percent: f64, rainfall_mm: f64) -> RiskAssessment {
    let score = humidity_points(humidity_percent)
        + rainfall_points(rainfall_mm)
        + temperature_points(temperature_celsius);

    RiskAssessment {
        level: RiskLevel::from_score(score),
        score,
    }
}
