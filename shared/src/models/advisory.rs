//! Multi-day disease-risk advisory built from weather observations

use chrono::NaiveDate;
use serde::Serialize;

use super::disease::{DiseasePrediction, RuleTable};
use super::risk::{classify_risk, RiskLevel};
use super::weather::{CurrentConditions, DailySummary, LocationInfo};

/// Recommendation severity
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Info,
}

/// Farming advice triggered by current conditions
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub items: Vec<String>,
}

impl Recommendation {
    fn new(kind: RecommendationKind, title: &str, items: &[&str]) -> Self {
        Self {
            kind,
            title: title.to_string(),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }

    pub fn heavy_rainfall() -> Self {
        Self::new(
            RecommendationKind::Warning,
            "HEAVY RAINFALL ALERT",
            &[
                "Postpone pesticide/fungicide spraying",
                "Ensure proper field drainage",
                "Monitor for waterlogging",
            ],
        )
    }

    pub fn low_moisture() -> Self {
        Self::new(
            RecommendationKind::Info,
            "LOW MOISTURE CONDITIONS",
            &[
                "Schedule irrigation for crops",
                "Check soil moisture regularly",
            ],
        )
    }

    pub fn high_humidity() -> Self {
        Self::new(
            RecommendationKind::Warning,
            "HIGH HUMIDITY WARNING",
            &[
                "Increase vigilance for fungal diseases",
                "Improve air circulation in fields",
                "Consider preventive fungicide application",
            ],
        )
    }

    pub fn strong_wind() -> Self {
        Self::new(
            RecommendationKind::Warning,
            "STRONG WIND ALERT",
            &[
                "Postpone pesticide spraying",
                "Provide support to tall crops",
            ],
        )
    }
}

/// Recommendations for the given conditions, in fixed evaluation order
pub fn recommendations_for(
    rainfall_mm: f64,
    humidity_percent: f64,
    wind_kph: Option<f64>,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if rainfall_mm > 10.0 {
        recommendations.push(Recommendation::heavy_rainfall());
    } else if rainfall_mm < 1.0 && humidity_percent < 50.0 {
        recommendations.push(Recommendation::low_moisture());
    }

    if humidity_percent > 85.0 {
        recommendations.push(Recommendation::high_humidity());
    }

    if wind_kph.is_some_and(|wind| wind > 30.0) {
        recommendations.push(Recommendation::strong_wind());
    }

    recommendations
}

/// Current conditions with their derived risk, in wire shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurrentWeatherReport {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub uv_index: f64,
    pub risk_level: RiskLevel,
    pub risk_icon: &'static str,
    #[serde(skip)]
    pub risk_score: u8,
}

/// One analysed forecast day
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// 1-based, day 1 is the soonest
    pub day_number: usize,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: f64,
    pub condition: String,
    pub rainfall: f64,
    pub rain_chance: i32,
    pub humidity: f64,
    pub risk_level: RiskLevel,
    pub risk_icon: &'static str,
    #[serde(skip)]
    pub risk_score: u8,
    pub predictions: Vec<DiseasePrediction>,
    pub good_for_spraying: bool,
}

impl ForecastDay {
    /// Label used in the spray-day list
    pub fn spray_label(&self) -> String {
        format!("{} (Day {})", self.date, self.day_number)
    }
}

/// Everything derived from the weather for one crop
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastAnalysis {
    pub current_weather: CurrentWeatherReport,
    pub current_predictions: Vec<DiseasePrediction>,
    pub forecast: Vec<ForecastDay>,
    pub spray_days: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Weather advisory document returned to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherAdvisory {
    pub location: LocationInfo,
    #[serde(flatten)]
    pub analysis: ForecastAnalysis,
}

/// Applies risk classification and disease rules across a forecast
#[derive(Debug, Clone, Copy)]
pub struct ForecastAnalyzer<'a> {
    rules: &'a RuleTable,
}

impl<'a> ForecastAnalyzer<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules }
    }

    pub fn analyze(
        &self,
        crop: &str,
        current: &CurrentConditions,
        days: &[DailySummary],
    ) -> ForecastAnalysis {
        let sample = current.sample();
        let risk = classify_risk(
            sample.temperature_celsius,
            sample.humidity_percent,
            sample.rainfall_mm,
        );

        let current_weather = CurrentWeatherReport {
            temperature: current.temperature_celsius,
            feels_like: current.feels_like_celsius,
            humidity: current.humidity_percent,
            rainfall: current.precipitation_mm,
            condition: current.condition.clone(),
            wind_kph: current.wind_kph,
            wind_dir: current.wind_direction.clone(),
            uv_index: current.uv_index,
            risk_level: risk.level,
            risk_icon: risk.icon(),
            risk_score: risk.score,
        };

        let current_predictions = self.rules.predict(
            crop,
            sample.temperature_celsius,
            sample.humidity_percent,
            sample.rainfall_mm,
        );

        let forecast: Vec<ForecastDay> = days
            .iter()
            .enumerate()
            .map(|(index, day)| self.analyze_day(crop, index + 1, day))
            .collect();

        let spray_days = forecast
            .iter()
            .filter(|day| day.good_for_spraying)
            .map(ForecastDay::spray_label)
            .collect();

        ForecastAnalysis {
            current_weather,
            current_predictions,
            forecast,
            spray_days,
            recommendations: recommendations_for(
                sample.rainfall_mm,
                sample.humidity_percent,
                sample.wind_kph,
            ),
        }
    }

    fn analyze_day(&self, crop: &str, day_number: usize, day: &DailySummary) -> ForecastDay {
        let sample = day.sample();
        let risk = classify_risk(
            sample.temperature_celsius,
            sample.humidity_percent,
            sample.rainfall_mm,
        );

        ForecastDay {
            date: day.date,
            day_number,
            max_temp: day.max_temp_celsius,
            min_temp: day.min_temp_celsius,
            avg_temp: day.avg_temp_celsius,
            condition: day.condition.clone(),
            rainfall: day.total_precipitation_mm,
            rain_chance: day.chance_of_rain_percent,
            humidity: day.avg_humidity_percent,
            risk_level: risk.level,
            risk_icon: risk.icon(),
            risk_score: risk.score,
            predictions: self.rules.predict(
                crop,
                sample.temperature_celsius,
                sample.humidity_percent,
                sample.rainfall_mm,
            ),
            good_for_spraying: sample.is_good_for_spraying(),
        }
    }
}
