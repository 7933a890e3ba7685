//! WebAssembly module for the Crop Advisory Platform
//!
//! Provides client-side computation for:
//! - Weather risk classification
//! - Crop disease prediction
//! - Spray window checks
//! - Parsing identification replies offline

use serde::Serialize;
use shared::{ForecastAnalyzer, IdentificationRecord, RuleTable};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    let rules = RuleTable::standard();
    web_sys::console::log_1(&JsValue::from_str(&format!(
        "crop advisory engine ready: {} rules",
        rules.len()
    )));
}

#[derive(Serialize)]
struct RiskView {
    level: RiskLevel,
    score: u8,
    icon: &'static str,
}

fn risk_json(temperature: f64, humidity: f64, rainfall: f64) -> String {
    let risk = classify_risk(temperature, humidity, rainfall);
    let view = RiskView {
        level: risk.level,
        score: risk.score,
        icon: risk.icon(),
    };
    serde_json::to_string(&view).unwrap_or_default()
}

fn predictions_json(crop: &str, temperature: f64, humidity: f64, rainfall: f64) -> Result<String, String> {
    let predictions = RuleTable::standard().predict(crop, temperature, humidity, rainfall);
    serde_json::to_string(&predictions).map_err(|e| format!("Failed to encode predictions: {}", e))
}

fn forecast_json(crop: &str, current_json: &str, days_json: &str) -> Result<String, String> {
    let current: CurrentConditions = serde_json::from_str(current_json)
        .map_err(|e| format!("Invalid current conditions JSON: {}", e))?;
    let days: Vec<DailySummary> =
        serde_json::from_str(days_json).map_err(|e| format!("Invalid forecast JSON: {}", e))?;

    let rules = RuleTable::standard();
    let analysis = ForecastAnalyzer::new(&rules).analyze(crop, &current, &days);
    serde_json::to_string(&analysis).map_err(|e| format!("Failed to encode analysis: {}", e))
}

fn identification_json(raw: &str) -> Result<String, String> {
    let record: IdentificationRecord = raw.parse().map_err(|e: IdentificationError| e.to_string())?;
    serde_json::to_string(&record).map_err(|e| format!("Failed to encode identification: {}", e))
}

/// Classify weather risk; returns `{level, score, icon}` as JSON
#[wasm_bindgen]
pub fn classify_weather_risk(temperature: f64, humidity: f64, rainfall: f64) -> String {
    risk_json(temperature, humidity, rainfall)
}

/// Diseases the weather favours for a crop, as a JSON array
#[wasm_bindgen]
pub fn predict_crop_diseases(
    crop: &str,
    temperature: f64,
    humidity: f64,
    rainfall: f64,
) -> Result<String, JsValue> {
    predictions_json(crop, temperature, humidity, rainfall).map_err(|e| JsValue::from_str(&e))
}

/// Full forecast analysis from current conditions and daily summaries
#[wasm_bindgen]
pub fn analyze_forecast(crop: &str, current_json: &str, days_json: &str) -> Result<String, JsValue> {
    forecast_json(crop, current_json, days_json).map_err(|e| JsValue::from_str(&e))
}

/// Check whether a day's rain and humidity allow spraying
#[wasm_bindgen]
pub fn is_spray_window(rainfall: f64, humidity: f64) -> bool {
    is_good_for_spraying(rainfall, humidity)
}

/// Crops with registered disease rules
#[wasm_bindgen]
pub fn supported_crops() -> js_sys::Array {
    RuleTable::standard()
        .crops()
        .map(JsValue::from_str)
        .collect()
}

/// Parse a PLANT/DISEASE/CONFIDENCE reply into JSON
#[wasm_bindgen]
pub fn parse_identification_reply(raw: &str) -> Result<String, JsValue> {
    identification_json(raw).map_err(|e| JsValue::from_str(&e))
}
