//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three variables the risk engine scores, plus advisory extras
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WeatherSample {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub rainfall_mm: f64,
    pub wind_kph: Option<f64>,
    pub uv_index: Option<f64>,
}

impl WeatherSample {
    pub fn new(temperature_celsius: f64, humidity_percent: f64, rainfall_mm: f64) -> Self {
        Self {
            temperature_celsius,
            humidity_percent,
            rainfall_mm,
            wind_kph: None,
            uv_index: None,
        }
    }

    pub fn with_wind(mut self, wind_kph: f64) -> Self {
        self.wind_kph = Some(wind_kph);
        self
    }

    pub fn with_uv(mut self, uv_index: f64) -> Self {
        self.uv_index = Some(uv_index);
        self
    }

    /// Dry and calm enough that a spray will not wash off
    pub fn is_good_for_spraying(&self) -> bool {
        is_good_for_spraying(self.rainfall_mm, self.humidity_percent)
    }
}

/// Spraying needs rainfall under 2 mm and humidity under 80%
pub fn is_good_for_spraying(rainfall_mm: f64, humidity_percent: f64) -> bool {
    rainfall_mm < 2.0 && humidity_percent < 80.0
}

/// Resolved location of a weather lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub localtime: String,
}

/// Observed conditions at the time of the request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub wind_direction: String,
    pub uv_index: f64,
}

impl CurrentConditions {
    pub fn sample(&self) -> WeatherSample {
        WeatherSample::new(
            self.temperature_celsius,
            self.humidity_percent,
            self.precipitation_mm,
        )
        .with_wind(self.wind_kph)
        .with_uv(self.uv_index)
    }
}

/// Aggregated weather for one forecast day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub max_temp_celsius: f64,
    pub min_temp_celsius: f64,
    pub avg_temp_celsius: f64,
    pub total_precipitation_mm: f64,
    pub chance_of_rain_percent: i32,
    pub avg_humidity_percent: f64,
    pub condition: String,
}

impl DailySummary {
    /// Day averages are what the risk engine scores for a forecast day
    pub fn sample(&self) -> WeatherSample {
        WeatherSample::new(
            self.avg_temp_celsius,
            self.avg_humidity_percent,
            self.total_precipitation_mm,
        )
    }
}

/// Everything a weather source returns for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    /// Chronological, soonest day first
    pub forecast: Vec<DailySummary>,
}
