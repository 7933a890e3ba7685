//! Weather API client for fetching weather data
//!
//! Integrates with the WeatherAPI.com forecast endpoint for current
//! conditions and daily forecasts.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{CurrentConditions, DailySummary, LocationInfo, WeatherReport};

use crate::error::{AppError, AppResult};

/// Source of current conditions and a daily forecast for a location
#[axum::async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch weather for a free-text location.
    ///
    /// Unknown locations and upstream failures both surface as
    /// [`AppError::WeatherUnavailable`].
    async fn fetch(&self, location: &str) -> AppResult<WeatherReport>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    forecast_days: u8,
}

/// WeatherAPI.com forecast response
#[derive(Debug, Deserialize)]
struct WAForecastResponse {
    location: WALocation,
    current: WACurrent,
    forecast: WAForecast,
}

#[derive(Debug, Deserialize)]
struct WALocation {
    name: String,
    region: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WACondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WACurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: f64,
    #[serde(default)]
    precip_mm: f64,
    condition: WACondition,
    wind_kph: f64,
    wind_dir: String,
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct WAForecast {
    forecastday: Vec<WAForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WAForecastDay {
    date: NaiveDate,
    day: WADay,
}

#[derive(Debug, Deserialize)]
struct WADay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    totalprecip_mm: f64,
    daily_chance_of_rain: i32,
    avghumidity: f64,
    condition: WACondition,
}

/// WeatherAPI.com error envelope
#[derive(Debug, Deserialize)]
struct WAErrorResponse {
    error: WAError,
}

#[derive(Debug, Deserialize)]
struct WAError {
    code: i32,
    message: String,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String, base_url: String, forecast_days: u8, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            forecast_days,
        })
    }

    /// Convert a WeatherAPI.com response to our format
    fn convert_response(data: WAForecastResponse) -> WeatherReport {
        let current = CurrentConditions {
            temperature_celsius: data.current.temp_c,
            feels_like_celsius: data.current.feelslike_c,
            humidity_percent: data.current.humidity,
            precipitation_mm: data.current.precip_mm,
            condition: data.current.condition.text,
            wind_kph: data.current.wind_kph,
            wind_direction: data.current.wind_dir,
            uv_index: data.current.uv,
        };

        let forecast = data
            .forecast
            .forecastday
            .into_iter()
            .map(|item| DailySummary {
                date: item.date,
                max_temp_celsius: item.day.maxtemp_c,
                min_temp_celsius: item.day.mintemp_c,
                avg_temp_celsius: item.day.avgtemp_c,
                total_precipitation_mm: item.day.totalprecip_mm,
                chance_of_rain_percent: item.day.daily_chance_of_rain,
                avg_humidity_percent: item.day.avghumidity,
                condition: item.day.condition.text,
            })
            .collect();

        WeatherReport {
            location: LocationInfo {
                name: data.location.name,
                region: data.location.region,
                localtime: data.location.localtime,
            },
            current,
            forecast,
        }
    }
}

#[axum::async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch(&self, location: &str) -> AppResult<WeatherReport> {
        let url = format!("{}/forecast.json", self.base_url);
        let days = self.forecast_days.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "yes"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(location, "Weather API request failed: {}", e);
                AppError::WeatherUnavailable(location.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<WAErrorResponse>(&body) {
                Ok(envelope) if status == StatusCode::BAD_REQUEST => {
                    tracing::info!(
                        location,
                        code = envelope.error.code,
                        "Weather API rejected location: {}",
                        envelope.error.message
                    );
                }
                _ => tracing::warn!(location, "Weather API error: {} - {}", status, body),
            }
            return Err(AppError::WeatherUnavailable(location.to_string()));
        }

        let data: WAForecastResponse = response.json().await.map_err(|e| {
            tracing::warn!(location, "Failed to parse weather response: {}", e);
            AppError::WeatherUnavailable(location.to_string())
        })?;

        Ok(Self::convert_response(data))
    }
}
