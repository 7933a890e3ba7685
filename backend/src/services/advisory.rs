//! Advisory orchestration
//!
//! Sequences the collaborators behind the two primary documents: the
//! identification result (model output fused with both reference tables)
//! and the weather advisory (forecast run through the disease-risk engine).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{
    ForecastAnalyzer, IdentificationRecord, InputKind, RuleTable, TreatmentType, WeatherAdvisory,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::{Identifier, WeatherSource};
use crate::services::lookup::{LookupService, ReferenceRecord, ReferenceSource, SourceStatus};
use crate::AppState;

/// Input for plant analysis: exactly one of image, audio or text is used
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeInput {
    pub image: Option<String>,
    pub audio: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub treatment_type: TreatmentType,
}

impl AnalyzeInput {
    /// Selected payload, preferring image, then audio, then text
    pub fn payload(&self) -> AppResult<(&str, InputKind)> {
        let (payload, kind) = if let Some(image) = &self.image {
            (image, InputKind::Image)
        } else if let Some(audio) = &self.audio {
            (audio, InputKind::Audio)
        } else if let Some(text) = &self.text {
            (text, InputKind::Text)
        } else {
            return Err(AppError::ValidationError(
                "No input data provided (image, audio, or text)".to_string(),
            ));
        };

        if payload.trim().is_empty() {
            return Err(AppError::Validation {
                field: kind.to_string(),
                message: format!("{} input cannot be empty", kind),
            });
        }

        Ok((payload, kind))
    }
}

/// Identification result document
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IdentificationResponse {
    pub plant_name: String,
    pub disease: String,
    pub confidence: u8,
    pub treatment_type: TreatmentType,
    pub plant_database_match: bool,
    pub pesticide_database_match: bool,
    pub plant_data: Option<ReferenceRecord>,
    pub pesticide_data: Option<ReferenceRecord>,
    pub analysis_complete: bool,
}

/// Input for a weather advisory
#[derive(Debug, Default, Deserialize)]
pub struct WeatherAdvisoryInput {
    pub location: Option<String>,
    pub plant_name: Option<String>,
}

/// Plant context for a chatbot question
#[derive(Debug, Default, Deserialize)]
pub struct PlantContext {
    pub plant_name: Option<String>,
    pub disease: Option<String>,
}

/// Input for a chatbot question
#[derive(Debug, Deserialize, Validate)]
pub struct ChatInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Query must be 1-2000 characters"))]
    pub query: String,
    #[serde(default)]
    pub plant_info: PlantContext,
}

/// Chatbot answer
#[derive(Debug, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
}

/// Availability of both reference tables
#[derive(Debug, Serialize, PartialEq)]
pub struct DatabaseStatus {
    pub plant_database: SourceStatus,
    pub solution_database: SourceStatus,
}

/// Coordinates identification, lookups and forecast analysis for a request
pub struct AdvisoryService<'a> {
    rules: &'a RuleTable,
    identifier: &'a dyn Identifier,
    weather: &'a dyn WeatherSource,
    plant_source: &'a dyn ReferenceSource,
    solution_source: &'a dyn ReferenceSource,
    default_location: &'a str,
    default_crop: &'a str,
    query_timeout: Duration,
}

impl<'a> AdvisoryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            rules: &state.rules,
            identifier: state.identifier.as_ref(),
            weather: state.weather.as_ref(),
            plant_source: state.plant_source.as_ref(),
            solution_source: state.solution_source.as_ref(),
            default_location: &state.defaults.default_location,
            default_crop: &state.defaults.default_crop,
            query_timeout: state.query_timeout,
        }
    }

    /// Identify a plant and attach reference data for it
    pub async fn analyze(&self, input: AnalyzeInput) -> AppResult<IdentificationResponse> {
        let (payload, kind) = input.payload()?;

        let raw = self.identifier.identify(payload, kind).await?;
        let record: IdentificationRecord = raw.parse()?;

        tracing::info!(
            plant = %record.plant,
            disease = %record.disease,
            confidence = record.confidence,
            %kind,
            "Plant identified"
        );

        let plant_lookup = LookupService::new(self.plant_source).with_timeout(self.query_timeout);
        let solution_lookup = LookupService::new(self.solution_source).with_timeout(self.query_timeout);
        let (plant_match, solution_match) = tokio::join!(
            plant_lookup.find_plant_facts(&record.plant, &record.disease),
            solution_lookup.find_solution_facts(&record.plant, &record.disease),
        );

        Ok(IdentificationResponse {
            plant_name: record.plant,
            disease: record.disease,
            confidence: record.confidence,
            treatment_type: input.treatment_type,
            plant_database_match: plant_match.found,
            pesticide_database_match: solution_match.found,
            plant_data: plant_match.record,
            pesticide_data: solution_match.record,
            analysis_complete: true,
        })
    }

    /// Disease-risk advisory for a crop at a location
    pub async fn weather_advisory(&self, input: WeatherAdvisoryInput) -> AppResult<WeatherAdvisory> {
        let location = input
            .location
            .as_deref()
            .unwrap_or(self.default_location)
            .trim();
        let crop = input.plant_name.as_deref().unwrap_or(self.default_crop);

        shared::validate_location(location).map_err(|msg| AppError::Validation {
            field: "location".to_string(),
            message: msg.to_string(),
        })?;

        let report = self.weather.fetch(location).await?;
        let analysis = ForecastAnalyzer::new(self.rules).analyze(crop, &report.current, &report.forecast);

        tracing::info!(
            location = %report.location.name,
            crop,
            risk = %analysis.current_weather.risk_level,
            forecast_days = analysis.forecast.len(),
            "Weather advisory composed"
        );

        Ok(WeatherAdvisory {
            location: report.location,
            analysis,
        })
    }

    /// Answer a free-text question about a plant
    pub async fn chat(&self, input: ChatInput) -> AppResult<ChatAnswer> {
        input.validate()?;

        let plant = input.plant_info.plant_name.as_deref().unwrap_or("Unknown");
        let disease = input.plant_info.disease.as_deref().unwrap_or("Unknown");
        let prompt = format!(
            "You are a plant disease expert chatbot. The user is asking about:\n\
             Plant: {}\n\
             Disease: {}\n\
             User question: {}\n\
             Provide a helpful, concise answer (2-3 sentences) about this specific plant and disease.",
            plant, disease, input.query
        );

        let answer = self.identifier.generate(&prompt).await?;
        Ok(ChatAnswer { answer })
    }

    /// Row counts for both reference tables, checked independently
    pub async fn database_status(&self) -> DatabaseStatus {
        let plant_lookup = LookupService::new(self.plant_source).with_timeout(self.query_timeout);
        let solution_lookup = LookupService::new(self.solution_source).with_timeout(self.query_timeout);
        let (plant_database, solution_database) =
            tokio::join!(plant_lookup.status(), solution_lookup.status());

        DatabaseStatus {
            plant_database,
            solution_database,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FixtureWeather, ScriptedIdentifier};
    use super::*;
    use crate::services::lookup::memory::MemoryReferenceSource;
    use crate::test_support::state_with;
    use serde_json::json;
    use std::sync::Arc;

    fn plant_facts() -> MemoryReferenceSource {
        MemoryReferenceSource::new("plant_data", "plant_name", "disease_name").with_row(
            json!({"plant_name": "Rice", "disease_name": "Blast", "symptoms": "Diamond lesions"}),
        )
    }

    fn solutions() -> MemoryReferenceSource {
        MemoryReferenceSource::new("pesticide_solutions", "Plant", "Disease")
            .with_row(json!({"Plant": "Tomato", "Disease": "Early Blight", "Pesticide": "Mancozeb"}))
    }

    #[tokio::test]
    async fn test_analyze_fuses_both_sources() {
        let state = state_with(
            ScriptedIdentifier::replying("PLANT: Rice\nDISEASE: Blast\nCONFIDENCE: 88"),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let response = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("grey spindle spots on rice leaves".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.plant_name, "Rice");
        assert_eq!(response.disease, "Blast");
        assert_eq!(response.confidence, 88);
        assert_eq!(response.treatment_type, TreatmentType::Chemical);
        assert!(response.plant_database_match);
        assert!(!response.pesticide_database_match);
        assert_eq!(response.plant_data.unwrap()["symptoms"], "Diamond lesions");
        assert!(response.pesticide_data.is_none());
        assert!(response.analysis_complete);
    }

    #[tokio::test]
    async fn test_analyze_prefers_image_over_text() {
        let identifier = ScriptedIdentifier::replying("PLANT: Tomato\nDISEASE: Early Blight\nCONFIDENCE: 70");
        let state = state_with(identifier, FixtureWeather::bangalore(), plant_facts(), solutions());

        let response = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                image: Some("aGVsbG8=".to_string()),
                text: Some("ignored".to_string()),
                treatment_type: TreatmentType::Organic,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.treatment_type, TreatmentType::Organic);
        assert!(response.pesticide_database_match);
        assert_eq!(response.pesticide_data.unwrap()["Pesticide"], "Mancozeb");
    }

    #[test]
    fn test_payload_selection() {
        let input = AnalyzeInput {
            audio: Some("aGVsbG8=".to_string()),
            text: Some("leaf".to_string()),
            ..Default::default()
        };
        assert_eq!(input.payload().unwrap().1, InputKind::Audio);

        assert!(matches!(
            AnalyzeInput::default().payload(),
            Err(AppError::ValidationError(_))
        ));

        let blank = AnalyzeInput {
            text: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank.payload(), Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_plant_aborts_without_lookups() {
        let plants = Arc::new(plant_facts());
        let pesticides = Arc::new(solutions());
        let mut state = state_with(
            ScriptedIdentifier::replying("DISEASE: Blast\nCONFIDENCE: 88"),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );
        state.plant_source = plants.clone();
        state.solution_source = pesticides.clone();

        let result = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("a plant".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::IdentificationFailed(_))));
        assert!(plants.query_log().is_empty());
        assert!(pesticides.query_log().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_reference_table_degrades_to_no_match() {
        let mut state = state_with(
            ScriptedIdentifier::replying("PLANT: Rice\nDISEASE: Blast\nCONFIDENCE: 88"),
            FixtureWeather::bangalore(),
            plant_facts().slow(Duration::from_millis(500)),
            solutions(),
        );
        state.query_timeout = Duration::from_millis(20);

        let response = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("grey spindle spots".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!response.plant_database_match);
        assert!(response.plant_data.is_none());
        assert!(response.analysis_complete);
    }

    #[tokio::test]
    async fn test_malformed_confidence_is_identification_failure() {
        let state = state_with(
            ScriptedIdentifier::replying("PLANT: Rice\nCONFIDENCE: very"),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let result = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("a plant".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::IdentificationFailed(_))));
    }

    #[tokio::test]
    async fn test_identifier_failure_propagates() {
        let state = state_with(
            ScriptedIdentifier::failing(),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let result = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("a plant".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::IdentificationFailed(_))));
    }

    #[tokio::test]
    async fn test_broken_reference_source_degrades() {
        let state = state_with(
            ScriptedIdentifier::replying("PLANT: Rice\nDISEASE: Blast\nCONFIDENCE: 88"),
            FixtureWeather::bangalore(),
            plant_facts().failing(),
            solutions(),
        );

        let response = AdvisoryService::new(&state)
            .analyze(AnalyzeInput {
                text: Some("a plant".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!response.plant_database_match);
        assert!(response.plant_data.is_none());
        assert!(response.analysis_complete);

        let status = AdvisoryService::new(&state).database_status().await;
        assert!(matches!(status.plant_database, SourceStatus::Error { .. }));
        assert_eq!(status.solution_database, SourceStatus::Connected { records: 1 });
    }

    #[tokio::test]
    async fn test_weather_advisory() {
        let state = state_with(
            ScriptedIdentifier::replying(""),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let advisory = AdvisoryService::new(&state)
            .weather_advisory(WeatherAdvisoryInput {
                location: Some("Bangalore".to_string()),
                plant_name: Some("Rice".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(advisory.location.region, "Karnataka");
        let titles: Vec<&str> = advisory
            .analysis
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["HEAVY RAINFALL ALERT", "HIGH HUMIDITY WARNING", "STRONG WIND ALERT"]
        );
        assert_eq!(
            advisory.analysis.spray_days,
            vec!["2026-10-20 (Day 2)".to_string()]
        );
        assert_eq!(advisory.analysis.forecast[0].predictions[0].disease, "Blast");
    }

    #[tokio::test]
    async fn test_weather_advisory_is_reproducible() {
        let state = state_with(
            ScriptedIdentifier::replying(""),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );
        let service = AdvisoryService::new(&state);

        let first = service
            .weather_advisory(WeatherAdvisoryInput::default())
            .await
            .unwrap();
        let second = service
            .weather_advisory(WeatherAdvisoryInput::default())
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_weather_unavailable() {
        let state = state_with(
            ScriptedIdentifier::replying(""),
            FixtureWeather::unavailable(),
            plant_facts(),
            solutions(),
        );

        let result = AdvisoryService::new(&state)
            .weather_advisory(WeatherAdvisoryInput {
                location: Some("Atlantis".to_string()),
                plant_name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::WeatherUnavailable(ref l)) if l == "Atlantis"));
    }

    #[tokio::test]
    async fn test_chat_builds_prompt_from_context() {
        let state = state_with(
            ScriptedIdentifier::replying("Spray tricyclazole at booting."),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let answer = AdvisoryService::new(&state)
            .chat(ChatInput {
                query: "When should I spray?".to_string(),
                plant_info: PlantContext {
                    plant_name: Some("Rice".to_string()),
                    disease: None,
                },
            })
            .await
            .unwrap();

        assert_eq!(answer.answer, "Spray tricyclazole at booting.");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_query() {
        let state = state_with(
            ScriptedIdentifier::replying("unused"),
            FixtureWeather::bangalore(),
            plant_facts(),
            solutions(),
        );

        let result = AdvisoryService::new(&state)
            .chat(ChatInput {
                query: String::new(),
                plant_info: PlantContext::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
