//! Plant identification client
//!
//! Client for the Gemini `generateContent` REST API. Images and voice notes
//! are sent as inline base64 parts alongside the instruction prompt.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::InputKind;

use crate::error::{AppError, AppResult};

const IDENTIFY_INSTRUCTIONS: &str = "Provide ONLY:
1. Plant common name (single word if possible, e.g., \"Apple\", \"Tomato\", \"Rice\")
2. Disease visible (if any)
3. Confidence (0-100)
Respond in this EXACT format (3 lines only):
PLANT: [Plant Name]
DISEASE: [Disease Name or \"Healthy\"]
CONFIDENCE: [Number 0-100]
Be brief and use simple common names.";

/// Turns user input into the model's three-line identification text
#[axum::async_trait]
pub trait Identifier: Send + Sync {
    /// Identify the plant and disease described by `input`
    async fn identify(&self, input: &str, kind: InputKind) -> AppResult<String>;

    /// Free-form text completion for follow-up questions
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Client for the Gemini generative model
#[derive(Clone)]
pub struct GeminiClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response from `generateContent`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Split an optional `data:<mime>;base64,` prefix from an encoded payload
fn split_data_url(payload: &str) -> (Option<&str>, &str) {
    match payload.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .filter(|mime| !mime.is_empty());
            (mime, data)
        }
        None => (None, payload),
    }
}

/// Check a base64 payload and pick its MIME type
fn inline_part(payload: &str, kind: InputKind) -> AppResult<InlineData> {
    let (mime, data) = split_data_url(payload);
    let data = data.trim();

    let decoded = BASE64.decode(data).map_err(|_| AppError::Validation {
        field: kind.to_string(),
        message: format!("{} payload is not valid base64", kind),
    })?;
    if decoded.is_empty() {
        return Err(AppError::Validation {
            field: kind.to_string(),
            message: format!("{} payload is empty", kind),
        });
    }

    Ok(InlineData {
        mime_type: mime.unwrap_or(kind.default_mime_type()).to_string(),
        data: data.to_string(),
    })
}

fn identification_parts(input: &str, kind: InputKind) -> AppResult<Vec<Part>> {
    let parts = match kind {
        InputKind::Image => vec![
            Part::Text {
                text: format!(
                    "You are an expert Botanist. Analyze this plant image and {}",
                    IDENTIFY_INSTRUCTIONS
                ),
            },
            Part::InlineData {
                inline_data: inline_part(input, kind)?,
            },
        ],
        InputKind::Text => vec![Part::Text {
            text: format!(
                "You are an expert Botanist. Analyze this plant description and {}\nDescription: {}",
                IDENTIFY_INSTRUCTIONS, input
            ),
        }],
        InputKind::Audio => vec![
            Part::Text {
                text: format!(
                    "Transcribe and analyze this voice description of a plant. {}",
                    IDENTIFY_INSTRUCTIONS
                ),
            },
            Part::InlineData {
                inline_data: inline_part(input, kind)?,
            },
        ],
    };

    Ok(parts)
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_endpoint: String, api_key: String, model: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            model,
            http_client,
        })
    }

    async fn generate_content(&self, parts: Vec<Part>) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_endpoint, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AiServiceError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Failed to parse response: {}", e)))?;

        result
            .text()
            .ok_or_else(|| AppError::AiServiceError("Model returned no text".to_string()))
    }
}

#[axum::async_trait]
impl Identifier for GeminiClient {
    async fn identify(&self, input: &str, kind: InputKind) -> AppResult<String> {
        let parts = identification_parts(input, kind)?;

        self.generate_content(parts).await.map_err(|e| match e {
            AppError::AiServiceError(msg) => AppError::IdentificationFailed(msg),
            other => other,
        })
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.generate_content(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }
}
