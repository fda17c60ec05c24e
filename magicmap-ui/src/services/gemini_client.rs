//! Gemini generative language API client
//!
//! One `generateContent` call per map. The response schema for the requested
//! map type is sent along so the model answers with JSON of that shape.

use super::generator::{GenerationError, GenerationRequest, MapGenerator};
use super::prompts::{prompt_for, schema_for, IMAGE_PROMPT_PREFIX, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use magicmap_common::{MapData, MapType};
use magicmap_tv::LayoutTree;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const USER_AGENT: &str = concat!("MagicMap/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Gemini client errors
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, GeminiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (e.g. a local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for `generateContent`
    pub fn build_request_body(request: &GenerationRequest) -> Value {
        let mut prompt = prompt_for(request.map_type, &request.text);
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            prompt = format!("{}{}", IMAGE_PROMPT_PREFIX, prompt);
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            }));
        }
        parts.push(json!({ "text": prompt }));

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema_for(request.map_type),
            }
        })
    }

    /// Extract and decode the JSON answer for `map_type`
    pub fn parse_response(map_type: MapType, body: &str) -> Result<MapData, GeminiError> {
        let response: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| GeminiError::Parse(e.to_string()))?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| GeminiError::Parse(e.to_string()))?;

        // Trees get the renderer's own validation so a bad node is reported by path
        if map_type == MapType::TreeView {
            LayoutTree::from_json(&value).map_err(|e| GeminiError::Parse(e.to_string()))?;
        }

        MapData::from_json(map_type, value).map_err(|e| GeminiError::Parse(e.to_string()))
    }

    /// Perform one `generateContent` call
    pub async fn request_map(&self, request: &GenerationRequest) -> Result<MapData, GeminiError> {
        tracing::debug!(
            map_type = %request.map_type,
            model = %self.model,
            has_image = request.image.is_some(),
            text_len = request.text.len(),
            "Querying Gemini API"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request_body(request))
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let data = Self::parse_response(request.map_type, &body)?;
        tracing::info!(map_type = %request.map_type, "Gemini generation successful");
        Ok(data)
    }
}

#[async_trait]
impl MapGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<MapData, GenerationError> {
        self.request_map(request).await.map_err(|e| {
            tracing::warn!(map_type = %request.map_type, error = %e, "Map generation failed");
            GenerationError
        })
    }
}
