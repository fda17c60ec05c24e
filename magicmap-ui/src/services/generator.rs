//! Map generation seam
//!
//! [`MapGenerator`] is the one call the session makes to turn notes into map
//! data. The production implementation is
//! [`GeminiClient`](super::gemini_client::GeminiClient); tests substitute their own.

use async_trait::async_trait;
use base64::Engine;
use magicmap_common::{MapData, MapType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Only message ever shown for a failed generation
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to get a valid structure from the AI.";

/// Generation failure; the cause is logged where it happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", GENERATION_FAILED_MESSAGE)]
pub struct GenerationError;

/// Scanned notes attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    /// e.g. `image/png`
    pub mime_type: String,
    /// Base64 (standard alphabet) without a `data:` prefix
    pub data: String,
}

impl ImageUpload {
    /// Accepts a bare base64 payload or a `data:<mime>;base64,<payload>` URL
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let data = data.into();
        let data = match data.split_once(";base64,") {
            Some((prefix, payload)) if prefix.starts_with("data:") => payload.to_string(),
            _ => data,
        };
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Check the MIME type and that the payload decodes
    pub fn validate(&self) -> Result<(), String> {
        if !self.mime_type.starts_with("image/") {
            return Err(format!("Unsupported upload type: {}", self.mime_type));
        }
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|_| "Could not read the uploaded file. Please try a different image.".to_string())
            .and_then(|bytes| {
                if bytes.is_empty() {
                    Err("The uploaded file is empty.".to_string())
                } else {
                    Ok(())
                }
            })
    }
}

/// Input for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub text: String,
    pub image: Option<ImageUpload>,
    pub map_type: MapType,
}

impl GenerationRequest {
    /// No usable text and no image
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }
}

#[async_trait]
pub trait MapGenerator: Send + Sync {
    /// Produce map data of `request.map_type`
    async fn generate(&self, request: &GenerationRequest) -> Result<MapData, GenerationError>;
}
