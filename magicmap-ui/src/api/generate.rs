//! Map generation endpoint

use axum::{extract::State, routing::post, Json, Router};
use magicmap_common::MapType;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::services::generator::{GenerationRequest, ImageUpload};
use crate::services::workflow;
use crate::session::SessionSnapshot;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<ImageUpload>,
    /// Map type tag, e.g. "TreeView" or "timeline"
    pub map_type: String,
}

impl GenerateRequest {
    fn into_generation(self) -> ApiResult<GenerationRequest> {
        let map_type = MapType::from_tag(&self.map_type)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown map type: {}", self.map_type)))?;
        Ok(GenerationRequest {
            text: self.text,
            image: self.image.map(|i| ImageUpload::new(i.mime_type, i.data)),
            map_type,
        })
    }
}

/// POST /api/generate
///
/// Blocks until the generator answers; returns the new session state.
pub async fn generate_map(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> ApiResult<Json<SessionSnapshot>> {
    let request = body.into_generation()?;
    workflow::generate(&state, request).await?;
    Ok(Json(state.session.read().await.snapshot()))
}

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate_map))
}
