//! Theme selection

use axum::{extract::State, routing::get, Json, Router};
use magicmap_common::Theme;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeOption {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub available: Vec<ThemeOption>,
}

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub theme: String,
}

fn response(theme: Theme) -> ThemeResponse {
    ThemeResponse {
        theme,
        available: Theme::all_variants()
            .iter()
            .map(|t| ThemeOption {
                name: t.name(),
                label: t.label(),
            })
            .collect(),
    }
}

/// GET /api/theme
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(response(state.session.read().await.theme()))
}

/// POST /api/theme
pub async fn set_theme(
    State(state): State<AppState>,
    Json(body): Json<SetThemeRequest>,
) -> ApiResult<Json<ThemeResponse>> {
    let theme = Theme::from_name(&body.theme)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown theme: {}", body.theme)))?;
    state.session.write().await.set_theme(theme)?;
    Ok(Json(response(theme)))
}

pub fn theme_routes() -> Router<AppState> {
    Router::new().route("/api/theme", get(get_theme).post(set_theme))
}
