//! Current map, its rendered view, and persistence

use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::services::workflow;
use crate::session::SessionSnapshot;
use crate::views::render_view;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub loaded: bool,
    pub state: SessionSnapshot,
}

/// GET /api/map
pub async fn get_map(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.read().await.snapshot())
}

/// GET /api/map/view
pub async fn get_map_view(State(state): State<AppState>) -> Html<String> {
    Html(render_view(&*state.session.read().await))
}

/// POST /api/map/save
pub async fn save_map(State(state): State<AppState>) -> ApiResult<Json<SaveResponse>> {
    let saved = workflow::save(&state).await?;
    Ok(Json(SaveResponse { saved }))
}

/// POST /api/map/load
pub async fn load_map(State(state): State<AppState>) -> ApiResult<Json<LoadResponse>> {
    let loaded = workflow::load(&state).await?;
    Ok(Json(LoadResponse {
        loaded,
        state: state.session.read().await.snapshot(),
    }))
}

/// POST /api/map/reset
pub async fn reset_map(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session.write().await;
    session.start_over()?;
    Ok(Json(session.snapshot()))
}

pub fn map_routes() -> Router<AppState> {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/map/view", get(get_map_view))
        .route("/api/map/save", post(save_map))
        .route("/api/map/load", post(load_map))
        .route("/api/map/reset", post(reset_map))
}
