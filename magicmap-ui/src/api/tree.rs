//! Tree view interaction: toggle, pan, zoom, SVG frames, PNG export

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use magicmap_tv::export::EXPORT_FILE_NAME;
use magicmap_tv::geometry::Point;
use magicmap_tv::{NodeId, ToggleOutcome, Transform, Viewport};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: NodeId,
    pub outcome: &'static str,
    pub visible: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub factor: f64,
    /// Anchor in viewport coordinates; viewport center when absent
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PanRequest {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Deserialize)]
pub struct ViewportRequest {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct ViewportResponse {
    pub viewport: Viewport,
    pub transform: Option<Transform>,
}

#[derive(Debug, Deserialize)]
pub struct SvgQuery {
    /// Milliseconds into the running transition; live clock when absent
    pub t: Option<f64>,
}

fn outcome_name(outcome: ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Collapsed => "collapsed",
        ToggleOutcome::Expanded => "expanded",
        ToggleOutcome::Leaf => "leaf",
    }
}

/// POST /api/tree/toggle/:id
pub async fn toggle_node(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ToggleResponse>> {
    let id = NodeId(id);
    let mut session = state.session.write().await;
    let outcome = session.toggle(id)?;
    let visible = session
        .renderer()
        .tree()
        .map(|t| t.visible_ids())
        .unwrap_or_default();

    Ok(Json(ToggleResponse {
        id,
        outcome: outcome_name(outcome),
        visible,
    }))
}

/// POST /api/tree/zoom
pub async fn zoom(
    State(state): State<AppState>,
    Json(body): Json<ZoomRequest>,
) -> ApiResult<Json<Transform>> {
    if !body.factor.is_finite() || body.factor <= 0.0 {
        return Err(ApiError::BadRequest("Zoom factor must be positive".to_string()));
    }
    let anchor = match (body.x, body.y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    };
    let transform = state.session.write().await.zoom(body.factor, anchor)?;
    Ok(Json(transform))
}

/// POST /api/tree/pan
pub async fn pan(
    State(state): State<AppState>,
    Json(body): Json<PanRequest>,
) -> ApiResult<Json<Transform>> {
    if !body.dx.is_finite() || !body.dy.is_finite() {
        return Err(ApiError::BadRequest("Pan offsets must be finite".to_string()));
    }
    let transform = state.session.write().await.pan(body.dx, body.dy)?;
    Ok(Json(transform))
}

/// POST /api/tree/viewport
pub async fn set_viewport(
    State(state): State<AppState>,
    Json(body): Json<ViewportRequest>,
) -> ApiResult<Json<ViewportResponse>> {
    let viewport = Viewport::new(body.width, body.height);
    if !body.width.is_finite() || !body.height.is_finite() || viewport.is_empty() {
        return Err(ApiError::BadRequest("Viewport must have a positive size".to_string()));
    }
    let transform = state.session.write().await.set_viewport(viewport)?;
    Ok(Json(ViewportResponse { viewport, transform }))
}

/// GET /api/tree/svg
pub async fn tree_svg(
    State(state): State<AppState>,
    Query(query): Query<SvgQuery>,
) -> Response {
    let session = state.session.read().await;
    let renderer = session.renderer();
    let elapsed = query
        .t
        .or_else(|| renderer.elapsed_ms())
        .unwrap_or(0.0);
    ([(header::CONTENT_TYPE, "image/svg+xml")], renderer.svg(elapsed)).into_response()
}

/// GET /api/tree/export.png
///
/// `204 No Content` when there is no tree to export.
pub async fn export_png(State(state): State<AppState>) -> Response {
    match state.session.read().await.export_png() {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Export skipped");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

pub fn tree_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tree/toggle/:id", post(toggle_node))
        .route("/api/tree/zoom", post(zoom))
        .route("/api/tree/pan", post(pan))
        .route("/api/tree/viewport", post(set_viewport))
        .route("/api/tree/svg", get(tree_svg))
        .route("/api/tree/export.png", get(export_png))
}
