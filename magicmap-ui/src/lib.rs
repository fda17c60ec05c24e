//! magicmap-ui library interface
//!
//! The Magic Map service: collects notes, asks the generative AI for a map,
//! and serves the result as a collapsible tree (SVG/PNG from `magicmap-tv`)
//! or as a timeline, storyboard, or character web.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod session;
pub mod views;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use magicmap_common::Theme;
use magicmap_tv::Viewport;
use services::{ConnectivityProbe, MapGenerator};
use session::Session;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (settings table holds the saved map)
    pub db: SqlitePool,
    /// Turns notes into map data
    pub generator: Arc<dyn MapGenerator>,
    /// Checked before every generation
    pub connectivity: Arc<dyn ConnectivityProbe>,
    /// The one session; all mutation goes through this lock
    pub session: Arc<RwLock<Session>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        generator: Arc<dyn MapGenerator>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            db,
            generator,
            connectivity,
            session: Arc::new(RwLock::new(Session::new(Theme::default(), Viewport::default()))),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::generate_routes())
        .merge(api::map_routes())
        .merge(api::theme_routes())
        .merge(api::tree_routes())
        .merge(api::buildinfo_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
