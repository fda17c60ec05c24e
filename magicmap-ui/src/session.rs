//! Session state
//!
//! One [`Session`] per process, owned by [`AppState`](crate::AppState) behind
//! a `RwLock`. Methods here are synchronous state transitions; the awaits
//! (generation, persistence) happen in [`crate::services::workflow`] between
//! them, never while the lock is held.

use crate::db::saved_map::{SavedMapError, LOAD_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};
use crate::error::ApiError;
use crate::services::generator::{GenerationError, GenerationRequest, ImageUpload};
use crate::views::dispatcher::{dispatch, View};
use magicmap_common::{MapData, MapType, SavedMap, Theme};
use magicmap_tv::geometry::Point;
use magicmap_tv::{NodeId, ToggleOutcome, Transform, TreeError, TreeRenderer, Viewport};
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub const OFFLINE_MESSAGE: &str =
    "You're currently offline. The AI needs an internet connection to create a new map.";
pub const EMPTY_INPUT_MESSAGE: &str = "Please write something or upload a scan!";
pub const BUSY_MESSAGE: &str = "A map is already being drawn. Please wait for it to finish.";

/// How long the "saved" confirmation stays up
pub const SAVE_CONFIRMATION: Duration = Duration::from_secs(2);

/// Session failures; `Display` is what the user sees
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{}", OFFLINE_MESSAGE)]
    Offline,

    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    #[error("{}", BUSY_MESSAGE)]
    Busy,

    #[error("{0}")]
    InvalidImage(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    SavedMap(#[from] SavedMapError),

    #[error("Only tree maps can be exported")]
    ExportUnsupported,

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::Offline => ApiError::Offline(message),
            SessionError::EmptyInput | SessionError::InvalidImage(_) => ApiError::BadRequest(message),
            SessionError::Busy | SessionError::ExportUnsupported => ApiError::Conflict(message),
            SessionError::Generation(_) => ApiError::Upstream(message),
            SessionError::SavedMap(_) => ApiError::Internal(message),
            SessionError::Tree(e) => ApiError::Tree(e),
        }
    }
}

/// Last submitted input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInput {
    pub text: String,
    pub image: Option<ImageUpload>,
}

pub struct Session {
    map_type: MapType,
    map: Option<MapData>,
    renderer: TreeRenderer,
    loading: bool,
    error: Option<String>,
    save_confirmed_at: Option<Instant>,
    input: SessionInput,
    has_saved_map: bool,
}

impl Session {
    pub fn new(theme: Theme, viewport: Viewport) -> Self {
        Self {
            map_type: MapType::default(),
            map: None,
            renderer: TreeRenderer::new(theme, viewport),
            loading: false,
            error: None,
            save_confirmed_at: None,
            input: SessionInput::default(),
            has_saved_map: false,
        }
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    pub fn map(&self) -> Option<&MapData> {
        self.map.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.renderer.theme()
    }

    pub fn renderer(&self) -> &TreeRenderer {
        &self.renderer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &SessionInput {
        &self.input
    }

    pub fn has_saved_map(&self) -> bool {
        self.has_saved_map
    }

    pub fn set_has_saved_map(&mut self, has_saved_map: bool) {
        self.has_saved_map = has_saved_map;
    }

    /// View for the current map (`Welcome` when there is none)
    pub fn view(&self) -> View {
        dispatch(self.map.as_ref().map(MapData::map_type))
    }

    /// Guard checks, then enter the loading state
    ///
    /// Offline and empty input leave their message in the session; a busy
    /// session is rejected without touching the current message.
    pub fn begin_generation(
        &mut self,
        request: &GenerationRequest,
        online: bool,
    ) -> Result<(), SessionError> {
        if !online {
            self.error = Some(OFFLINE_MESSAGE.to_string());
            return Err(SessionError::Offline);
        }
        if request.is_empty() {
            self.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return Err(SessionError::EmptyInput);
        }
        if self.loading {
            return Err(SessionError::Busy);
        }
        if let Some(image) = &request.image {
            if let Err(message) = image.validate() {
                self.error = Some(message.clone());
                return Err(SessionError::InvalidImage(message));
            }
        }

        self.input = SessionInput {
            text: request.text.clone(),
            image: request.image.clone(),
        };
        self.loading = true;
        self.error = None;
        self.clear_map();
        self.save_confirmed_at = None;
        self.map_type = request.map_type;
        Ok(())
    }

    /// Store the generator's answer and leave the loading state
    pub fn finish_generation(
        &mut self,
        result: Result<MapData, GenerationError>,
    ) -> Result<(), SessionError> {
        self.loading = false;
        match result {
            Ok(data) => {
                if let Err(e) = self.show(data) {
                    warn!(error = %e, "Generated tree could not be laid out");
                    self.error = Some(GenerationError.to_string());
                    return Err(GenerationError.into());
                }
                info!(map_type = %self.map_type, "Map ready");
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Back to the welcome state; the theme and saved-map flag survive
    ///
    /// Refused while a generation is outstanding.
    pub fn start_over(&mut self) -> Result<(), SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.clear_map();
        self.error = None;
        self.loading = false;
        self.input = SessionInput::default();
        self.save_confirmed_at = None;
    }

    /// Current map in its persisted layout
    pub fn saved_map(&self) -> Option<SavedMap> {
        self.map.clone().map(SavedMap::new)
    }

    pub fn mark_saved(&mut self) {
        self.has_saved_map = true;
        self.save_confirmed_at = Some(Instant::now());
    }

    pub fn save_confirmation_visible(&self) -> bool {
        self.save_confirmed_at
            .map(|at| at.elapsed() < SAVE_CONFIRMATION)
            .unwrap_or(false)
    }

    pub fn record_save_failure(&mut self) {
        self.error = Some(SAVE_FAILED_MESSAGE.to_string());
    }

    /// Apply the outcome of reading the saved map
    ///
    /// Always starts over first. A broken save leaves no map and the
    /// broken-map message. Refused while a generation is outstanding.
    pub fn finish_load(
        &mut self,
        result: Result<Option<SavedMap>, SavedMapError>,
    ) -> Result<bool, SessionError> {
        self.start_over()?;
        match result {
            Ok(None) => Ok(false),
            Ok(Some(saved)) => {
                self.map_type = saved.map_type;
                if let Err(e) = self.show(saved.data) {
                    warn!(error = %e, "Saved tree could not be laid out");
                    self.clear_map();
                    self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                    return Err(SessionError::Tree(e));
                }
                info!(map_type = %self.map_type, "Loaded saved map");
                Ok(true)
            }
            Err(e) => {
                self.clear_map();
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Switch theme; a shown tree is rebuilt from its data
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SessionError> {
        self.renderer.set_theme(theme)?;
        info!(theme = theme.name(), "Theme changed");
        Ok(())
    }

    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome, SessionError> {
        Ok(self.renderer.toggle(id)?)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<Transform, SessionError> {
        Ok(self.renderer.pan(dx, dy)?)
    }

    pub fn zoom(&mut self, factor: f64, anchor: Option<Point>) -> Result<Transform, SessionError> {
        Ok(self.renderer.zoom(factor, anchor)?)
    }

    /// Resize the drawing area and re-fit a shown tree
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<Option<Transform>, SessionError> {
        self.renderer.set_viewport(viewport);
        if self.renderer.is_idle() {
            return Ok(None);
        }
        Ok(Some(self.renderer.fit()?))
    }

    /// PNG of the shown tree; other map types cannot be exported
    pub fn export_png(&self) -> Result<Vec<u8>, SessionError> {
        match self.map {
            Some(MapData::Tree(_)) => Ok(self.renderer.export_png()?),
            _ => Err(SessionError::ExportUnsupported),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tree = self.renderer.tree().map(|tree| TreeSnapshot {
            nodes: tree.len(),
            visible: tree.visible_ids(),
            collapsed: tree
                .nodes()
                .filter(|n| n.is_collapsed())
                .map(|n| n.id)
                .collect(),
            transform: self.renderer.transform().unwrap_or_default(),
        });

        SessionSnapshot {
            map_type: self.map_type,
            view: self.view(),
            data: self.map.clone(),
            theme: self.theme(),
            loading: self.loading,
            error: self.error.clone(),
            save_confirmation: self.save_confirmation_visible(),
            has_saved_map: self.has_saved_map,
            viewport: self.renderer.viewport(),
            tree,
        }
    }

    fn show(&mut self, data: MapData) -> Result<(), TreeError> {
        self.renderer.build(data.as_tree())?;
        self.map = Some(data);
        Ok(())
    }

    fn clear_map(&mut self) {
        self.map = None;
        // Building with no tree cannot fail
        let _ = self.renderer.build(None);
    }
}

/// Serializable view of the session for `GET /api/map`
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub map_type: MapType,
    pub view: View,
    pub data: Option<MapData>,
    pub theme: Theme,
    pub loading: bool,
    pub error: Option<String>,
    pub save_confirmation: bool,
    pub has_saved_map: bool,
    pub viewport: Viewport,
    pub tree: Option<TreeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub nodes: usize,
    pub visible: Vec<NodeId>,
    pub collapsed: Vec<NodeId>,
    pub transform: Transform,
}
