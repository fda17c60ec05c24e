//! Session operations that await I/O
//!
//! Each function takes the session lock only for the synchronous state
//! transition on either side of the await, so status reads stay responsive
//! while the generator or the database is busy.

use crate::db::saved_map;
use crate::services::generator::GenerationRequest;
use crate::session::SessionError;
use crate::AppState;
use tracing::{debug, info};

/// Run one generation: guards, generator call, result
pub async fn generate(state: &AppState, request: GenerationRequest) -> Result<(), SessionError> {
    let online = state.connectivity.is_online().await;
    state.session.write().await.begin_generation(&request, online)?;

    info!(
        map_type = %request.map_type,
        has_image = request.image.is_some(),
        "Generating map"
    );
    let result = state.generator.generate(&request).await;

    state.session.write().await.finish_generation(result)
}

/// Persist the current map; `Ok(false)` when there is nothing to save
pub async fn save(state: &AppState) -> Result<bool, SessionError> {
    let Some(map) = state.session.read().await.saved_map() else {
        debug!("Save requested with no map");
        return Ok(false);
    };

    match saved_map::save_map(&state.db, &map).await {
        Ok(()) => {
            state.session.write().await.mark_saved();
            info!(map_type = %map.map_type, "Map saved");
            Ok(true)
        }
        Err(e) => {
            state.session.write().await.record_save_failure();
            Err(e.into())
        }
    }
}

/// Replace the session with the saved map; `Ok(false)` when nothing was saved
pub async fn load(state: &AppState) -> Result<bool, SessionError> {
    if state.session.read().await.is_loading() {
        return Err(SessionError::Busy);
    }
    let result = saved_map::load_map(&state.db).await;
    state.session.write().await.finish_load(result)
}

/// Sync the session's saved-map flag with the store
pub async fn refresh_saved_flag(state: &AppState) -> bool {
    let has_saved_map = saved_map::has_saved_map(&state.db).await;
    state.session.write().await.set_has_saved_map(has_saved_map);
    has_saved_map
}
