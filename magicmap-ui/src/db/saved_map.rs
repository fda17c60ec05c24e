//! Persistence of the last map
//!
//! One key (`magicMapData`) holds `{ "mapType": ..., "data": ... }` as JSON.
//! Saving overwrites. A value that no longer parses as its declared shape is
//! reported as [`SavedMapError::Corrupt`] so the caller can clear its state.

use magicmap_common::db::settings;
use magicmap_common::SavedMap;
use sqlx::{Pool, Sqlite};
use thiserror::Error;
use tracing::{debug, error};

/// Key of the saved map in the settings table
pub const SAVED_MAP_KEY: &str = "magicMapData";

pub const SAVE_FAILED_MESSAGE: &str = "Oops! Couldn't save your map.";
pub const LOAD_FAILED_MESSAGE: &str = "Oh no! The saved map seems to be broken.";

/// Saved map failures; `Display` is the user-facing message
#[derive(Debug, Error)]
pub enum SavedMapError {
    #[error("{}", SAVE_FAILED_MESSAGE)]
    WriteFailed(#[source] magicmap_common::Error),

    #[error("{}", LOAD_FAILED_MESSAGE)]
    ReadFailed(#[source] magicmap_common::Error),

    #[error("{}", LOAD_FAILED_MESSAGE)]
    Corrupt(#[source] serde_json::Error),
}

/// Overwrite the saved map
pub async fn save_map(db: &Pool<Sqlite>, map: &SavedMap) -> Result<(), SavedMapError> {
    let json = serde_json::to_string(map)
        .map_err(|e| SavedMapError::WriteFailed(magicmap_common::Error::Json(e)))?;

    settings::set_setting(db, SAVED_MAP_KEY, json)
        .await
        .map_err(|e| {
            error!("Failed to save map: {}", e);
            SavedMapError::WriteFailed(e)
        })?;

    debug!(map_type = %map.map_type, "Saved map");
    Ok(())
}

/// Read the saved map; `Ok(None)` if nothing was ever saved
pub async fn load_map(db: &Pool<Sqlite>) -> Result<Option<SavedMap>, SavedMapError> {
    let Some(json) = settings::get_setting_text(db, SAVED_MAP_KEY)
        .await
        .map_err(|e| {
            error!("Failed to read saved map: {}", e);
            SavedMapError::ReadFailed(e)
        })?
    else {
        return Ok(None);
    };

    let map: SavedMap = serde_json::from_str(&json).map_err(|e| {
        error!("Saved map is corrupt: {}", e);
        SavedMapError::Corrupt(e)
    })?;

    debug!(map_type = %map.map_type, "Loaded saved map");
    Ok(Some(map))
}

/// True if a saved map exists (it may still be corrupt)
pub async fn has_saved_map(db: &Pool<Sqlite>) -> bool {
    matches!(settings::get_setting_text(db, SAVED_MAP_KEY).await, Ok(Some(_)))
}
