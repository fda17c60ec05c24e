//! # Magic Map Common Library
//!
//! Shared code for the Magic Map crates including:
//! - Map data models (tree, timeline, storyboard, character web)
//! - Saved-map layout for the key-value store
//! - Themes and their palettes
//! - Easing curves for animated transitions
//! - Configuration loading
//! - Database initialization and settings access

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod easing;
pub mod error;
pub mod models;
pub mod theme;

pub use easing::Easing;
pub use error::{Error, Result};
pub use models::{MapData, MapType, SavedMap, TreeNode};
pub use theme::Theme;
