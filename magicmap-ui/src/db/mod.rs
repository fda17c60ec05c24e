//! Database access for magicmap-ui
//!
//! The settings key-value table (created by `magicmap_common::db`) is the
//! only storage; the last saved map lives under one key.

pub mod saved_map;

pub use magicmap_common::db::init_database;
