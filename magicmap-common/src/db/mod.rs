//! Database access shared by Magic Map crates
//!
//! The service keeps its state in a single SQLite file under the root folder.
//! Only a `settings` key-value table is needed.

pub mod init;
pub mod settings;

pub use init::{create_settings_table, init_database};
