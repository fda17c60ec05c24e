//! HTTP API handlers for magicmap-ui

pub mod buildinfo;
pub mod generate;
pub mod health;
pub mod map;
pub mod theme;
pub mod tree;
pub mod ui;

pub use buildinfo::buildinfo_routes;
pub use generate::generate_routes;
pub use health::health_routes;
pub use map::map_routes;
pub use theme::theme_routes;
pub use tree::tree_routes;
pub use ui::ui_routes;
