//! # Magic Map tree view (magicmap-tv)
//!
//! Interactive renderer for hierarchical maps.
//!
//! **Pipeline:**
//! ```text
//! TreeNode ──build──► LayoutTree (arena, stable ids, collapse state)
//!                        │
//!                        ├─ tidy::TidyLayout ──► positions of visible nodes
//!                        ▼
//!                      Frame (nodes by id, links by target id)
//!                        │
//!                        ├─ Delta::between(old, new) ──► Transition::sample(t)
//!                        ▼
//!                      Scene ──► svg::render / export::export_png
//! ```
//!
//! [`renderer::TreeRenderer`] ties the steps together and owns the pan/zoom
//! transform. Nothing in this crate performs I/O.

pub mod error;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod layout_tree;
pub mod renderer;
pub mod style;
pub mod svg;
pub mod text;
pub mod tidy;
pub mod transition;
pub mod viewport;

pub use error::{Result, TreeError};
pub use frame::Frame;
pub use layout_tree::{Branch, LayoutNode, LayoutTree, NodeId, ToggleOutcome};
pub use renderer::TreeRenderer;
pub use transition::{Delta, Scene, Transition};
pub use viewport::{Bounds, Transform, Viewport};
