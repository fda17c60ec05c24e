//! Error types for the tree view

use crate::layout_tree::NodeId;
use thiserror::Error;

/// Tree view errors
#[derive(Debug, Error)]
pub enum TreeError {
    /// A node has no usable name; `path` locates it, e.g. `root.children[1]`
    #[error("Node at {path} is missing a name")]
    MissingName { path: String },

    /// Raw JSON does not have the tree shape
    #[error("Malformed tree at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Unknown node id: {0}")]
    UnknownNode(NodeId),

    /// Operation needs a built tree but the renderer is idle
    #[error("No tree is currently rendered")]
    NotBuilt,

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TreeError>;
