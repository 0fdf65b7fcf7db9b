//! Error types for the planner crate.
//!
//! Planning itself has no recoverable failure modes; only loading the input
//! image and validating the planner knobs can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing an image for planning.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The image file could not be opened or decoded.
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A planner parameter is outside its valid range.
    #[error("Invalid planner parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
