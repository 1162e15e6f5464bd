//! Error types for mirrorscope.

use thiserror::Error;

/// The main error type for reflection operations.
///
/// None of these escape a frame as a hard failure: the orchestrator turns every
/// variant into a skipped reflection. They exist so callers and logs can tell
/// the reasons apart.
#[derive(Error, Debug)]
pub enum ReflectionError {
    /// No viewer camera is rendering this frame.
    #[error("no active viewer camera")]
    NoActiveCamera,

    /// A reflection render is already in progress on this context.
    #[error("reflection render already in progress")]
    ReentrantInvocation,

    /// The reflective surface has no usable normal.
    #[error("degenerate reflection geometry: {0}")]
    DegenerateGeometry(String),

    /// The render target or the mirror camera could not be created.
    #[error("resource error: {0}")]
    ResourceError(String),

    /// The host failed while rendering the mirror camera.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reflection operations.
pub type Result<T> = std::result::Result<T, ReflectionError>;
