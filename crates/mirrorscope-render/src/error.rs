//! Rendering error types.

use mirrorscope_core::{ReflectionError, TargetHandle};
use thiserror::Error;

/// Errors that can occur in the GPU backend.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Texture creation failed.
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),

    /// The requested resolution exceeds what the device supports.
    #[error("resolution {resolution} exceeds device limit {max}")]
    ResolutionTooLarge { resolution: u32, max: u32 },

    /// No target is registered under the handle.
    #[error("unknown render target {0}")]
    UnknownTarget(TargetHandle),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for ReflectionError {
    fn from(err: RenderError) -> Self {
        ReflectionError::ResourceError(err.to_string())
    }
}
