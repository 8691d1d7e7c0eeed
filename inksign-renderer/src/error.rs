//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A bitmap of the requested size could not be allocated.
    #[error("Failed to allocate {width}x{height} bitmap")]
    Allocation {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The document could not be rasterized.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// Image encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// PDF composition failed.
    #[error("PDF composition failed: {0}")]
    Pdf(String),
}
