//! Error types for rasterization and quote state changes.

use thiserror::Error;

/// Failure of an off-screen rasterization.
///
/// Invalid configuration fields never show up here: renderers replace them
/// with fallbacks. Only rendering-surface failures are surfaced.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("drawing not generated: {0}")]
    DrawingNotGenerated(&'static str),

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("surface unavailable: cannot allocate {width}x{height} pixel buffer")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failure of a quote state transition.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("no item with id {0}")]
    UnknownItem(u64),

    #[error("item index {index} out of range (quote has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("item id {0} already exists")]
    DuplicateItem(u64),

    #[error("invalid quote JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for rasterization.
pub type RasterResult<T> = std::result::Result<T, RasterError>;
