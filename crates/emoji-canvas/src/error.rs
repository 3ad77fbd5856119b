//! Error types for the emoji-canvas crate.

use thiserror::Error;

/// Errors that can occur while drawing text with emoji overlays.
#[derive(Error, Debug)]
pub enum RenderError {
    /// An emoji image could not be read or fetched.
    #[error("failed to load emoji image: {0}")]
    ImageLoad(String),

    /// The loaded bytes are not a decodable image.
    #[error("failed to decode emoji image: {0}")]
    ImageDecode(String),

    /// The decoded image has no pixels.
    #[error("invalid emoji bitmap dimensions: {width}x{height}")]
    InvalidBitmap { width: u32, height: u32 },

    /// The HTTP fetch of an emoji image failed.
    #[cfg(feature = "networking")]
    #[error("failed to fetch emoji image: {0}")]
    Fetch(#[from] emoji_canvas_net::FetchError),
}

/// Result type for emoji-canvas operations.
pub type RenderResult<T> = Result<T, RenderError>;
