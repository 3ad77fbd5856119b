//! Text drawing with emoji overlays for 2D raster surfaces.
//!
//! Native text rendering often draws emoji as monochrome or missing glyphs.
//! This crate draws a string with the surface's own text primitive and then
//! composites emoji artwork (Twemoji by default) over the emoji positions,
//! so mixed text renders with consistent color emoji.
//!
//! # Getting Started
//!
//! Implement [`DrawingSurface`] for your canvas, then call [`fill_text`]:
//!
//! ```no_run
//! use emoji_canvas::RecordingSurface;
//!
//! # async fn example() -> emoji_canvas::RenderResult<()> {
//! let mut surface = RecordingSurface::new("24px sans-serif");
//! emoji_canvas::fill_text(&mut surface, "launch 🚀\nlanded 🎉", 20.0, 40.0, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! 1. [`segment()`] splits the text into clusters with a byte-level heuristic.
//! 2. [`layout()`] groups clusters into runs and positions them line by line.
//! 3. Every run is drawn with [`DrawingSurface::fill_text`].
//! 4. [`EmojiResolver`] maps emoji runs to artwork, loading through an
//!    [`EmojiCache`], and the bitmaps are composited with
//!    [`DrawingSurface::draw_image`].
//!
//! # Custom Artwork
//!
//! [`EmojiTextRenderer`] is generic over an [`EmojiMapper`] (cluster to
//! image identifier) and an [`ImageLoader`] (identifier to bitmap). Use
//! [`FileImageLoader`] with a local Twemoji checkout to render offline:
//!
//! ```no_run
//! use emoji_canvas::{
//!     EmojiCache, EmojiTextRenderer, FileImageLoader, RecordingSurface, TwemojiAsset,
//!     TwemojiConfig, TwemojiMapper,
//! };
//!
//! # async fn example() -> emoji_canvas::RenderResult<()> {
//! let mapper = TwemojiMapper::new(
//!     TwemojiConfig::default()
//!         .with_base_url("/opt/twemoji/assets")
//!         .with_asset(TwemojiAsset::Png72),
//! );
//! let renderer = EmojiTextRenderer::new(mapper, FileImageLoader::new(), EmojiCache::global());
//!
//! let mut surface = RecordingSurface::new("16px serif");
//! renderer.fill_text(&mut surface, "offline 📦", 0.0, 16.0, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `networking` (default): [`UrlImageLoader`], [`default_renderer`] and
//!   the free [`fill_text`] function, backed by `emoji-canvas-net`.

mod bitmap;
mod cache;
mod error;
mod layout;
mod loader;
mod mapping;
mod recording;
mod renderer;
mod resolver;
mod segment;
mod surface;
mod types;

pub mod logging;

// Core pipeline
pub use layout::{Blueprint, TextMetrics, group_runs, layout};
pub use segment::{
    EMOJI_LEAD_BYTE, GraphemeCluster, is_emoji_lead, segment, segment_bytes, sequence_len,
};

// Drawing surfaces
pub use recording::{DrawCommand, ImageCommand, RecordingSurface, TextCommand};
pub use surface::{
    ContextGuard, ContextSnapshot, DrawingSurface, TextAlign, TextBaseline, parse_font_size,
};

// Emoji artwork
pub use bitmap::{EmojiBitmap, decode_bitmap, decode_svg};
pub use cache::{CacheStats, EmojiCache};
pub use loader::{FileImageLoader, ImageLoader};
pub use mapping::{
    DEFAULT_TWEMOJI_BASE_URL, EmojiMapper, EmojiMatch, TwemojiAsset, TwemojiConfig, TwemojiMapper,
    is_pictographic, twemoji_code,
};

// Rendering
pub use renderer::{DEFAULT_FONT_SIZE, EmojiTextRenderer, RendererConfig};
pub use resolver::{EmojiOverlay, EmojiResolver, OverlayCorrection, overlay_rect};

pub use error::{RenderError, RenderResult};
pub use types::{Point, Rect, Size};

#[cfg(feature = "networking")]
pub use loader::UrlImageLoader;
#[cfg(feature = "networking")]
pub use renderer::{default_renderer, fill_text};

// Re-export the HTTP layer so callers can configure the fetcher
#[cfg(feature = "networking")]
pub use emoji_canvas_net as net;
