//! Text drawing with emoji overlays.
//!
//! [`EmojiTextRenderer::fill_text`] is the entry point: it draws every run
//! of text with the surface's native text primitive, then composites emoji
//! artwork over the emoji glyphs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use emoji_canvas::{
//!     EmojiCache, EmojiTextRenderer, FileImageLoader, RecordingSurface, TwemojiConfig,
//!     TwemojiMapper,
//! };
//!
//! # async fn example() -> emoji_canvas::RenderResult<()> {
//! let mapper = TwemojiMapper::new(TwemojiConfig::default().with_base_url("/opt/twemoji/assets"));
//! let renderer = EmojiTextRenderer::new(mapper, FileImageLoader::new(), EmojiCache::global());
//!
//! let mut surface = RecordingSurface::new("20px sans-serif");
//! renderer.fill_text(&mut surface, "hello 👋\nworld 🌍", 30.0, 40.0, None).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{Instrument, debug, debug_span};

use crate::cache::EmojiCache;
use crate::error::RenderResult;
use crate::layout::{Blueprint, layout};
use crate::loader::ImageLoader;
use crate::logging::{span_names, targets};
use crate::mapping::EmojiMapper;
use crate::resolver::{EmojiResolver, OverlayCorrection};
use crate::segment::segment;
use crate::surface::{ContextGuard, DrawingSurface, parse_font_size};

/// Font size used when the surface's font names no pixel size.
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Pixel size assumed when the font specification has none.
    /// Default: 10.
    pub default_font_size: f32,
    /// Placement corrections for emoji artwork.
    pub correction: OverlayCorrection,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE,
            correction: OverlayCorrection::default(),
        }
    }
}

impl RendererConfig {
    /// Set the fallback font size in pixels.
    #[must_use]
    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.default_font_size = size;
        self
    }

    /// Set the overlay placement corrections.
    #[must_use]
    pub fn with_correction(mut self, correction: OverlayCorrection) -> Self {
        self.correction = correction;
        self
    }
}

/// Draws text and overlays emoji artwork.
///
/// The renderer is meant to be long-lived; it shares its bitmap cache
/// between calls.
pub struct EmojiTextRenderer<M, L> {
    resolver: EmojiResolver<M, L>,
    config: RendererConfig,
}

impl<M: EmojiMapper, L: ImageLoader> EmojiTextRenderer<M, L> {
    /// Create a renderer with default configuration.
    pub fn new(mapper: M, loader: L, cache: Arc<EmojiCache>) -> Self {
        Self::with_config(mapper, loader, cache, RendererConfig::default())
    }

    /// Create a renderer with custom configuration.
    pub fn with_config(
        mapper: M,
        loader: L,
        cache: Arc<EmojiCache>,
        config: RendererConfig,
    ) -> Self {
        let resolver = EmojiResolver::new(mapper, loader, cache).with_correction(config.correction);
        Self { resolver, config }
    }

    /// The overlay resolver.
    pub fn resolver(&self) -> &EmojiResolver<M, L> {
        &self.resolver
    }

    /// The bitmap cache.
    pub fn cache(&self) -> &Arc<EmojiCache> {
        self.resolver.cache()
    }

    /// The renderer configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Lay out `text` at `(x, y)` using the surface's metrics, without
    /// drawing anything.
    pub fn layout<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        x: f32,
        y: f32,
    ) -> Vec<Blueprint> {
        let mut surface = ContextGuard::new(surface);
        layout(&segment(text), x, y, |run| surface.measure_text(run))
    }

    /// Draw `text` with its first line's baseline-left corner at `(x, y)`.
    ///
    /// The surface's font is used; alignment and baseline are forced to
    /// start/alphabetic for the duration of the call and restored
    /// afterwards, also when the call fails. `max_width` is passed through
    /// unchanged to every native text draw.
    ///
    /// # Errors
    ///
    /// Fails if any emoji image fails to load. Text already drawn stays
    /// drawn.
    pub async fn fill_text<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        x: f32,
        y: f32,
        max_width: Option<f32>,
    ) -> RenderResult<()> {
        let span = debug_span!(
            target: targets::RENDERER,
            span_names::FILL_TEXT,
            len = text.len(),
            x,
            y
        );
        self.draw(surface, text, x, y, max_width).instrument(span).await
    }

    async fn draw<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        x: f32,
        y: f32,
        max_width: Option<f32>,
    ) -> RenderResult<()> {
        let mut surface = ContextGuard::new(surface);

        let clusters = segment(text);
        let blueprints = layout(&clusters, x, y, |run| surface.measure_text(run));

        for blueprint in &blueprints {
            surface.fill_text(&blueprint.text, blueprint.x, blueprint.y, max_width);
        }

        let font_size = parse_font_size(surface.font()).unwrap_or(self.config.default_font_size);

        let mut pending: FuturesUnordered<_> = blueprints
            .iter()
            .filter(|blueprint| blueprint.is_emoji)
            .map(|blueprint| self.resolver.resolve(blueprint, font_size))
            .collect();
        let requested = pending.len();

        let mut composited = 0;
        while let Some(resolved) = pending.next().await {
            if let Some(overlay) = resolved? {
                surface.draw_image(&overlay.bitmap, overlay.rect);
                composited += 1;
            }
        }

        debug!(
            target: targets::RENDERER,
            clusters = clusters.len(),
            blueprints = blueprints.len(),
            emoji = requested,
            composited,
            font_size,
            "drew text"
        );

        Ok(())
    }
}

#[cfg(feature = "networking")]
mod shared {
    use std::sync::OnceLock;

    use super::*;
    use crate::loader::UrlImageLoader;
    use crate::mapping::TwemojiMapper;

    static DEFAULT_RENDERER: OnceLock<EmojiTextRenderer<TwemojiMapper, UrlImageLoader>> =
        OnceLock::new();

    /// The renderer used by [`fill_text`]: Twemoji artwork downloaded over
    /// HTTP into the process-wide cache.
    pub fn default_renderer() -> &'static EmojiTextRenderer<TwemojiMapper, UrlImageLoader> {
        DEFAULT_RENDERER.get_or_init(|| {
            EmojiTextRenderer::new(
                TwemojiMapper::default(),
                UrlImageLoader::default(),
                EmojiCache::global(),
            )
        })
    }

    /// Draw `text` on `surface` with Twemoji overlays.
    ///
    /// Shorthand for `default_renderer().fill_text(...)`.
    pub async fn fill_text<S: DrawingSurface + ?Sized>(
        surface: &mut S,
        text: &str,
        x: f32,
        y: f32,
        max_width: Option<f32>,
    ) -> RenderResult<()> {
        default_renderer()
            .fill_text(surface, text, x, y, max_width)
            .await
    }
}

#[cfg(feature = "networking")]
pub use shared::{default_renderer, fill_text};
