//! Emoji overlay resolution.
//!
//! For every emoji blueprint the resolver finds the artwork, loads it
//! through the cache, and computes where the bitmap goes so that it covers
//! the glyph the native shaper drew at the blueprint's baseline origin.

use std::sync::Arc;

use tracing::{Instrument, debug, debug_span};

use crate::bitmap::EmojiBitmap;
use crate::cache::EmojiCache;
use crate::error::RenderResult;
use crate::layout::Blueprint;
use crate::loader::ImageLoader;
use crate::logging::{span_names, targets};
use crate::mapping::EmojiMapper;
use crate::types::{Point, Rect, Size};

/// Placement corrections for emoji artwork.
///
/// Emoji assets carry built-in padding, and blueprint origins are
/// baseline-left anchors rather than top-left corners. The bitmap is first
/// scaled so its width equals the font size, then shifted right by
/// `offset_x` of its width, raised by `rise` of its height, and shrunk to
/// `scale` of its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayCorrection {
    /// Horizontal shift as a fraction of the scaled width.
    pub offset_x: f32,
    /// Upward shift as a fraction of the scaled height.
    pub rise: f32,
    /// Final size as a fraction of the scaled size.
    pub scale: f32,
}

impl Default for OverlayCorrection {
    fn default() -> Self {
        Self {
            offset_x: 0.1,
            rise: 0.8,
            scale: 0.8,
        }
    }
}

/// Destination rectangle for an emoji bitmap.
///
/// `origin` is the blueprint's baseline-left coordinate and `natural` the
/// bitmap's natural size.
pub fn overlay_rect(
    origin: Point,
    natural: Size,
    font_size: f32,
    correction: &OverlayCorrection,
) -> Rect {
    let magnification = font_size / natural.width;
    let drawn = natural.scale(magnification);

    Rect::new(
        origin.x + drawn.width * correction.offset_x,
        origin.y - drawn.height * correction.rise,
        drawn.width * correction.scale,
        drawn.height * correction.scale,
    )
}

/// A resolved overlay, ready to composite.
#[derive(Debug, Clone)]
pub struct EmojiOverlay {
    /// The blueprint text the overlay covers.
    pub text: String,
    /// Identifier the bitmap was loaded under.
    pub identifier: String,
    /// The decoded artwork.
    pub bitmap: Arc<EmojiBitmap>,
    /// Where to composite the artwork.
    pub rect: Rect,
}

/// Resolves emoji blueprints to overlays.
pub struct EmojiResolver<M, L> {
    mapper: M,
    loader: L,
    cache: Arc<EmojiCache>,
    correction: OverlayCorrection,
}

impl<M: EmojiMapper, L: ImageLoader> EmojiResolver<M, L> {
    /// Create a resolver backed by `cache`.
    pub fn new(mapper: M, loader: L, cache: Arc<EmojiCache>) -> Self {
        Self {
            mapper,
            loader,
            cache,
            correction: OverlayCorrection::default(),
        }
    }

    /// Use custom placement corrections.
    #[must_use]
    pub fn with_correction(mut self, correction: OverlayCorrection) -> Self {
        self.correction = correction;
        self
    }

    /// The mapper.
    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// The loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The bitmap cache.
    pub fn cache(&self) -> &Arc<EmojiCache> {
        &self.cache
    }

    /// The placement corrections.
    pub fn correction(&self) -> &OverlayCorrection {
        &self.correction
    }

    /// Resolve the overlay for `blueprint` at `font_size` pixels.
    ///
    /// Returns `Ok(None)` for plain-text blueprints and for emoji the
    /// mapper has no artwork for. Load failures are returned as errors.
    pub async fn resolve(
        &self,
        blueprint: &Blueprint,
        font_size: f32,
    ) -> RenderResult<Option<EmojiOverlay>> {
        if !blueprint.is_emoji {
            return Ok(None);
        }

        let Some(hit) = self.mapper.find(&blueprint.text) else {
            debug!(
                target: targets::RESOLVER,
                text = blueprint.text.as_str(),
                "no artwork for emoji, keeping native glyph"
            );
            return Ok(None);
        };

        let bitmap = self
            .bitmap(&hit.identifier)
            .instrument(debug_span!(
                target: targets::RESOLVER,
                span_names::RESOLVE,
                identifier = hit.identifier.as_str()
            ))
            .await?;

        let rect = overlay_rect(
            blueprint.origin(),
            bitmap.natural_size(),
            font_size,
            &self.correction,
        );

        Ok(Some(EmojiOverlay {
            text: blueprint.text.clone(),
            identifier: hit.identifier,
            bitmap,
            rect,
        }))
    }

    /// Fetch `identifier` from the cache, loading it on a miss.
    pub async fn bitmap(&self, identifier: &str) -> RenderResult<Arc<EmojiBitmap>> {
        if let Some(cached) = self.cache.get(identifier) {
            return Ok(cached);
        }

        let bitmap = self.loader.load(identifier).await?;
        debug!(
            target: targets::RESOLVER,
            identifier,
            width = bitmap.natural_width(),
            height = bitmap.natural_height(),
            "loaded emoji bitmap"
        );
        Ok(self.cache.insert(identifier, bitmap))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use image::RgbaImage;

    use super::*;
    use crate::error::RenderError;
    use crate::mapping::TwemojiMapper;

    struct CountingLoader {
        loads: AtomicUsize,
        size: (u32, u32),
    }

    impl CountingLoader {
        fn new(width: u32, height: u32) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                size: (width, height),
            }
        }
    }

    impl ImageLoader for CountingLoader {
        async fn load(&self, _identifier: &str) -> RenderResult<EmojiBitmap> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            EmojiBitmap::new(RgbaImage::new(self.size.0, self.size.1))
        }
    }

    struct FailingLoader;

    impl ImageLoader for FailingLoader {
        async fn load(&self, identifier: &str) -> RenderResult<EmojiBitmap> {
            Err(RenderError::ImageLoad(format!("unreachable: {identifier}")))
        }
    }

    fn emoji(text: &str, x: f32, y: f32) -> Blueprint {
        Blueprint {
            text: text.to_string(),
            x,
            y,
            is_emoji: true,
        }
    }

    #[test]
    fn test_overlay_rect_scales_to_font_size() {
        let rect = overlay_rect(
            Point::new(100.0, 50.0),
            Size::new(36.0, 36.0),
            20.0,
            &OverlayCorrection::default(),
        );
        assert!((rect.width() - 16.0).abs() < 1e-4);
        assert!((rect.height() - 16.0).abs() < 1e-4);
        assert!((rect.left() - 102.0).abs() < 1e-4);
        assert!((rect.top() - 34.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlay_rect_keeps_aspect_ratio() {
        let rect = overlay_rect(
            Point::ZERO,
            Size::new(72.0, 36.0),
            10.0,
            &OverlayCorrection::default(),
        );
        assert!((rect.width() - 8.0).abs() < 1e-4);
        assert!((rect.height() - 4.0).abs() < 1e-4);
        assert!((rect.top() + 4.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_plain_text_is_skipped() {
        let resolver = EmojiResolver::new(
            TwemojiMapper::default(),
            CountingLoader::new(36, 36),
            Arc::new(EmojiCache::new()),
        );
        let blueprint = Blueprint {
            text: "abc".to_string(),
            x: 0.0,
            y: 0.0,
            is_emoji: false,
        };
        assert!(resolver.resolve(&blueprint, 20.0).await.unwrap().is_none());
        assert_eq!(resolver.loader().loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmapped_emoji_is_skipped() {
        let resolver = EmojiResolver::new(
            TwemojiMapper::default(),
            FailingLoader,
            Arc::new(EmojiCache::new()),
        );
        // CJK extension B: four-byte but not an emoji.
        let overlay = resolver.resolve(&emoji("𠀋", 0.0, 0.0), 20.0).await.unwrap();
        assert!(overlay.is_none());
    }

    #[tokio::test]
    async fn test_resolve_hit_computes_rect() {
        let resolver = EmojiResolver::new(
            TwemojiMapper::default(),
            CountingLoader::new(36, 36),
            Arc::new(EmojiCache::new()),
        );
        let overlay = resolver
            .resolve(&emoji("😀", 30.0, 40.0), 20.0)
            .await
            .unwrap()
            .unwrap();
        assert!(overlay.identifier.ends_with("/1f600.svg"));
        assert!((overlay.rect.width() - 16.0).abs() < 1e-4);
        assert!((overlay.rect.left() - 32.0).abs() < 1e-4);
        assert!((overlay.rect.top() - 24.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_second_resolution_hits_cache() {
        let cache = Arc::new(EmojiCache::new());
        let resolver = EmojiResolver::new(
            TwemojiMapper::default(),
            CountingLoader::new(36, 36),
            cache.clone(),
        );

        let first = resolver.resolve(&emoji("😀", 0.0, 0.0), 10.0).await.unwrap().unwrap();
        let second = resolver.resolve(&emoji("😀", 5.0, 0.0), 10.0).await.unwrap().unwrap();

        assert_eq!(resolver.loader().loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.bitmap, &second.bitmap));
        assert_eq!(first.bitmap.natural_size(), second.bitmap.natural_size());
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_load_failure_propagates() {
        let cache = Arc::new(EmojiCache::new());
        let resolver = EmojiResolver::new(TwemojiMapper::default(), FailingLoader, cache.clone());
        let err = resolver.resolve(&emoji("😀", 0.0, 0.0), 10.0).await.unwrap_err();
        assert!(matches!(err, RenderError::ImageLoad(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_custom_correction() {
        let resolver = EmojiResolver::new(
            TwemojiMapper::default(),
            CountingLoader::new(36, 36),
            Arc::new(EmojiCache::new()),
        )
        .with_correction(OverlayCorrection {
            offset_x: 0.0,
            rise: 1.0,
            scale: 1.0,
        });
        let overlay = resolver
            .resolve(&emoji("😀", 10.0, 40.0), 36.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(overlay.rect, Rect::new(10.0, 4.0, 36.0, 36.0));
    }
}
