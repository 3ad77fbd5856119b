//! The drawing-surface capability.
//!
//! [`DrawingSurface`] is everything the text pipeline needs from a 2D
//! raster backend: native text drawing and measurement, bitmap compositing,
//! the two text-placement modes it temporarily overrides, and the active
//! font specification.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::trace;

use crate::bitmap::EmojiBitmap;
use crate::layout::TextMetrics;
use crate::logging::targets;
use crate::types::Rect;

/// Horizontal anchoring of drawn text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Anchor at the start edge for the text direction.
    #[default]
    Start,
    /// Anchor at the end edge for the text direction.
    End,
    /// Anchor at the left edge.
    Left,
    /// Anchor at the right edge.
    Right,
    /// Anchor at the horizontal center.
    Center,
}

/// Vertical anchoring of drawn text relative to its y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Hanging baseline.
    Hanging,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline.
    Ideographic,
    /// Bottom of the em square.
    Bottom,
}

/// A 2D raster surface with a native text shaper.
///
/// Text is drawn with the current font, alignment and baseline. Emoji
/// overlays are composited with [`draw_image`](Self::draw_image) after all
/// text has been drawn.
pub trait DrawingSurface {
    /// Draw `text` with its anchor at `(x, y)`.
    ///
    /// `max_width`, when set, is the width the backend may condense the
    /// text to.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>);

    /// Measure `text` with the current font.
    fn measure_text(&mut self, text: &str) -> TextMetrics;

    /// Composite `bitmap` scaled into `dest`.
    ///
    /// The bitmap is the cached handle; surfaces that keep it hold a
    /// reference rather than a copy.
    fn draw_image(&mut self, bitmap: &Arc<EmojiBitmap>, dest: Rect);

    /// Current horizontal alignment.
    fn text_align(&self) -> TextAlign;

    /// Set the horizontal alignment.
    fn set_text_align(&mut self, align: TextAlign);

    /// Current vertical baseline mode.
    fn text_baseline(&self) -> TextBaseline;

    /// Set the vertical baseline mode.
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// The active font specification, e.g. `"bold 20px sans-serif"`.
    fn font(&self) -> &str;
}

/// The placement modes captured before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl ContextSnapshot {
    /// Capture the current placement modes of `surface`.
    pub fn capture<S: DrawingSurface + ?Sized>(surface: &S) -> Self {
        Self {
            align: surface.text_align(),
            baseline: surface.text_baseline(),
        }
    }

    /// Write the captured modes back to `surface`.
    pub fn restore<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_text_align(self.align);
        surface.set_text_baseline(self.baseline);
    }
}

/// Scoped override of the placement modes.
///
/// Creating the guard forces [`TextAlign::Start`] and
/// [`TextBaseline::Alphabetic`], the only modes the layout math supports.
/// Dropping it restores what was set before, whichever way the caller
/// exits.
pub struct ContextGuard<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
    snapshot: ContextSnapshot,
}

impl<'a, S: DrawingSurface + ?Sized> ContextGuard<'a, S> {
    /// Snapshot `surface` and force start/alphabetic placement.
    pub fn new(surface: &'a mut S) -> Self {
        let snapshot = ContextSnapshot::capture(&*surface);
        surface.set_text_align(TextAlign::Start);
        surface.set_text_baseline(TextBaseline::Alphabetic);
        Self { surface, snapshot }
    }

    /// The modes that will be restored on drop.
    pub fn snapshot(&self) -> ContextSnapshot {
        self.snapshot
    }
}

impl<S: DrawingSurface + ?Sized> Deref for ContextGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for ContextGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for ContextGuard<'_, S> {
    fn drop(&mut self) {
        self.snapshot.restore(&mut *self.surface);
        trace!(
            target: targets::RENDERER,
            align = ?self.snapshot.align,
            baseline = ?self.snapshot.baseline,
            "restored text placement"
        );
    }
}

/// Extract the pixel size from a font specification.
///
/// Returns the first positive number written directly before `px`, e.g.
/// `20` for `"italic 20px/1.5 serif"`. Returns `None` when there is none.
pub fn parse_font_size(font: &str) -> Option<f32> {
    let bytes = font.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !is_number_byte(bytes[i]) {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && is_number_byte(bytes[i]) {
            i += 1;
        }

        if bytes[i..].starts_with(b"px") {
            let size = font.get(start..i).and_then(|s| s.parse::<f32>().ok());
            if let Some(size) = size.filter(|s| s.is_finite() && *s > 0.0) {
                return Some(size);
            }
        }
    }

    None
}

#[inline]
fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("20px sans-serif"), Some(20.0));
        assert_eq!(parse_font_size("20px \"sans-serif\""), Some(20.0));
        assert_eq!(parse_font_size("italic bold 12px/1.5 serif"), Some(12.0));
        assert_eq!(parse_font_size("13.5px monospace"), Some(13.5));
        assert_eq!(parse_font_size("1.2em serif 16px"), Some(16.0));
    }

    #[test]
    fn test_parse_font_size_absent() {
        assert_eq!(parse_font_size(""), None);
        assert_eq!(parse_font_size("sans-serif"), None);
        assert_eq!(parse_font_size("12pt serif"), None);
        assert_eq!(parse_font_size("0px serif"), None);
        assert_eq!(parse_font_size("..px serif"), None);
        assert_eq!(parse_font_size("px 字体"), None);
    }

    #[test]
    fn test_guard_forces_and_restores() {
        let mut surface = RecordingSurface::new("10px sans-serif");
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Top);

        {
            let guard = ContextGuard::new(&mut surface);
            assert_eq!(guard.text_align(), TextAlign::Start);
            assert_eq!(guard.text_baseline(), TextBaseline::Alphabetic);
            assert_eq!(guard.snapshot().align, TextAlign::Center);
        }

        assert_eq!(surface.text_align(), TextAlign::Center);
        assert_eq!(surface.text_baseline(), TextBaseline::Top);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut surface = RecordingSurface::new("10px sans-serif");
        surface.set_text_align(TextAlign::Right);
        let snapshot = ContextSnapshot::capture(&surface);
        surface.set_text_align(TextAlign::Left);
        snapshot.restore(&mut surface);
        assert_eq!(surface.text_align(), TextAlign::Right);
        assert_eq!(surface.text_baseline(), TextBaseline::Alphabetic);
    }
}
