//! A headless drawing surface that records what it is asked to draw.
//!
//! [`RecordingSurface`] implements [`DrawingSurface`] without a rasterizer.
//! It uses a monospace metric model derived from the font's pixel size and
//! keeps every draw call as a [`DrawCommand`], which makes it useful for
//! dry runs, golden tests and debugging placement.

use std::sync::Arc;

use crate::bitmap::EmojiBitmap;
use crate::layout::TextMetrics;
use crate::renderer::DEFAULT_FONT_SIZE;
use crate::surface::{DrawingSurface, TextAlign, TextBaseline, parse_font_size};
use crate::types::Rect;

/// Advance per character, in ems.
const ADVANCE_EM: f32 = 0.6;
/// Ascent above the alphabetic baseline, in ems.
const ASCENT_EM: f32 = 0.8;
/// Descent below the alphabetic baseline, in ems.
const DESCENT_EM: f32 = 0.2;

/// A recorded text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub max_width: Option<f32>,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// A recorded bitmap composite.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCommand {
    pub width: u32,
    pub height: u32,
    pub rect: Rect,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Native text draw.
    Text(TextCommand),
    /// Bitmap composite.
    Image(ImageCommand),
}

/// Drawing surface that records draw calls.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    font: String,
    align: TextAlign,
    baseline: TextBaseline,
    commands: Vec<DrawCommand>,
    bitmaps: Vec<Arc<EmojiBitmap>>,
}

impl RecordingSurface {
    /// Create a surface using `font`, e.g. `"20px sans-serif"`.
    pub fn new(font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            commands: Vec::new(),
            bitmaps: Vec::new(),
        }
    }

    /// Change the font.
    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    /// Font pixel size used by the metric model.
    pub fn font_size(&self) -> f32 {
        parse_font_size(&self.font).unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// All recorded commands in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded text draws in call order.
    pub fn texts(&self) -> Vec<&TextCommand> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(text) => Some(text),
                DrawCommand::Image(_) => None,
            })
            .collect()
    }

    /// Recorded composites in call order.
    pub fn images(&self) -> Vec<&ImageCommand> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image(image) => Some(image),
                DrawCommand::Text(_) => None,
            })
            .collect()
    }

    /// Pixel data of composited bitmaps, in call order.
    pub fn bitmaps(&self) -> &[Arc<EmojiBitmap>] {
        &self.bitmaps
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.bitmaps.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        self.commands.push(DrawCommand::Text(TextCommand {
            text: text.to_string(),
            x,
            y,
            max_width,
            align: self.align,
            baseline: self.baseline,
        }));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let size = self.font_size();
        let chars = text.chars().filter(|c| *c != '\n').count() as f32;
        let width = chars * size * ADVANCE_EM;

        TextMetrics {
            width,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: width,
            actual_bounding_box_ascent: size * ASCENT_EM,
            actual_bounding_box_descent: size * DESCENT_EM,
            em_height_ascent: size * ASCENT_EM,
            em_height_descent: size * DESCENT_EM,
            alphabetic_baseline: size * ASCENT_EM,
        }
    }

    fn draw_image(&mut self, bitmap: &Arc<EmojiBitmap>, dest: Rect) {
        self.commands.push(DrawCommand::Image(ImageCommand {
            width: bitmap.natural_width(),
            height: bitmap.natural_height(),
            rect: dest,
        }));
        self.bitmaps.push(Arc::clone(bitmap));
    }

    fn text_align(&self) -> TextAlign {
        self.align
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn text_baseline(&self) -> TextBaseline {
        self.baseline
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    fn font(&self) -> &str {
        &self.font
    }
}
