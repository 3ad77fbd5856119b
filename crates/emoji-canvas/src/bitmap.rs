//! Decoded emoji bitmaps.
//!
//! Emoji assets arrive either as SVG documents (Twemoji's default) or as
//! raster images. Both are decoded into straight-alpha RGBA at the asset's
//! natural size.

use image::RgbaImage;
use resvg::tiny_skia;
use resvg::usvg;

use crate::error::{RenderError, RenderResult};
use crate::types::Size;

/// A decoded emoji image.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiBitmap {
    image: RgbaImage,
}

impl EmojiBitmap {
    /// Wrap an RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidBitmap`] if either dimension is zero.
    pub fn new(image: RgbaImage) -> RenderResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidBitmap { width, height });
        }
        Ok(Self { image })
    }

    /// Natural width in pixels.
    #[inline]
    pub fn natural_width(&self) -> u32 {
        self.image.width()
    }

    /// Natural height in pixels.
    #[inline]
    pub fn natural_height(&self) -> u32 {
        self.image.height()
    }

    /// Natural size in pixels.
    #[inline]
    pub fn natural_size(&self) -> Size {
        Size::from(self.image.dimensions())
    }

    /// The RGBA pixels.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the bitmap, returning its pixels.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Decode an emoji asset.
///
/// SVG documents are recognised by their leading markup and rasterised at
/// their natural size; everything else goes through the `image` crate.
pub fn decode_bitmap(data: &[u8]) -> RenderResult<EmojiBitmap> {
    if looks_like_svg(data) {
        decode_svg(data)
    } else {
        let img = image::load_from_memory(data)
            .map_err(|e| RenderError::ImageDecode(e.to_string()))?;
        EmojiBitmap::new(img.to_rgba8())
    }
}

/// Rasterise an SVG document at its natural size.
pub fn decode_svg(data: &[u8]) -> RenderResult<EmojiBitmap> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &options)
        .map_err(|e| RenderError::ImageDecode(format!("Failed to parse SVG: {}", e)))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::InvalidBitmap { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let rgba = unpremultiply(pixmap.data());
    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or(RenderError::InvalidBitmap { width, height })?;

    EmojiBitmap::new(image)
}

fn looks_like_svg(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let head = &data[start..];
    head.starts_with(b"<svg") || head.starts_with(b"<?xml") || head.starts_with(b"<!DOCTYPE svg")
}

/// Convert premultiplied RGBA to straight RGBA.
fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            result.push((chunk[0] as f32 / a).min(255.0) as u8);
            result.push((chunk[1] as f32 / a).min(255.0) as u8);
            result.push((chunk[2] as f32 / a).min(255.0) as u8);
            result.push(chunk[3]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}
