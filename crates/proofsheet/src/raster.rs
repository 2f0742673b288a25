//! Real glyph rendering and raster encoding, behind the `raster` feature.

use std::path::Path;

use ab_glyph::{Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont, point};
use image::{Rgb, RgbImage};

use crate::Result;
use crate::surface::{InkBounds, TextSurface};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("font data is not a usable font face")]
    InvalidFont,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to encode JPEG")]
    JpegEncode,
}

/// A font face scaled to a pixel size; the font handle for [`GlyphSurface`].
///
/// Cheap to clone (the face data is reference-counted), so the same file can
/// back a cell font and a larger title font.
#[derive(Debug, Clone)]
pub struct ScaledFont {
    font: FontArc,
    scale: PxScale,
}

impl ScaledFont {
    pub fn from_bytes(data: Vec<u8>, px: f32) -> std::result::Result<Self, RasterError> {
        let font = FontArc::try_from_vec(data).map_err(|_| RasterError::InvalidFont)?;
        Ok(Self {
            font,
            scale: PxScale::from(px),
        })
    }

    pub fn from_file(path: &Path, px: f32) -> std::result::Result<Self, RasterError> {
        Self::from_bytes(std::fs::read(path)?, px)
    }

    /// Same face at a different pixel size.
    pub fn with_size(&self, px: f32) -> Self {
        Self {
            font: self.font.clone(),
            scale: PxScale::from(px),
        }
    }

    /// Vertical distance between consecutive line boxes, in whole pixels.
    fn line_advance(&self) -> i32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent() + scaled.line_gap()).round() as i32
    }
}

/// [`TextSurface`] backed by font outlines.
///
/// Measurement unions per-glyph pixel bounds with kerning applied; drawing
/// rasterizes line by line. Both anchor a line's layout origin at the top of
/// its line box with the baseline `ascent` below it, which keeps the probed
/// bearing offsets consistent with where ink actually lands.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphSurface;

impl TextSurface for GlyphSurface {
    type Font = ScaledFont;

    fn ink_bounds(&self, font: &ScaledFont, text: &str) -> Result<InkBounds> {
        let scaled = font.font.as_scaled(font.scale);
        let advance = font.line_advance();

        let mut ink: Option<(f32, f32, f32, f32)> = None;
        for (line_ix, line) in text.split('\n').enumerate() {
            let baseline = (line_ix as i32 * advance) as f32 + scaled.ascent();
            let mut caret = 0.0f32;
            let mut last: Option<GlyphId> = None;
            for ch in line.chars() {
                let mut glyph: Glyph = scaled.scaled_glyph(ch);
                if let Some(prev) = last {
                    caret += scaled.kern(prev, glyph.id);
                }
                glyph.position = point(caret, baseline);
                last = Some(glyph.id);
                caret += scaled.h_advance(glyph.id);
                if let Some(outlined) = scaled.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    ink = Some(match ink {
                        None => (bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y),
                        Some((left, top, right, bottom)) => (
                            left.min(bounds.min.x),
                            top.min(bounds.min.y),
                            right.max(bounds.max.x),
                            bottom.max(bounds.max.y),
                        ),
                    });
                }
            }
        }

        Ok(match ink {
            None => InkBounds {
                left: 0,
                top: 0,
                right: 0,
                bottom: 0,
            },
            Some((left, top, right, bottom)) => InkBounds {
                left: left.floor() as i32,
                top: top.floor() as i32,
                right: right.ceil() as i32,
                bottom: bottom.ceil() as i32,
            },
        })
    }

    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        font: &ScaledFont,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb<u8>,
    ) {
        let advance = font.line_advance();
        for (line_ix, line) in text.split('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            imageproc::drawing::draw_text_mut(
                canvas,
                color,
                x,
                y + line_ix as i32 * advance,
                font.scale,
                &font.font,
                line,
            );
        }
    }
}

pub fn encode_png(img: &RgbImage) -> std::result::Result<Vec<u8>, RasterError> {
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|_| RasterError::PngEncode)?;
    Ok(out)
}

pub fn encode_jpeg(img: &RgbImage, quality: u8) -> std::result::Result<Vec<u8>, RasterError> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_font_data_is_rejected() {
        let err = ScaledFont::from_bytes(vec![0u8; 16], 16.0).unwrap_err();
        assert!(matches!(err, RasterError::InvalidFont));
    }

    #[test]
    fn png_encoding_produces_a_png_signature() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let bytes = encode_png(&img).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn jpeg_encoding_produces_a_jfif_marker() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let bytes = encode_jpeg(&img, 90).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }
}
