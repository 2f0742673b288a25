//! The text-surface seam: measurement and drawing of multi-line text.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::Result;

/// Tight ink bounding box of a text run, relative to its layout origin.
///
/// The origin is the top-left corner of the first line box. `left`/`top` are
/// the bearing offsets of the outermost ink from that corner; they may be
/// negative for fonts whose ink spills left of the pen or above the line
/// box. A run with no ink at all is the zero box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl InkBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Drawing-surface capability the layout engine depends on.
///
/// Implementations must keep [`TextSurface::ink_bounds`] and
/// [`TextSurface::draw_text`] consistent: text drawn at `(x, y)` puts its
/// ink exactly at `(x + bounds.left, y + bounds.top)`. The grid engine
/// relies on that to cancel glyph bearings against padding boxes.
pub trait TextSurface {
    /// Opaque font handle; whatever the backend needs to shape text.
    type Font;

    /// Measures multi-line `text` anchored with the top-left of its first
    /// line box at the origin.
    fn ink_bounds(&self, font: &Self::Font, text: &str) -> Result<InkBounds>;

    /// Draws multi-line `text` with the top-left of its first line box at
    /// `(x, y)`. Ink outside the canvas is clipped silently.
    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        font: &Self::Font,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb<u8>,
    );
}

/// Fixed-character-cell surface for layout work without glyph rendering.
///
/// Every character column occupies a `charw`-wide slot, a line's ink box is
/// offset `charleft`/`chartop` from the line-box corner and `charh` tall,
/// and line boxes repeat every `line_advance` pixels. `draw_text` fills each
/// line's ink box with the requested color, so tests can assert on pixels.
///
/// Wide (East Asian) glyphs take two columns, matching the wrapper's
/// accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicTextSurface {
    pub charw: i32,
    pub charh: i32,
    pub chartop: i32,
    pub charleft: i32,
    pub line_advance: i32,
}

impl Default for DeterministicTextSurface {
    fn default() -> Self {
        Self {
            charw: 6,
            charh: 10,
            chartop: 2,
            charleft: 1,
            line_advance: 12,
        }
    }
}

impl TextSurface for DeterministicTextSurface {
    type Font = ();

    fn ink_bounds(&self, _font: &(), text: &str) -> Result<InkBounds> {
        let mut max_cols = 0i32;
        let mut lines = 0i32;
        for line in text.split('\n') {
            max_cols = max_cols.max(line.width() as i32);
            lines += 1;
        }
        if max_cols == 0 {
            return Ok(InkBounds {
                left: 0,
                top: 0,
                right: 0,
                bottom: 0,
            });
        }
        Ok(InkBounds {
            left: self.charleft,
            top: self.chartop,
            right: self.charleft + max_cols * self.charw,
            bottom: self.chartop + (lines - 1) * self.line_advance + self.charh,
        })
    }

    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        _font: &(),
        x: i32,
        y: i32,
        text: &str,
        color: Rgb<u8>,
    ) {
        for (line_ix, line) in text.split('\n').enumerate() {
            let cols = line.width() as i64;
            if cols == 0 {
                continue;
            }
            fill_rect(
                canvas,
                i64::from(x) + i64::from(self.charleft),
                i64::from(y) + line_ix as i64 * i64::from(self.line_advance) + i64::from(self.chartop),
                cols * i64::from(self.charw),
                i64::from(self.charh),
                color,
            );
        }
    }
}

/// Fills a rectangle, clipping at the canvas edges.
pub(crate) fn fill_rect(canvas: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(i64::from(canvas.width()));
    let y1 = (y + h).min(i64::from(canvas.height()));
    for yy in y0..y1 {
        for xx in x0..x1 {
            canvas.put_pixel(xx as u32, yy as u32, color);
        }
    }
}
