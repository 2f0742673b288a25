//! The grid layout engine: measure every caption first, then draw once.
//!
//! The canvas size depends on how every caption wraps, so layout runs in two
//! passes. Pass one wraps all captions, takes each row's tallest caption
//! block, and accumulates row offsets; only then is the canvas allocated and
//! pass two draws text and pastes images at precomputed origins.

use image::{Rgb, RgbImage};

use crate::batch::batched;
use crate::surface::{TextSurface, fill_rect};
use crate::typeset::Typesetting;
use crate::{Error, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TITLE_BAND: Rgb<u8> = Rgb([235, 235, 235]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Composes a captioned grid of `samp_w x samp_h` images into one canvas.
///
/// `imgs` and `captions` pair up index-by-index and are grouped into rows of
/// `cols` cells (the last row may be short). Every cell in a row shares the
/// row's tallest caption block, so image tops line up across the row. A
/// title, when given, is set in its own `title_type` and drawn in a
/// light-gray band spanning the full canvas width.
///
/// Caption and title text origins compensate for the font's bearing
/// (`padding - char offset`), so the visual text edge aligns with the
/// padding box rather than the glyph's nominal origin.
#[allow(clippy::too_many_arguments)]
pub fn make_captioned_grid<S, C>(
    surface: &S,
    cell_type: &Typesetting<S::Font>,
    cols: usize,
    samp_w: u32,
    samp_h: u32,
    imgs: &[RgbImage],
    captions: &[C],
    title_type: Option<&Typesetting<S::Font>>,
    title: Option<&str>,
) -> Result<RgbImage>
where
    S: TextSurface,
    C: AsRef<str>,
{
    if imgs.len() != captions.len() {
        return Err(Error::SampleCountMismatch {
            imgs: imgs.len(),
            captions: captions.len(),
        });
    }
    if imgs.is_empty() {
        return Err(Error::EmptyGrid);
    }
    if cols == 0 {
        return Err(Error::ZeroColumns);
    }
    let title_type = match (title, title_type) {
        (Some(_), None) => return Err(Error::TitleWithoutTypesetting),
        (Some(_), Some(typesetting)) => Some(typesetting),
        (None, _) => None,
    };
    for (index, img) in imgs.iter().enumerate() {
        if img.width() != samp_w || img.height() != samp_h {
            return Err(Error::CellSizeMismatch {
                index,
                got_w: img.width(),
                got_h: img.height(),
                want_w: samp_w,
                want_h: samp_h,
            });
        }
    }

    let metrics = cell_type.font_metrics;
    let rows = imgs.len().div_ceil(cols);

    // Pass 1: wrap everything so all row heights are known before the canvas
    // is allocated.
    let mut row_blocks: Vec<Vec<String>> = Vec::with_capacity(rows);
    let mut row_text_heights: Vec<i64> = Vec::with_capacity(rows);
    for row_captions in batched(captions, cols)? {
        let wrapped: Vec<Vec<String>> = row_captions
            .iter()
            .map(|caption| cell_type.wrapper.wrap(caption.as_ref()))
            .collect();
        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(0) as i64;
        row_text_heights.push(text_block_height(
            max_lines,
            i64::from(metrics.charh),
            i64::from(metrics.line_spacing),
        ));
        row_blocks.push(wrapped.into_iter().map(|lines| lines.join("\n")).collect());
    }

    // Cumulative sum shifted by one: row 0 starts at offset 0.
    let mut row_offsets: Vec<i64> = Vec::with_capacity(rows);
    let mut acc = 0i64;
    for height in &row_text_heights {
        row_offsets.push(acc);
        acc += height;
    }
    let rows_text_height = acc;

    let (title_height, title_block) = match (title, title_type) {
        (Some(text), Some(typesetting)) => {
            let lines = typesetting.wrapper.wrap(text);
            let title_metrics = typesetting.font_metrics;
            let height = i64::from(typesetting.padding.vertical())
                + text_block_height(
                    lines.len() as i64,
                    i64::from(title_metrics.charh),
                    i64::from(title_metrics.line_spacing),
                );
            (height, Some(lines.join("\n")))
        }
        _ => (0, None),
    };

    let cell_pad_v = i64::from(cell_type.padding.vertical());
    let width = i64::from(samp_w) * cols as i64;
    let height =
        title_height + rows_text_height + rows as i64 * (cell_pad_v + i64::from(samp_h));
    tracing::debug!(width, height, rows, title_height, "grid geometry computed");

    let mut canvas = RgbImage::from_pixel(width as u32, height as u32, BACKGROUND);

    // Pass 2: title band first, then each row's captions and images.
    if let (Some(block), Some(typesetting)) = (title_block.as_deref(), title_type) {
        fill_rect(&mut canvas, 0, 0, width, title_height, TITLE_BAND);
        let title_metrics = typesetting.font_metrics;
        let x = i64::from(typesetting.padding.left) - i64::from(title_metrics.charleft);
        let y = i64::from(typesetting.padding.top) - i64::from(title_metrics.chartop);
        surface.draw_text(
            &mut canvas,
            &typesetting.font,
            x as i32,
            y as i32,
            block,
            TEXT_COLOR,
        );
    }

    let text_x_offset = i64::from(cell_type.padding.left) - i64::from(metrics.charleft);
    let text_y_offset = i64::from(cell_type.padding.top) - i64::from(metrics.chartop);
    for (row_ix, (row_imgs, blocks)) in batched(imgs, cols)?.zip(&row_blocks).enumerate() {
        let row_text_height = row_text_heights[row_ix];
        let row_y =
            title_height + row_offsets[row_ix] + row_ix as i64 * (cell_pad_v + i64::from(samp_h));
        let text_y = row_y + text_y_offset;
        let img_y = row_y
            + i64::from(cell_type.padding.top)
            + row_text_height
            + i64::from(cell_type.padding.bottom);
        for (col_ix, (img, block)) in row_imgs.iter().zip(blocks).enumerate() {
            let col_x = col_ix as i64 * i64::from(samp_w);
            surface.draw_text(
                &mut canvas,
                &cell_type.font,
                (col_x + text_x_offset) as i32,
                text_y as i32,
                block,
                TEXT_COLOR,
            );
            image::imageops::replace(&mut canvas, *img, col_x, img_y);
        }
    }

    Ok(canvas)
}

/// Height of an `lines`-line text block. A block with no lines at all is
/// flat, not `-line_spacing` tall.
fn text_block_height(lines: i64, charh: i64, line_spacing: i64) -> i64 {
    if lines == 0 {
        0
    } else {
        lines * charh + (lines - 1) * line_spacing
    }
}

/// A grid captioner with the layout parameters bound up front; only images,
/// captions, and the optional title vary per call. Immutable and reusable.
pub struct GridCaptioner<S: TextSurface> {
    surface: S,
    cell_type: Typesetting<S::Font>,
    cols: usize,
    samp_w: u32,
    samp_h: u32,
    title_type: Option<Typesetting<S::Font>>,
}

impl<S: TextSurface> GridCaptioner<S> {
    /// Composes one grid; see [`make_captioned_grid`].
    pub fn caption<C: AsRef<str>>(
        &self,
        imgs: &[RgbImage],
        captions: &[C],
        title: Option<&str>,
    ) -> Result<RgbImage> {
        make_captioned_grid(
            &self.surface,
            &self.cell_type,
            self.cols,
            self.samp_w,
            self.samp_h,
            imgs,
            captions,
            self.title_type.as_ref(),
            title,
        )
    }
}

/// Binds layout parameters into a reusable [`GridCaptioner`].
pub fn make_grid_captioner<S: TextSurface>(
    surface: S,
    cell_type: Typesetting<S::Font>,
    cols: usize,
    samp_w: u32,
    samp_h: u32,
    title_type: Option<Typesetting<S::Font>>,
) -> GridCaptioner<S> {
    GridCaptioner {
        surface,
        cell_type,
        cols,
        samp_w,
        samp_h,
        title_type,
    }
}
