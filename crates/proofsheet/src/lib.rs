#![forbid(unsafe_code)]

//! Captioned image-grid composition.
//!
//! `proofsheet` lays out a rectangular grid of same-sized images with a
//! wrapped caption beneath each image and an optional wrapped title banner
//! above the grid, then composes the result into a single RGB raster.
//!
//! All geometry is measured before the canvas is allocated: wrapped line
//! counts decide per-row text-block heights (rows whose captions wrap to
//! more lines are taller), so the finished canvas size is known up front and
//! drawing is a single pass over precomputed offsets.
//!
//! Glyph rendering and measurement sit behind the [`TextSurface`] seam.
//! Two implementations ship: [`DeterministicTextSurface`] (fixed character
//! cells, no font files, useful for layout tests and debugging) and, behind
//! the `raster` cargo feature, `raster::GlyphSurface` backed by real font
//! outlines.

pub mod batch;
pub mod grid;
pub mod metrics;
#[cfg(feature = "raster")]
pub mod raster;
pub mod surface;
pub mod typeset;
pub mod wrap;

pub use batch::{Batched, batched};
pub use grid::{GridCaptioner, make_captioned_grid, make_grid_captioner};
pub use metrics::{FontMetrics, probe_font_metrics};
pub use surface::{DeterministicTextSurface, InkBounds, TextSurface};
pub use typeset::{Padding, TypesetOptions, Typesetting, make_typesetting};
pub use wrap::{GreedyWrapper, SharedWrapper, TextWrapper, WrapperFactory};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Horizontal padding leaves no pixels for caption text.
    #[error("wrap width {x_wrap_px}px leaves no text room after {pad_px}px of horizontal padding")]
    WrapWidthTooSmall { x_wrap_px: u32, pad_px: u32 },

    /// The usable text width fits less than one character column.
    #[error("text width {textw_px}px fits no columns of {charw}px-wide character cells")]
    NoWrapColumns { textw_px: u32, charw: i32 },

    #[error("got {imgs} images but {captions} captions")]
    SampleCountMismatch { imgs: usize, captions: usize },

    #[error("cannot lay out an empty grid")]
    EmptyGrid,

    #[error("a grid needs at least one column")]
    ZeroColumns,

    #[error("a title was supplied without a title typesetting")]
    TitleWithoutTypesetting,

    #[error("image {index} is {got_w}x{got_h}, expected the cell size {want_w}x{want_h}")]
    CellSizeMismatch {
        index: usize,
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },

    /// The reference glyph produced no ink, so no character cell can be
    /// derived for the font.
    #[error("font metrics probe: reference glyph produced no ink")]
    EmptyProbeGlyph,

    /// The text surface could not measure text for this font.
    #[error("text measurement failed: {message}")]
    TextMeasurement { message: String },

    #[error("batch size must be at least 1")]
    ZeroBatchSize,
}
