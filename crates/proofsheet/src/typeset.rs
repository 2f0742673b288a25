//! Typesetting bundles: a wrapper bound to a column width, a font handle,
//! its probed metrics, and a padding box.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::metrics::{FontMetrics, probe_font_metrics};
use crate::surface::TextSurface;
use crate::wrap::{GreedyWrapper, SharedWrapper, WrapperFactory};
use crate::{Error, Result};

/// Per-side pixel padding around a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub left: u32,
    #[serde(default)]
    pub bottom: u32,
    #[serde(default)]
    pub right: u32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        top: 0,
        left: 0,
        bottom: 0,
        right: 0,
    };

    pub fn uniform(px: u32) -> Self {
        Self {
            top: px,
            left: px,
            bottom: px,
            right: px,
        }
    }

    pub(crate) fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub(crate) fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Everything needed to set text in one region of the grid.
///
/// Immutable once constructed; build one for grid cells and optionally one
/// for the title banner, and reuse them across any number of invocations.
#[derive(Clone)]
pub struct Typesetting<F> {
    pub wrapper: SharedWrapper,
    pub font: F,
    pub font_metrics: FontMetrics,
    pub padding: Padding,
}

impl<F: std::fmt::Debug> std::fmt::Debug for Typesetting<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typesetting")
            .field("wrapper", &"<dyn TextWrapper>")
            .field("font", &self.font)
            .field("font_metrics", &self.font_metrics)
            .field("padding", &self.padding)
            .finish()
    }
}

/// Knobs for [`make_typesetting`]; the defaults probe the font and wrap
/// greedily with zero padding.
#[derive(Clone, Default)]
pub struct TypesetOptions {
    pub padding: Padding,
    /// Metrics to reuse instead of probing the font again.
    pub font_metrics: Option<FontMetrics>,
    /// Alternative wrapping policy; defaults to [`GreedyWrapper`].
    pub wrapper_factory: Option<WrapperFactory>,
}

/// Builds a [`Typesetting`] that wraps text to fit within `x_wrap_px`
/// pixels.
///
/// The usable text width is `x_wrap_px` minus horizontal padding; the wrap
/// column count is that width floor-divided by the probed character advance.
/// The division is exact for monospaced fonts and a deliberate approximation
/// for anything proportional. Both a zero usable width and a zero column
/// count are configuration failures — the wrapper must never be asked to
/// produce empty lines.
pub fn make_typesetting<S: TextSurface>(
    surface: &S,
    font: S::Font,
    x_wrap_px: u32,
    options: TypesetOptions,
) -> Result<Typesetting<S::Font>> {
    let font_metrics = match options.font_metrics {
        Some(metrics) => metrics,
        None => probe_font_metrics(surface, &font)?,
    };
    if font_metrics.charw <= 0 || font_metrics.charh <= 0 {
        return Err(Error::EmptyProbeGlyph);
    }

    let pad_px = options.padding.horizontal();
    if pad_px >= x_wrap_px {
        return Err(Error::WrapWidthTooSmall { x_wrap_px, pad_px });
    }
    let textw_px = x_wrap_px - pad_px;
    let wrap_at = (textw_px / font_metrics.charw as u32) as usize;
    if wrap_at == 0 {
        return Err(Error::NoWrapColumns {
            textw_px,
            charw: font_metrics.charw,
        });
    }

    let wrapper = match &options.wrapper_factory {
        Some(factory) => factory(wrap_at),
        None => Arc::new(GreedyWrapper::new(wrap_at)) as SharedWrapper,
    };

    Ok(Typesetting {
        wrapper,
        font,
        font_metrics,
        padding: options.padding,
    })
}
