//! Character-cell font metrics derived by probing a reference glyph.

use serde::{Deserialize, Serialize};

use crate::surface::TextSurface;
use crate::{Error, Result};

/// Metrics of a font's reference character cell.
///
/// `chartop`/`charleft` are the ink offsets of the reference glyph from its
/// layout origin, `charw`/`charh` its ink box dimensions, and `line_spacing`
/// the extra vertical gap the surface inserts between consecutive line boxes
/// beyond `charh`. `charw` and `charh` are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub chartop: i32,
    pub charleft: i32,
    pub charw: i32,
    pub charh: i32,
    pub line_spacing: i32,
}

/// Reference glyph the character cell is derived from.
const PROBE_GLYPH: &str = "M";
const PROBE_TWO_LINES: &str = "M\nM";

/// Derives [`FontMetrics`] by measuring the reference glyph once on its own
/// and once stacked on two lines.
///
/// The single-glyph box yields the cell dimensions and bearing offsets; the
/// two-line box isolates the surface's inter-line gap:
/// `line_spacing = two_line_height - 2 * charh`. A font whose reference
/// glyph renders without ink cannot be probed; that is fatal, not retried —
/// font validity is a precondition of everything downstream.
pub fn probe_font_metrics<S: TextSurface>(surface: &S, font: &S::Font) -> Result<FontMetrics> {
    let one = surface.ink_bounds(font, PROBE_GLYPH)?;
    let charw = one.width();
    let charh = one.height();
    if charw <= 0 || charh <= 0 {
        return Err(Error::EmptyProbeGlyph);
    }

    let two = surface.ink_bounds(font, PROBE_TWO_LINES)?;
    let line_spacing = two.height() - 2 * charh;

    let metrics = FontMetrics {
        chartop: one.top,
        charleft: one.left,
        charw,
        charh,
        line_spacing,
    };
    tracing::debug!(?metrics, "probed font metrics");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DeterministicTextSurface, InkBounds};
    use image::{Rgb, RgbImage};

    #[test]
    fn probe_recovers_the_deterministic_cell() {
        let surface = DeterministicTextSurface::default();
        let metrics = probe_font_metrics(&surface, &()).unwrap();
        assert_eq!(
            metrics,
            FontMetrics {
                chartop: 2,
                charleft: 1,
                charw: 6,
                charh: 10,
                line_spacing: 2,
            }
        );
    }

    #[test]
    fn line_spacing_is_advance_minus_glyph_height() {
        let surface = DeterministicTextSurface {
            charw: 8,
            charh: 14,
            chartop: 0,
            charleft: 0,
            line_advance: 19,
        };
        let metrics = probe_font_metrics(&surface, &()).unwrap();
        assert_eq!(metrics.line_spacing, 5);
    }

    struct InklessSurface;

    impl TextSurface for InklessSurface {
        type Font = ();

        fn ink_bounds(&self, _font: &(), _text: &str) -> Result<InkBounds> {
            Ok(InkBounds {
                left: 0,
                top: 0,
                right: 0,
                bottom: 0,
            })
        }

        fn draw_text(
            &self,
            _canvas: &mut RgbImage,
            _font: &(),
            _x: i32,
            _y: i32,
            _text: &str,
            _color: Rgb<u8>,
        ) {
        }
    }

    #[test]
    fn inkless_reference_glyph_is_fatal() {
        let err = probe_font_metrics(&InklessSurface, &()).unwrap_err();
        assert!(matches!(err, Error::EmptyProbeGlyph));
    }
}
