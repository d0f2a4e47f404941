//! Text measurement.
//!
//! Glyph shaping lives outside this crate. [`TextMeasure`] is the seam a
//! font engine plugs into; [`ApproxMetrics`] is a font-free fallback with
//! fixed advance widths, good enough for layout tests and SVG previews.

use crate::content::math::symbol_glyph;
use crate::content::{Content, Expr, TextStyle};
use crate::error::Result;
use crate::geometry::Size;

/// Measures the unrotated bounding box of content at a given style.
///
/// Implementations must be callable re-entrantly through `&self`; a shaper
/// with internal mutable state should guard it (e.g. with a `Mutex`).
pub trait TextMeasure {
    /// Measured width and height in points, before rotation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ContentRender`] if the content cannot be
    /// laid out.
    fn measure(&self, content: &Content, style: &TextStyle) -> Result<Size>;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, content: &Content, style: &TextStyle) -> Result<Size> {
        (**self).measure(content, style)
    }
}

/// Fixed-advance metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMetrics {
    /// Advance width of one character, in em.
    pub advance: f64,
    /// Width multiplier for bold faces.
    pub bold_factor: f64,
    /// Scale applied to super- and subscripts.
    pub script_scale: f64,
    /// Baseline shift of scripts, in em.
    pub script_shift: f64,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self { advance: 0.6, bold_factor: 1.05, script_scale: 0.7, script_shift: 0.35 }
    }
}

// Ascent/descent split of one em.
const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;

#[derive(Debug, Clone, Copy)]
struct Extent {
    width: f64,
    ascent: f64,
    descent: f64,
}

impl Extent {
    fn glyphs(n: usize, size: f64, advance: f64) -> Self {
        Self { width: n as f64 * advance * size, ascent: ASCENT * size, descent: DESCENT * size }
    }

    fn beside(self, other: Self) -> Self {
        Self {
            width: self.width + other.width,
            ascent: self.ascent.max(other.ascent),
            descent: self.descent.max(other.descent),
        }
    }
}

impl ApproxMetrics {
    fn char_advance(&self, style: &TextStyle) -> f64 {
        if style.face.is_bold() {
            self.advance * self.bold_factor
        } else {
            self.advance
        }
    }

    fn text_size(&self, text: &str, style: &TextStyle) -> Size {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.char_advance(style) * style.size;
        let height = style.size + (lines.len() - 1) as f64 * style.line_points();
        Size::new(width, height)
    }

    fn expr_extent(&self, expr: &Expr, size: f64, advance: f64) -> Result<Extent> {
        let extent = match expr {
            Expr::Literal(s) => Extent::glyphs(s.chars().count(), size, advance),
            Expr::Symbol(name) => {
                symbol_glyph(name)?;
                Extent::glyphs(1, size, advance)
            }
            Expr::Superscript { base, exponent } => {
                let b = self.expr_extent(base, size, advance)?;
                let e = self.expr_extent(exponent, size * self.script_scale, advance)?;
                let raise = self.script_shift * size;
                Extent {
                    width: b.width + e.width,
                    ascent: b.ascent.max(raise + e.ascent),
                    descent: b.descent.max(e.descent - raise),
                }
            }
            Expr::Subscript { base, index } => {
                let b = self.expr_extent(base, size, advance)?;
                let i = self.expr_extent(index, size * self.script_scale, advance)?;
                let lower = self.script_shift * size;
                Extent {
                    width: b.width + i.width,
                    ascent: b.ascent.max(i.ascent - lower),
                    descent: b.descent.max(lower + i.descent),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let glyph = Extent::glyphs(op.glyph().chars().count() + 2, size, advance);
                self.expr_extent(lhs, size, advance)?
                    .beside(glyph)
                    .beside(self.expr_extent(rhs, size, advance)?)
            }
            Expr::Row(items) => {
                let mut acc = Extent { width: 0.0, ascent: 0.0, descent: 0.0 };
                for item in items {
                    acc = acc.beside(self.expr_extent(item, size, advance)?);
                }
                acc
            }
        };
        Ok(extent)
    }
}

impl TextMeasure for ApproxMetrics {
    fn measure(&self, content: &Content, style: &TextStyle) -> Result<Size> {
        match content {
            Content::Text(text) => Ok(self.text_size(text, style)),
            Content::Math(expr) => {
                let e = self.expr_extent(expr, style.size, self.char_advance(style))?;
                Ok(Size::new(e.width, e.ascent + e.descent))
            }
        }
    }
}
