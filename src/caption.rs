//! Caption insertion.
//!
//! [`add_sub`] appends one row to a figure's layout table and places a
//! caption in it. The row is exactly as tall as the measured caption plus
//! padding above and below, so the original rows keep their sizes and the
//! panel keeps its geometry.
//!
//! Caption coordinates are split: `x` runs across the plot's
//! panel columns (so a centered caption centers under the panel, not under
//! the axis labels), while `y` runs from the bottom to the top of the
//! padded band inside the new row. Neither depends on the plot's data.

use crate::annotation::Annotation;
use crate::content::{Content, TextStyle};
use crate::coord::Frame;
use crate::error::{Error, Result};
use crate::geometry::Insets;
use crate::log::debug;
use crate::measure::TextMeasure;
use crate::plot::Figure;
use crate::table::{Cell, CellContent, LayoutTable, Span, Unit};
use crate::theme::Theme;

/// A length that may depend on the text size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute points.
    Points(f64),
    /// Multiples of one text line (size × line height).
    Lines(f64),
}

impl Length {
    /// Resolve to points for `style`.
    #[must_use]
    pub fn to_points(self, style: &TextStyle) -> f64 {
        match self {
            Length::Points(p) => p,
            Length::Lines(n) => n * style.line_points(),
        }
    }
}

/// Where the caption row goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionLocation {
    /// After the last row.
    #[default]
    Below,
    /// Before the first row.
    Above,
}

/// Caption description for [`add_sub`].
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    content: Content,
    x: f64,
    y: f64,
    hjust: f64,
    vjust: f64,
    style: TextStyle,
    vpadding: Length,
    location: CaptionLocation,
}

impl Caption {
    /// Caption centered under the panel, hanging from the top of its band,
    /// 14pt, one line of padding above and below.
    #[must_use]
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            x: 0.5,
            y: 1.0,
            hjust: 0.5,
            vjust: 1.0,
            style: TextStyle::default(),
            vpadding: Length::Lines(1.0),
            location: CaptionLocation::Below,
        }
    }

    /// Take text style and padding from a theme.
    #[must_use]
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.style = theme.text_style();
        self.vpadding = Length::Lines(theme.caption_padding);
        self
    }

    /// Horizontal position across the panel columns (0 = left edge).
    #[must_use]
    pub fn x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Vertical position within the padded band (0 = bottom).
    ///
    /// The band is the caption row minus its padding, so `y(0.0)` sits one
    /// padding above the row's bottom edge and `y(1.0)` one padding below
    /// its top edge.
    #[must_use]
    pub fn y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Horizontal justification.
    #[must_use]
    pub fn hjust(mut self, h: f64) -> Self {
        self.hjust = h;
        self
    }

    /// Vertical justification.
    #[must_use]
    pub fn vjust(mut self, v: f64) -> Self {
        self.vjust = v;
        self
    }

    /// Font size in points.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.style.size = size;
        self
    }

    /// Replace the text style.
    #[must_use]
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Padding above and below the caption.
    #[must_use]
    pub fn vpadding(mut self, padding: Length) -> Self {
        self.vpadding = padding;
        self
    }

    /// Row placement.
    #[must_use]
    pub fn location(mut self, location: CaptionLocation) -> Self {
        self.location = location;
        self
    }

    /// The label that ends up in the caption cell.
    #[must_use]
    pub fn annotation(&self) -> Annotation {
        Annotation::new(self.content.clone(), self.x, self.y)
            .frame(Frame::PanelNormalized)
            .hjust(self.hjust)
            .vjust(self.vjust)
            .style(self.style)
    }
}

/// Add `caption` as a new row of `figure`'s layout table.
///
/// Plots are wrapped into a table first. The result can be passed back in
/// to stack further captions; each call appends exactly one row.
///
/// # Errors
///
/// - [`Error::EmptyContent`] if the caption has nothing to draw.
/// - [`Error::InvalidPadding`] if the padding resolves negative or not
///   finite.
/// - Measurement errors from `measure` propagate unchanged.
pub fn add_sub(figure: impl Into<Figure>, caption: &Caption, measure: &dyn TextMeasure) -> Result<LayoutTable> {
    if caption.content.is_empty() {
        return Err(Error::EmptyContent);
    }
    let vpad = caption.vpadding.to_points(&caption.style);
    if !vpad.is_finite() || vpad < 0.0 {
        return Err(Error::InvalidPadding(vpad));
    }

    let table = figure.into().into_table();
    let measured = measure.measure(&caption.content, &caption.style)?.rotated(caption.style.angle);
    let height = measured.height + 2.0 * vpad;

    let row = match caption.location {
        CaptionLocation::Below => table.nrow(),
        CaptionLocation::Above => 0,
    };
    let grown = table.insert_row(row, Unit::Points(height))?;
    let cols = grown.panel_region().map_or(Span::new(0, grown.ncol()), |p| p.cols);
    debug!(row, height, vpad, "inserting caption row");

    grown.with_cell(
        Cell::new(row, cols.start, CellContent::Label(caption.annotation()))
            .span(1, cols.end - cols.start)
            .padding(Insets::vertical(vpad))
            .name("caption"),
    )
}
