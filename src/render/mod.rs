//! Rendering composed figures onto a drawing surface.
//!
//! [`render`] walks a [`Figure`], resolves every table's tracks inside the
//! area it is given, places each label through the coordinate transform
//! and hands the results to a [`Surface`]. The walker owns no drawing
//! state; surfaces decide how rectangles and text become output.
//!
//! Draw order: background, then for each table its cells by `z`. A plot
//! draws its underlay first, then its panel backgrounds, then its labels.

use crate::annotation::{place, PositionedAnnotation};
use crate::color::Rgba;
use crate::coord::CoordTransform;
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::log::{debug, warn};
use crate::measure::TextMeasure;
use crate::plot::{Figure, Renderable};
use crate::table::{CellContent, LayoutTable};
use crate::theme::Theme;

/// Drawing target for [`render`].
pub trait Surface {
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64);

    /// Draw a placed label.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ContentRender`] if the content cannot be
    /// drawn by this surface.
    fn text(&mut self, label: &PositionedAnnotation) -> Result<()>;
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Filled rectangle.
    FillRect {
        /// Area.
        rect: Rect,
        /// Fill colour.
        color: Rgba,
    },
    /// Outlined rectangle.
    StrokeRect {
        /// Area.
        rect: Rect,
        /// Stroke colour.
        color: Rgba,
        /// Stroke width in points.
        width: f64,
    },
    /// Placed label.
    Text(PositionedAnnotation),
}

/// Surface that records operations instead of drawing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations in draw order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded labels in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &PositionedAnnotation> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(label) => Some(label),
            _ => None,
        })
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Surface for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        self.ops.push(DrawOp::StrokeRect { rect, color, width });
    }

    fn text(&mut self, label: &PositionedAnnotation) -> Result<()> {
        self.ops.push(DrawOp::Text(label.clone()));
        Ok(())
    }
}

struct Renderer<'a> {
    theme: &'a Theme,
    measure: &'a dyn TextMeasure,
    surface: &'a mut dyn Surface,
}

impl Renderer<'_> {
    fn figure(&mut self, figure: &Figure, area: Rect) -> Result<()> {
        match figure {
            Figure::Plot(plot) => self.plot(plot, area),
            Figure::Table(table) => self.table(table, area),
            Figure::Empty => Ok(()),
        }
    }

    fn plot(&mut self, plot: &Renderable, area: Rect) -> Result<()> {
        let transform = CoordTransform::for_renderable(plot, area);
        if let Some(under) = plot.underlay() {
            self.figure(under, area)?;
        } else if self.theme.show_panels {
            for i in 0..transform.panel_count() {
                let rect = transform.panel_rect(Some(i))?;
                self.surface.fill_rect(rect, self.theme.panel_background);
                if let Some(border) = self.theme.panel_border {
                    self.surface.stroke_rect(rect, border, 1.0);
                }
            }
        }
        for label in plot.labels() {
            let placed = place(label, &transform, self.measure)?;
            self.surface.text(&placed)?;
        }
        Ok(())
    }

    fn table(&mut self, table: &LayoutTable, area: Rect) -> Result<()> {
        let fixed = table.height_sum().points;
        if fixed > area.height {
            warn!(fixed, available = area.height, "fixed rows exceed available height");
        }
        for (cell, rect) in table.resolve(area) {
            let inner = rect.inset(cell.padding);
            debug!(name = %cell.name, ?inner, "drawing cell");
            match &cell.content {
                CellContent::Plot(plot) => self.plot(plot, inner)?,
                CellContent::Table(nested) => self.table(nested, inner)?,
                CellContent::Label(label) => {
                    let placed = place(label, &CoordTransform::for_area(inner), self.measure)?;
                    self.surface.text(&placed)?;
                }
                CellContent::Spacer => {}
            }
        }
        Ok(())
    }
}

/// Draw `figure` onto `surface` at `size` points.
///
/// # Errors
///
/// Placement errors (frames, degenerate ranges, measurement) and surface
/// errors propagate unchanged; drawing stops at the first one.
pub fn render(
    figure: &Figure,
    size: Size,
    theme: &Theme,
    measure: &dyn TextMeasure,
    surface: &mut dyn Surface,
) -> Result<()> {
    let area = Rect::from_size(size);
    if theme.background.a > 0 {
        surface.fill_rect(area, theme.background);
    }
    Renderer { theme, measure, surface }.figure(figure, area)
}

/// Render into a fresh [`DisplayList`].
///
/// # Errors
///
/// See [`render`].
pub fn display_list(figure: &Figure, size: Size, theme: &Theme, measure: &dyn TextMeasure) -> Result<DisplayList> {
    let mut list = DisplayList::new();
    render(figure, size, theme, measure, &mut list)?;
    Ok(list)
}
