//! Renderable plots and the figure variant.
//!
//! A [`Renderable`] stands in for a plot produced by the grammar engine:
//! its fixed margins (axes, titles), the data range and placement of each
//! panel, and any labels layered on top. This crate never draws the plot's
//! data itself.
//!
//! [`Figure`] is the tagged input accepted by the composition functions.
//! Plots and tables are normalized to [`LayoutTable`] at those boundaries.

use std::sync::Arc;

use crate::annotation::Annotation;
use crate::coord::{DataRange, YOrigin};
use crate::geometry::{Insets, Rect};
use crate::table::LayoutTable;

/// Default plot margins in points: room for a title strip on top, axis
/// ticks and titles at the bottom and left.
pub const DEFAULT_MARGINS: Insets = Insets::new(5.5, 5.5, 30.0, 40.0);

/// Gap between facet panels as a fraction of the panel region.
const FACET_GAP: f64 = 0.02;

/// One data panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Data extent.
    pub range: DataRange,
    /// Placement inside the panel region as a unit rectangle (y down).
    pub bounds: Rect,
}

impl Panel {
    /// Panel filling the whole panel region.
    #[must_use]
    pub fn new(range: DataRange) -> Self {
        Self { range, bounds: Rect::new(0.0, 0.0, 1.0, 1.0) }
    }

    /// Set the unit-rectangle placement.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }
}

/// An opaque plot with known panel geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    margins: Insets,
    panels: Vec<Panel>,
    y_origin: YOrigin,
    underlay: Option<Arc<Figure>>,
    labels: Vec<Annotation>,
}

impl Renderable {
    /// Single-panel plot with default margins.
    #[must_use]
    pub fn new(range: DataRange) -> Self {
        Self {
            margins: DEFAULT_MARGINS,
            panels: vec![Panel::new(range)],
            y_origin: YOrigin::Bottom,
            underlay: None,
            labels: Vec::new(),
        }
    }

    /// Faceted plot: one panel per range, wrapped into `ncol` columns in
    /// row-major order.
    #[must_use]
    pub fn faceted(ranges: Vec<DataRange>, ncol: usize) -> Self {
        let n = ranges.len();
        let ncol = ncol.clamp(1, n.max(1));
        let nrow = n.div_ceil(ncol).max(1);
        let w = (1.0 - FACET_GAP * (ncol - 1) as f64) / ncol as f64;
        let h = (1.0 - FACET_GAP * (nrow - 1) as f64) / nrow as f64;
        let panels = ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                let (row, col) = (i / ncol, i % ncol);
                Panel::new(range).bounds(Rect::new(
                    col as f64 * (w + FACET_GAP),
                    row as f64 * (h + FACET_GAP),
                    w,
                    h,
                ))
            })
            .collect();
        Self { panels, ..Self::new(DataRange::UNIT) }
    }

    /// Wrap a figure so that CANVAS-style coordinates address it directly:
    /// no margins, one panel covering everything with range `[0,1]²`, and
    /// the figure drawn underneath.
    #[must_use]
    pub fn canvas(figure: impl Into<Figure>) -> Self {
        Self {
            margins: Insets::ZERO,
            panels: vec![Panel::new(DataRange::UNIT)],
            y_origin: YOrigin::Bottom,
            underlay: Some(Arc::new(figure.into())),
            labels: Vec::new(),
        }
    }

    /// Set the fixed margins around the panel region.
    #[must_use]
    pub fn margins(mut self, margins: Insets) -> Self {
        self.margins = margins;
        self
    }

    /// Replace the panels.
    #[must_use]
    pub fn panels(mut self, panels: Vec<Panel>) -> Self {
        self.panels = panels;
        self
    }

    /// Set the y-axis origin convention.
    #[must_use]
    pub fn y_origin(mut self, origin: YOrigin) -> Self {
        self.y_origin = origin;
        self
    }

    /// New plot with `label` layered on top; `self` is left untouched.
    #[must_use]
    pub fn with_label(&self, label: Annotation) -> Self {
        let mut next = self.clone();
        next.labels.push(label);
        next
    }

    /// Fixed margins.
    #[must_use]
    pub fn margin_insets(&self) -> Insets {
        self.margins
    }

    /// Panels in facet order.
    #[must_use]
    pub fn panel_list(&self) -> &[Panel] {
        &self.panels
    }

    /// Y-axis origin convention.
    #[must_use]
    pub fn origin(&self) -> YOrigin {
        self.y_origin
    }

    /// Figure drawn underneath (canvas wrappers only).
    #[must_use]
    pub fn underlay(&self) -> Option<&Figure> {
        self.underlay.as_deref()
    }

    /// Labels layered on top, in insertion order.
    #[must_use]
    pub fn labels(&self) -> &[Annotation] {
        &self.labels
    }
}

/// Anything that can occupy a slot in a composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    /// A bare plot.
    Plot(Renderable),
    /// An already composed table.
    Table(LayoutTable),
    /// An empty slot.
    Empty,
}

impl Figure {
    /// Normalize to a layout table.
    #[must_use]
    pub fn into_table(self) -> LayoutTable {
        match self {
            Figure::Plot(plot) => LayoutTable::from_renderable(plot),
            Figure::Table(table) => table,
            Figure::Empty => LayoutTable::spacer(),
        }
    }

    /// Whether this is an empty slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Figure::Empty)
    }
}

impl From<Renderable> for Figure {
    fn from(plot: Renderable) -> Self {
        Figure::Plot(plot)
    }
}

impl From<LayoutTable> for Figure {
    fn from(table: LayoutTable) -> Self {
        Figure::Table(table)
    }
}

impl<T: Into<Figure>> From<Option<T>> for Figure {
    fn from(slot: Option<T>) -> Self {
        slot.map_or(Figure::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faceted_layout() {
        let plot = Renderable::faceted(vec![DataRange::UNIT; 3], 2);
        let panels = plot.panel_list();
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].bounds.y, 0.0);
        assert!(panels[1].bounds.x > panels[0].bounds.right());
        assert!(panels[2].bounds.y > panels[0].bounds.bottom());
        assert!((panels[1].bounds.right() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_label_does_not_mutate() {
        let base = Renderable::new(DataRange::UNIT);
        let labelled = base.with_label(Annotation::new("a", 0.5, 0.5));
        assert!(base.labels().is_empty());
        assert_eq!(labelled.labels().len(), 1);
    }

    #[test]
    fn test_canvas_wrapper() {
        let plot = Renderable::new(DataRange::new(0.0, 10.0, 0.0, 10.0));
        let canvas = Renderable::canvas(plot.clone());
        assert_eq!(canvas.margin_insets(), Insets::ZERO);
        assert_eq!(canvas.panel_list()[0].range, DataRange::UNIT);
        assert_eq!(canvas.underlay(), Some(&Figure::Plot(plot)));
    }

    #[test]
    fn test_figure_from_option() {
        let empty: Figure = Option::<Renderable>::None.into();
        assert!(empty.is_empty());
        let some: Figure = Some(Renderable::new(DataRange::UNIT)).into();
        assert!(matches!(some, Figure::Plot(_)));
    }
}
