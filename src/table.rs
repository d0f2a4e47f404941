//! Layout tables.
//!
//! A [`LayoutTable`] is a grid of row heights and column widths with cells
//! placed on it. Track sizes are [`Unit`]s: absolute points, or null
//! weights that share whatever space the absolute tracks leave. Cells may
//! span several tracks and overlap (higher `z` draws later).
//!
//! Tables are values. Every operation returns a new table; inputs are never
//! modified, so a table can be fed back into captioning or composition any
//! number of times.

use std::sync::Arc;

use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::geometry::{Insets, Rect};
use crate::plot::Renderable;

/// Size of one row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    /// Relative weight sharing the space left by absolute tracks.
    Null(f64),
    /// Absolute length in points.
    Points(f64),
}

impl Unit {
    /// Raw value (weight or points).
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Unit::Null(v) | Unit::Points(v) => v,
        }
    }

    /// Points, if absolute.
    #[must_use]
    pub fn points(self) -> Option<f64> {
        match self {
            Unit::Points(p) => Some(p),
            Unit::Null(_) => None,
        }
    }
}

/// Total of a track vector, split by kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitSum {
    /// Sum of absolute tracks in points.
    pub points: f64,
    /// Sum of null weights.
    pub null: f64,
}

impl UnitSum {
    fn of(units: &[Unit]) -> Self {
        units.iter().fold(Self::default(), |acc, u| match u {
            Unit::Points(p) => Self { points: acc.points + p, ..acc },
            Unit::Null(w) => Self { null: acc.null + w, ..acc },
        })
    }
}

/// A resolved track: start offset and length in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Start offset.
    pub start: f64,
    /// Length.
    pub length: f64,
}

/// Resolve `units` along an axis of `available` points starting at
/// `origin`. Absolute tracks get their length; the remainder (never
/// negative) is split among null tracks by weight.
#[must_use]
pub fn resolve_tracks(units: &[Unit], origin: f64, available: f64) -> Vec<Track> {
    let sum = UnitSum::of(units);
    let remaining = (available - sum.points).max(0.0);
    let mut start = origin;
    units
        .iter()
        .map(|unit| {
            let length = match *unit {
                Unit::Points(p) => p,
                Unit::Null(w) if sum.null > 0.0 => remaining * (w / sum.null),
                Unit::Null(_) => 0.0,
            };
            let track = Track { start, length };
            start += length;
            track
        })
        .collect()
}

/// What a cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// A plot.
    Plot(Renderable),
    /// A nested table.
    Table(Arc<LayoutTable>),
    /// A label positioned in the PANEL_NORMALIZED frame of the cell's
    /// padded area.
    Label(Annotation),
    /// Nothing; reserves space.
    Spacer,
}

/// A rectangular region of the table and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// First row.
    pub row: usize,
    /// First column.
    pub col: usize,
    /// Number of rows covered (at least 1).
    pub row_span: usize,
    /// Number of columns covered (at least 1).
    pub col_span: usize,
    /// Draw order; higher draws later.
    pub z: i32,
    /// Name, for lookups and debugging.
    pub name: String,
    /// Inner padding between the cell edge and its content.
    pub padding: Insets,
    /// Content.
    pub content: CellContent,
}

impl Cell {
    /// Single-slot cell at `(row, col)`.
    #[must_use]
    pub fn new(row: usize, col: usize, content: CellContent) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            z: 0,
            name: String::new(),
            padding: Insets::ZERO,
            content,
        }
    }

    /// Set the span.
    #[must_use]
    pub fn span(mut self, rows: usize, cols: usize) -> Self {
        self.row_span = rows;
        self.col_span = cols;
        self
    }

    /// Set the draw order.
    #[must_use]
    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the inner padding.
    #[must_use]
    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// One past the last row covered.
    #[must_use]
    pub fn row_end(&self) -> usize {
        self.row + self.row_span
    }

    /// One past the last column covered.
    #[must_use]
    pub fn col_end(&self) -> usize {
        self.col + self.col_span
    }
}

/// Half-open index range over tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First index.
    pub start: usize,
    /// One past the last index.
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    // Adjust for a track inserted at `index`.
    fn insert_at(self, index: usize) -> Self {
        if index <= self.start {
            Self::new(self.start + 1, self.end + 1)
        } else if index < self.end {
            Self::new(self.start, self.end + 1)
        } else {
            self
        }
    }
}

/// Rows and columns occupied by the panel(s) of the table's plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRegion {
    /// Panel rows.
    pub rows: Span,
    /// Panel columns.
    pub cols: Span,
}

/// Grid of sized tracks with cells placed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTable {
    heights: Vec<Unit>,
    widths: Vec<Unit>,
    cells: Vec<Cell>,
    panel: Option<PanelRegion>,
}

impl LayoutTable {
    /// Empty table with the given tracks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if a track size is negative or not
    /// finite.
    pub fn new(heights: Vec<Unit>, widths: Vec<Unit>) -> Result<Self> {
        let table = Self { heights, widths, cells: Vec::new(), panel: None };
        table.validate()?;
        Ok(table)
    }

    /// One relative slot holding nothing.
    #[must_use]
    pub fn spacer() -> Self {
        Self {
            heights: vec![Unit::Null(1.0)],
            widths: vec![Unit::Null(1.0)],
            cells: vec![Cell::new(0, 0, CellContent::Spacer).name("spacer")],
            panel: None,
        }
    }

    /// Wrap a plot as a 3×3 table: its margins become absolute outer
    /// tracks around a `Null(1)` panel track. The plot cell spans all nine
    /// slots so it draws its axes into the margins.
    #[must_use]
    pub fn from_renderable(plot: Renderable) -> Self {
        let m = plot.margin_insets();
        Self {
            heights: vec![Unit::Points(m.top), Unit::Null(1.0), Unit::Points(m.bottom)],
            widths: vec![Unit::Points(m.left), Unit::Null(1.0), Unit::Points(m.right)],
            cells: vec![Cell::new(0, 0, CellContent::Plot(plot)).span(3, 3).name("plot")],
            panel: Some(PanelRegion { rows: Span::new(1, 2), cols: Span::new(1, 2) }),
        }
    }

    /// Wrap a label as a one-cell table; its position is read in the
    /// PANEL_NORMALIZED frame of the whole table.
    #[must_use]
    pub fn from_label(label: Annotation) -> Self {
        Self {
            heights: vec![Unit::Null(1.0)],
            widths: vec![Unit::Null(1.0)],
            cells: vec![Cell::new(0, 0, CellContent::Label(label)).name("label")],
            panel: None,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.heights.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.widths.len()
    }

    /// Row heights.
    #[must_use]
    pub fn heights(&self) -> &[Unit] {
        &self.heights
    }

    /// Column widths.
    #[must_use]
    pub fn widths(&self) -> &[Unit] {
        &self.widths
    }

    /// Cells in insertion order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// First cell with the given name.
    #[must_use]
    pub fn cell_named(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }

    /// Panel region, if the table wraps a plot.
    #[must_use]
    pub fn panel_region(&self) -> Option<PanelRegion> {
        self.panel
    }

    /// Total of the row heights.
    #[must_use]
    pub fn height_sum(&self) -> UnitSum {
        UnitSum::of(&self.heights)
    }

    /// Total of the column widths.
    #[must_use]
    pub fn width_sum(&self) -> UnitSum {
        UnitSum::of(&self.widths)
    }

    /// New table with `cell` added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if the cell falls outside the grid
    /// or has an empty span.
    pub fn with_cell(&self, cell: Cell) -> Result<Self> {
        self.check_cell(&cell)?;
        let mut next = self.clone();
        next.cells.push(cell);
        Ok(next)
    }

    /// New table with a row of height `unit` inserted before row `index`
    /// (`index == nrow()` appends). Cells at or below the insertion shift
    /// down; cells spanning across it grow by one row. Existing track
    /// sizes are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if `index > nrow()` or `unit` is
    /// invalid.
    pub fn insert_row(&self, index: usize, unit: Unit) -> Result<Self> {
        if index > self.nrow() {
            return Err(Error::InvalidTable(format!(
                "row index {index} beyond {} rows",
                self.nrow()
            )));
        }
        check_unit(unit)?;
        let mut next = self.clone();
        next.heights.insert(index, unit);
        for cell in &mut next.cells {
            let span = Span::new(cell.row, cell.row_end()).insert_at(index);
            cell.row = span.start;
            cell.row_span = span.end - span.start;
        }
        if let Some(panel) = next.panel.as_mut() {
            panel.rows = panel.rows.insert_at(index);
        }
        Ok(next)
    }

    /// Column counterpart of [`LayoutTable::insert_row`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if `index > ncol()` or `unit` is
    /// invalid.
    pub fn insert_col(&self, index: usize, unit: Unit) -> Result<Self> {
        if index > self.ncol() {
            return Err(Error::InvalidTable(format!(
                "column index {index} beyond {} columns",
                self.ncol()
            )));
        }
        check_unit(unit)?;
        let mut next = self.clone();
        next.widths.insert(index, unit);
        for cell in &mut next.cells {
            let span = Span::new(cell.col, cell.col_end()).insert_at(index);
            cell.col = span.start;
            cell.col_span = span.end - span.start;
        }
        if let Some(panel) = next.panel.as_mut() {
            panel.cols = panel.cols.insert_at(index);
        }
        Ok(next)
    }

    /// Fixed space around the panel region, when every track outside it is
    /// absolute. `None` for tables without a panel or with relative margins.
    #[must_use]
    pub fn outer_margins(&self) -> Option<Insets> {
        let panel = self.panel?;
        let side = |units: &[Unit]| -> Option<f64> {
            units.iter().map(|u| u.points()).sum::<Option<f64>>()
        };
        Some(Insets::new(
            side(&self.heights[..panel.rows.start])?,
            side(&self.widths[panel.cols.end..])?,
            side(&self.heights[panel.rows.end..])?,
            side(&self.widths[..panel.cols.start])?,
        ))
    }

    /// New table whose outer margins are grown to at least the requested
    /// sides by adding absolute tracks at the edges. Sides set to `None`
    /// are left alone. Tables without absolute outer margins are returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Propagates [`LayoutTable::insert_row`] errors.
    pub fn pad_margins(&self, top: Option<f64>, right: Option<f64>, bottom: Option<f64>, left: Option<f64>) -> Result<Self> {
        let Some(current) = self.outer_margins() else {
            return Ok(self.clone());
        };
        let grow = |want: Option<f64>, have: f64| want.map(|w| w - have).filter(|d| *d > 0.0);
        let mut next = self.clone();
        if let Some(d) = grow(top, current.top) {
            next = next.insert_row(0, Unit::Points(d))?;
        }
        if let Some(d) = grow(bottom, current.bottom) {
            next = next.insert_row(next.nrow(), Unit::Points(d))?;
        }
        if let Some(d) = grow(left, current.left) {
            next = next.insert_col(0, Unit::Points(d))?;
        }
        if let Some(d) = grow(right, current.right) {
            next = next.insert_col(next.ncol(), Unit::Points(d))?;
        }
        Ok(next)
    }

    /// Row and column tracks resolved into `area`.
    #[must_use]
    pub fn tracks(&self, area: Rect) -> (Vec<Track>, Vec<Track>) {
        (
            resolve_tracks(&self.heights, area.y, area.height),
            resolve_tracks(&self.widths, area.x, area.width),
        )
    }

    /// Rectangle covered by a row/column range.
    fn span_rect(rows: &[Track], cols: &[Track], r: Span, c: Span) -> Rect {
        let top = rows[r.start].start;
        let bottom = rows[r.end - 1].start + rows[r.end - 1].length;
        let left = cols[c.start].start;
        let right = cols[c.end - 1].start + cols[c.end - 1].length;
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Outer rectangle of every cell within `area`, in draw order (by `z`,
    /// ties in insertion order).
    #[must_use]
    pub fn resolve(&self, area: Rect) -> Vec<(&Cell, Rect)> {
        let (rows, cols) = self.tracks(area);
        let mut placed: Vec<(&Cell, Rect)> = self
            .cells
            .iter()
            .map(|cell| {
                let rect = Self::span_rect(
                    &rows,
                    &cols,
                    Span::new(cell.row, cell.row_end()),
                    Span::new(cell.col, cell.col_end()),
                );
                (cell, rect)
            })
            .collect();
        placed.sort_by_key(|(cell, _)| cell.z);
        placed
    }

    /// Rectangle of the panel region within `area`.
    #[must_use]
    pub fn panel_rect(&self, area: Rect) -> Option<Rect> {
        let panel = self.panel?;
        let (rows, cols) = self.tracks(area);
        Some(Self::span_rect(&rows, &cols, panel.rows, panel.cols))
    }

    /// Check the structural invariants: valid track sizes, every cell and
    /// the panel region inside the grid with non-empty spans.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for unit in self.heights.iter().chain(&self.widths) {
            check_unit(*unit)?;
        }
        for cell in &self.cells {
            self.check_cell(cell)?;
        }
        if let Some(p) = self.panel {
            if p.rows.start >= p.rows.end
                || p.cols.start >= p.cols.end
                || p.rows.end > self.nrow()
                || p.cols.end > self.ncol()
            {
                return Err(Error::InvalidTable(format!("panel region {p:?} outside grid")));
            }
        }
        Ok(())
    }

    fn check_cell(&self, cell: &Cell) -> Result<()> {
        if cell.row_span == 0 || cell.col_span == 0 {
            return Err(Error::InvalidTable(format!("cell '{}' has an empty span", cell.name)));
        }
        if cell.row_end() > self.nrow() || cell.col_end() > self.ncol() {
            return Err(Error::InvalidTable(format!(
                "cell '{}' at ({}, {}) span {}x{} outside {}x{} grid",
                cell.name,
                cell.row,
                cell.col,
                cell.row_span,
                cell.col_span,
                self.nrow(),
                self.ncol()
            )));
        }
        Ok(())
    }
}

fn check_unit(unit: Unit) -> Result<()> {
    let v = unit.value();
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTable(format!("track size {unit:?} must be finite and non-negative")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::DataRange;
    use approx::assert_relative_eq;

    fn plot_table() -> LayoutTable {
        LayoutTable::from_renderable(
            Renderable::new(DataRange::UNIT).margins(Insets::new(10.0, 5.0, 30.0, 40.0)),
        )
    }

    #[test]
    fn test_resolve_tracks_mixed() {
        let tracks =
            resolve_tracks(&[Unit::Points(10.0), Unit::Null(1.0), Unit::Null(3.0)], 0.0, 90.0);
        assert_eq!(tracks[0], Track { start: 0.0, length: 10.0 });
        assert_relative_eq!(tracks[1].length, 20.0);
        assert_relative_eq!(tracks[2].start, 30.0);
        assert_relative_eq!(tracks[2].length, 60.0);
    }

    #[test]
    fn test_resolve_tracks_overflow_clamps() {
        let tracks = resolve_tracks(&[Unit::Points(80.0), Unit::Null(1.0)], 0.0, 50.0);
        assert_eq!(tracks[1].length, 0.0);
    }

    #[test]
    fn test_from_renderable_shape() {
        let t = plot_table();
        assert_eq!((t.nrow(), t.ncol()), (3, 3));
        assert_eq!(t.height_sum(), UnitSum { points: 40.0, null: 1.0 });
        assert_eq!(t.outer_margins(), Some(Insets::new(10.0, 5.0, 30.0, 40.0)));
        let panel = t.panel_rect(Rect::new(0.0, 0.0, 245.0, 140.0)).unwrap();
        assert_eq!(panel, Rect::new(40.0, 10.0, 200.0, 100.0));
    }

    #[test]
    fn test_insert_row_below_keeps_geometry() {
        let t = plot_table();
        let grown = t.insert_row(3, Unit::Points(20.0)).unwrap();
        assert_eq!(&grown.heights()[..3], t.heights());
        assert_eq!(grown.panel_region(), t.panel_region());
        assert_eq!(grown.cells()[0].row_span, 3);
    }

    #[test]
    fn test_insert_row_above_shifts() {
        let t = plot_table().insert_row(0, Unit::Points(20.0)).unwrap();
        assert_eq!(t.cells()[0].row, 1);
        assert_eq!(t.panel_region().unwrap().rows, Span::new(2, 3));
    }

    #[test]
    fn test_insert_row_inside_span_grows() {
        let t = plot_table().insert_row(1, Unit::Points(5.0)).unwrap();
        assert_eq!(t.cells()[0].row, 0);
        assert_eq!(t.cells()[0].row_span, 4);
        assert_eq!(t.panel_region().unwrap().rows, Span::new(2, 3));
    }

    #[test]
    fn test_insert_row_out_of_range() {
        assert!(plot_table().insert_row(9, Unit::Null(1.0)).is_err());
        assert!(plot_table().insert_col(0, Unit::Points(-1.0)).is_err());
    }

    #[test]
    fn test_with_cell_bounds() {
        let t = LayoutTable::new(vec![Unit::Null(1.0)], vec![Unit::Null(1.0)]).unwrap();
        assert!(t.with_cell(Cell::new(0, 0, CellContent::Spacer)).is_ok());
        assert!(t.with_cell(Cell::new(0, 1, CellContent::Spacer)).is_err());
        assert!(t.with_cell(Cell::new(0, 0, CellContent::Spacer).span(0, 1)).is_err());
    }

    #[test]
    fn test_new_rejects_negative() {
        let err = LayoutTable::new(vec![Unit::Null(-1.0)], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidTable(_)));
    }

    #[test]
    fn test_pad_margins() {
        let t = plot_table().pad_margins(Some(25.0), None, Some(10.0), Some(60.0)).unwrap();
        let m = t.outer_margins().unwrap();
        assert_relative_eq!(m.top, 25.0);
        assert_relative_eq!(m.bottom, 30.0);
        assert_relative_eq!(m.left, 60.0);
        assert_relative_eq!(m.right, 5.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_pad_margins_without_panel_is_noop() {
        let t = LayoutTable::spacer();
        assert_eq!(t.pad_margins(Some(10.0), None, None, None).unwrap(), t);
    }

    #[test]
    fn test_resolve_orders_by_z() {
        let t = LayoutTable::new(vec![Unit::Null(1.0)], vec![Unit::Null(1.0)])
            .unwrap()
            .with_cell(Cell::new(0, 0, CellContent::Spacer).z(2).name("top"))
            .unwrap()
            .with_cell(Cell::new(0, 0, CellContent::Spacer).name("bottom"))
            .unwrap();
        let names: Vec<&str> =
            t.resolve(Rect::new(0.0, 0.0, 1.0, 1.0)).iter().map(|(c, _)| c.name.as_str()).collect();
        assert_eq!(names, vec!["bottom", "top"]);
    }

    #[test]
    fn test_cell_named() {
        assert!(plot_table().cell_named("plot").is_some());
        assert!(plot_table().cell_named("missing").is_none());
    }
}
