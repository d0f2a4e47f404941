//! Grid composition.
//!
//! [`compose_grid`] arranges figures row-major on an `nrow × ncol` grid of
//! null-weighted tracks. Row `i` receives exactly
//! `rel_heights[i] / Σ rel_heights` of the height and column `j`
//! `rel_widths[j] / Σ rel_widths` of the width; nothing inside the figures
//! is rescaled.
//!
//! With alignment on, the fixed margins around each plot's panel are padded
//! to the largest margin in the same grid row (top/bottom) or column
//! (left/right), so panel edges line up across the grid.

use std::sync::Arc;

use crate::annotation::Annotation;
use crate::content::{FontFace, TextStyle};
use crate::coord::Frame;
use crate::error::{Error, Result};
use crate::geometry::Insets;
use crate::log::debug;
use crate::plot::Figure;
use crate::table::{Cell, CellContent, LayoutTable, Unit};
use crate::theme::Theme;

/// Per-item tag labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tags {
    /// No tags.
    #[default]
    None,
    /// `A`, `B`, …, `Z`, `AA`, `AB`, …
    Upper,
    /// `a`, `b`, …
    Lower,
    /// Explicit labels in item order.
    Custom(Vec<String>),
}

impl Tags {
    /// Labels for `n` items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGridSpec`] if a custom list is longer than
    /// the number of items.
    pub fn labels(&self, n: usize) -> Result<Vec<String>> {
        match self {
            Tags::None => Ok(Vec::new()),
            Tags::Upper => Ok((0..n).map(|i| alpha_label(i, true)).collect()),
            Tags::Lower => Ok((0..n).map(|i| alpha_label(i, false)).collect()),
            Tags::Custom(labels) if labels.len() > n => Err(Error::InvalidGridSpec(format!(
                "{} tags for {n} items",
                labels.len()
            ))),
            Tags::Custom(labels) => Ok(labels.clone()),
        }
    }
}

/// Spreadsheet-style letter sequence: 0 → `A`, 25 → `Z`, 26 → `AA`.
#[must_use]
pub fn alpha_label(index: usize, upper: bool) -> String {
    let base = if upper { b'A' } else { b'a' };
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(base + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

/// Panel alignment across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// No padding.
    None,
    /// Align top and bottom panel edges within each grid row.
    Horizontal,
    /// Align left and right panel edges within each grid column.
    Vertical,
    /// Both.
    #[default]
    Both,
}

impl Align {
    fn rows(self) -> bool {
        matches!(self, Align::Horizontal | Align::Both)
    }

    fn cols(self) -> bool {
        matches!(self, Align::Vertical | Align::Both)
    }
}

/// Requested arrangement for [`compose_grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    items: Vec<Figure>,
    nrow: Option<usize>,
    ncol: Option<usize>,
    rel_heights: Option<Vec<f64>>,
    rel_widths: Option<Vec<f64>>,
    tags: Tags,
    tag_offset: (f64, f64),
    tag_style: TextStyle,
    align: Align,
}

impl GridSpec {
    /// Arrangement of `items` with inferred shape, unit sizes, no tags and
    /// full alignment.
    #[must_use]
    pub fn new<I, F>(items: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Figure>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            nrow: None,
            ncol: None,
            rel_heights: None,
            rel_widths: None,
            tags: Tags::None,
            tag_offset: (0.05, 0.05),
            tag_style: TextStyle::default().face(FontFace::Bold),
            align: Align::Both,
        }
    }

    /// Take tag style and offset from a theme.
    #[must_use]
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.tag_style = theme.tag_style();
        self.tag_offset = theme.tag_offset;
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(mut self, nrow: usize) -> Self {
        self.nrow = Some(nrow);
        self
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(mut self, ncol: usize) -> Self {
        self.ncol = Some(ncol);
        self
    }

    /// Relative row heights (one per row).
    #[must_use]
    pub fn rel_heights(mut self, heights: Vec<f64>) -> Self {
        self.rel_heights = Some(heights);
        self
    }

    /// Relative column widths (one per column).
    #[must_use]
    pub fn rel_widths(mut self, widths: Vec<f64>) -> Self {
        self.rel_widths = Some(widths);
        self
    }

    /// Tag labels.
    #[must_use]
    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Tag offset from the cell's top-left corner, as fractions of the cell.
    #[must_use]
    pub fn tag_offset(mut self, dx: f64, dy: f64) -> Self {
        self.tag_offset = (dx, dy);
        self
    }

    /// Tag text style.
    #[must_use]
    pub fn tag_style(mut self, style: TextStyle) -> Self {
        self.tag_style = style;
        self
    }

    /// Panel alignment.
    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Grid shape for `n` items. With neither dimension given, picks the
/// smallest near-square grid, preferring extra columns over extra rows.
///
/// # Errors
///
/// Returns [`Error::InvalidGridSpec`] for zero items, a zero dimension,
/// more items than cells, or more rows or columns than items.
pub fn infer_shape(n: usize, nrow: Option<usize>, ncol: Option<usize>) -> Result<(usize, usize)> {
    if n == 0 {
        return Err(Error::InvalidGridSpec("no items to arrange".into()));
    }
    if nrow == Some(0) || ncol == Some(0) {
        return Err(Error::InvalidGridSpec("grid dimensions must be positive".into()));
    }
    let (nrow, ncol) = match (nrow, ncol) {
        (Some(r), Some(c)) => (r, c),
        (Some(r), None) => (r, n.div_ceil(r)),
        (None, Some(c)) => (n.div_ceil(c), c),
        (None, None) => {
            let mut c = 1;
            while c * c < n {
                c += 1;
            }
            (n.div_ceil(c), c)
        }
    };
    let cells = nrow
        .checked_mul(ncol)
        .ok_or_else(|| Error::InvalidGridSpec(format!("{nrow}x{ncol} grid is too large")))?;
    if n > cells {
        return Err(Error::InvalidGridSpec(format!(
            "{n} items exceed {nrow}x{ncol} cells"
        )));
    }
    if nrow > n || ncol > n {
        return Err(Error::InvalidGridSpec(format!(
            "{nrow}x{ncol} grid has more rows or columns than its {n} items"
        )));
    }
    Ok((nrow, ncol))
}

fn weights(given: Option<&[f64]>, len: usize, what: &str) -> Result<Vec<f64>> {
    let Some(given) = given else {
        return Ok(vec![1.0; len]);
    };
    if given.len() != len {
        return Err(Error::InvalidGridSpec(format!(
            "{} {what} given for {len} tracks",
            given.len()
        )));
    }
    if let Some(bad) = given.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(Error::InvalidGridSpec(format!("{what} must be positive, got {bad}")));
    }
    Ok(given.to_vec())
}

// Largest margin side among the items selected by `pick`.
fn max_side(margins: &[Option<Insets>], pick: impl Fn(usize) -> bool, side: impl Fn(&Insets) -> f64) -> Option<f64> {
    margins
        .iter()
        .enumerate()
        .filter(|(k, _)| pick(*k))
        .filter_map(|(_, m)| m.as_ref().map(&side))
        .reduce(f64::max)
}

// Pads each table's panel margins to the row/column maxima.
fn align_tables(tables: Vec<Option<LayoutTable>>, ncol: usize, align: Align) -> Result<Vec<Option<LayoutTable>>> {
    if align == Align::None {
        return Ok(tables);
    }
    let margins: Vec<Option<Insets>> =
        tables.iter().map(|t| t.as_ref().and_then(LayoutTable::outer_margins)).collect();

    tables
        .into_iter()
        .enumerate()
        .map(|(k, table)| {
            let Some(table) = table else { return Ok(None) };
            let (row, col) = (k / ncol, k % ncol);
            let same_row = |j: usize| j / ncol == row;
            let same_col = |j: usize| j % ncol == col;
            let (top, bottom) = if align.rows() {
                (max_side(&margins, same_row, |m| m.top), max_side(&margins, same_row, |m| m.bottom))
            } else {
                (None, None)
            };
            let (left, right) = if align.cols() {
                (max_side(&margins, same_col, |m| m.left), max_side(&margins, same_col, |m| m.right))
            } else {
                (None, None)
            };
            debug!(k, ?top, ?right, ?bottom, ?left, "aligning grid item");
            table.pad_margins(top, right, bottom, left).map(Some)
        })
        .collect()
}

/// Arrange the figures of `spec` into one layout table.
///
/// # Errors
///
/// Returns [`Error::InvalidGridSpec`] when the item count exceeds the
/// grid, relative size vectors have the wrong length or a non-positive
/// entry, or custom tags outnumber the items.
pub fn compose_grid(spec: &GridSpec) -> Result<LayoutTable> {
    let n = spec.items.len();
    let (nrow, ncol) = infer_shape(n, spec.nrow, spec.ncol)?;
    let heights = weights(spec.rel_heights.as_deref(), nrow, "relative heights")?;
    let widths = weights(spec.rel_widths.as_deref(), ncol, "relative widths")?;
    let filled = spec.items.iter().filter(|f| !f.is_empty()).count();
    let labels = spec.tags.labels(filled)?;
    debug!(n, nrow, ncol, "composing grid");

    let tables: Vec<Option<LayoutTable>> = spec
        .items
        .iter()
        .map(|item| (!item.is_empty()).then(|| item.clone().into_table()))
        .collect();
    let tables = align_tables(tables, ncol, spec.align)?;

    let mut grid = LayoutTable::new(
        heights.into_iter().map(Unit::Null).collect(),
        widths.into_iter().map(Unit::Null).collect(),
    )?;
    let mut labels = labels.into_iter();
    for k in 0..nrow * ncol {
        let (row, col) = (k / ncol, k % ncol);
        let slot = tables.get(k).cloned().flatten();
        let content = match slot {
            Some(table) => CellContent::Table(Arc::new(table)),
            None => CellContent::Spacer,
        };
        let occupied = matches!(content, CellContent::Table(_));
        grid = grid.with_cell(Cell::new(row, col, content).name(format!("item-{k}")))?;

        if !occupied {
            continue;
        }
        if let Some(label) = labels.next() {
            let (dx, dy) = spec.tag_offset;
            let tag = Annotation::new(label.clone(), dx, 1.0 - dy)
                .frame(Frame::PanelNormalized)
                .hjust(0.0)
                .vjust(1.0)
                .style(spec.tag_style);
            grid = grid.with_cell(
                Cell::new(row, col, CellContent::Label(tag)).z(1).name(format!("tag-{label}")),
            )?;
        }
    }
    Ok(grid)
}

/// Stack a title above `body` as a two-row grid with relative heights
/// `[title_weight, 1]`: the title gets `title_weight / (title_weight + 1)`
/// of the height.
///
/// # Errors
///
/// Returns [`Error::InvalidGridSpec`] if `title_weight` is not positive.
pub fn with_title(title: Annotation, body: impl Into<Figure>, title_weight: f64) -> Result<LayoutTable> {
    let spec = GridSpec::new([Figure::Table(LayoutTable::from_label(title)), body.into()])
        .ncol(1)
        .rel_heights(vec![title_weight, 1.0])
        .align(Align::None);
    compose_grid(&spec)
}
