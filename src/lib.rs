//! # ggcompose
//!
//! Annotation placement and figure composition for grammar-of-graphics
//! plots.
//!
//! Plots come in as opaque [`Renderable`]s with known margins and panel
//! geometry. On top of them this crate:
//!
//! - maps points between data, panel and canvas coordinates,
//! - places justified, rotated text and math labels,
//! - appends caption rows to a plot's layout table without disturbing its
//!   panel,
//! - arranges plots and tables into aligned grids with relative sizing,
//!   panel tags and joint titles.
//!
//! Every operation is a pure function returning a new value. The final
//! [`LayoutTable`] is drawn through the [`render::Surface`] seam, for
//! example into SVG with [`output::SvgSurface`].
//!
//! ## Quick Start
//!
//! ```rust
//! use ggcompose::prelude::*;
//!
//! let plot = Renderable::new(DataRange::new(10.0, 500.0, 0.0, 1000.0))
//!     .with_label(draw_label("peak", 20.0, 400.0).hjust(0.0).vjust(0.0));
//! let metrics = ApproxMetrics::default();
//! let captioned = add_sub(plot.clone(), &Caption::new("Figure 1"), &metrics)?;
//! let grid = compose_grid(&GridSpec::new([Figure::from(captioned), plot.into()]).tags(Tags::Upper))?;
//!
//! let svg = SvgSurface::from_figure(&grid.into(), 800, 400, &Theme::default(), &metrics)?;
//! assert!(svg.render().contains(">A</text>"));
//! # Ok::<(), ggcompose::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing`: debug logging of layout decisions through `tracing`
//! - `config`: YAML theme files (`Theme::parse`, `Theme::load`)
//! - `full`: All features enabled
//!
//! ## References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." *JCGS* 19(1).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

mod log;

// ============================================================================
// Core Modules
// ============================================================================

/// Colour values.
pub mod color;

/// Geometric primitives in surface space.
pub mod geometry;

/// Linear scales between data and normalized coordinates.
pub mod scale;

/// Text and math label content, text styles.
pub mod content;

/// Text measurement.
pub mod measure;

// ============================================================================
// Composition Modules
// ============================================================================

/// Coordinate frames and transforms.
pub mod coord;

/// Annotation placement.
pub mod annotation;

/// Renderable plots and figures.
pub mod plot;

/// Layout tables.
pub mod table;

/// Caption rows.
pub mod caption;

/// Grid composition.
pub mod grid;

/// Theme configuration.
pub mod theme;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Drawing composed figures onto surfaces.
pub mod render;

/// Output surfaces (SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for composition operations.
pub mod error;

pub use annotation::Annotation;
pub use caption::add_sub;
pub use error::{Error, Result};
pub use grid::compose_grid;
pub use plot::{Figure, Renderable};
pub use table::LayoutTable;

/// Label at `(x, y)` in the DATA frame, centred, 14pt plain.
///
/// Chain [`Annotation`] builders to change the frame, justification or
/// style.
#[must_use]
pub fn draw_label(content: impl Into<content::Content>, x: f64, y: f64) -> Annotation {
    Annotation::new(content, x, y)
}

/// Wrap a figure so CANVAS_NORMALIZED labels can be layered over it with
/// [`Renderable::with_label`].
#[must_use]
pub fn to_canvas(figure: impl Into<Figure>) -> Renderable {
    Renderable::canvas(figure)
}

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use ggcompose::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotation::{place, Annotation, Justification, PositionedAnnotation};
    pub use crate::caption::{add_sub, Caption, CaptionLocation, Length};
    pub use crate::color::Rgba;
    pub use crate::content::{Content, Expr, FontFace, Operator, TextStyle};
    pub use crate::coord::{CoordTransform, DataRange, Frame, YOrigin};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Insets, Point, Rect, Size};
    pub use crate::grid::{compose_grid, with_title, Align, GridSpec, Tags};
    pub use crate::measure::{ApproxMetrics, TextMeasure};
    pub use crate::output::SvgSurface;
    pub use crate::plot::{Figure, Panel, Renderable};
    pub use crate::render::{render, DisplayList, Surface};
    pub use crate::table::{Cell, CellContent, LayoutTable, Unit};
    pub use crate::theme::Theme;
    pub use crate::{draw_label, to_canvas};
    pub use batuta_common::display::WithDimensions;
}
