//! Output surfaces.

mod svg;

pub use svg::{SvgElement, SvgSurface};
