//! Error types for ggcompose operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transforming coordinates, placing
/// annotations or composing layout tables.
#[derive(Error, Debug)]
pub enum Error {
    /// The coordinate context is missing or ambiguous (e.g. a DATA point
    /// without a renderable, or a faceted plot without a panel index).
    #[error("Invalid coordinate frame: {0}")]
    InvalidFrame(String),

    /// A data axis spans zero width or height.
    #[error("Degenerate {axis} range: [{min}, {max}]")]
    DegenerateRange {
        /// Axis name (`"x"` or `"y"`).
        axis: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Caption padding is negative or not finite.
    #[error("Invalid padding: {0}")]
    InvalidPadding(f64),

    /// Caption content is empty.
    #[error("Empty content")]
    EmptyContent,

    /// Grid shape, item count or relative sizes do not fit together.
    #[error("Invalid grid spec: {0}")]
    InvalidGridSpec(String),

    /// The text-shaping collaborator could not measure or lay out content.
    #[error("Content render error: {0}")]
    ContentRender(String),

    /// A layout table violates its structural invariants.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// I/O error (file export).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Theme configuration could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number (1-based, 0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },
}
