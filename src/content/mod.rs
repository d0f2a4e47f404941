//! Label content and text style.
//!
//! Content is either plain text or a [`math::Expr`] tree. Both go through
//! identical placement math; only the text-shaping collaborator looks
//! inside an expression.

pub mod math;

use std::fmt;
use std::str::FromStr;

use crate::color::Rgba;
use crate::error::{Error, Result};

pub use math::{Expr, Operator};

/// What a label shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Plain text. Newlines start new lines.
    Text(String),
    /// Structured mathematical expression.
    Math(Expr),
}

impl Content {
    /// Plain text content.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Content::Text(s.into())
    }

    /// True when there is nothing to draw (blank text or an expression
    /// without any glyphs).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(s) => s.trim().is_empty(),
            Content::Math(expr) => expr.is_empty(),
        }
    }

    /// Flatten to a single string for backends without math layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentRender`] for unknown math symbols.
    pub fn plain_text(&self) -> Result<String> {
        match self {
            Content::Text(s) => Ok(s.clone()),
            Content::Math(expr) => expr.plain_text(),
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<Expr> for Content {
    fn from(expr: Expr) -> Self {
        Content::Math(expr)
    }
}

/// Font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum FontFace {
    /// Regular weight, upright.
    #[default]
    Plain,
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Bold italic.
    BoldItalic,
}

impl FontFace {
    /// Whether the face is bold.
    #[must_use]
    pub fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldItalic)
    }

    /// Whether the face is italic.
    #[must_use]
    pub fn is_italic(self) -> bool {
        matches!(self, FontFace::Italic | FontFace::BoldItalic)
    }
}

impl FromStr for FontFace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(FontFace::Plain),
            "bold" => Ok(FontFace::Bold),
            "italic" => Ok(FontFace::Italic),
            "bold.italic" | "bold_italic" => Ok(FontFace::BoldItalic),
            other => Err(Error::ContentRender(format!("unknown font face '{other}'"))),
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontFace::Plain => "plain",
            FontFace::Bold => "bold",
            FontFace::Italic => "italic",
            FontFace::BoldItalic => "bold.italic",
        };
        f.write_str(name)
    }
}

/// Text style: face, size in points, rotation in degrees, colour and line
/// height as a multiple of the size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font face.
    pub face: FontFace,
    /// Font size in points.
    pub size: f64,
    /// Counter-clockwise rotation in degrees.
    pub angle: f64,
    /// Text colour.
    pub color: Rgba,
    /// Line height as a multiple of `size`.
    pub line_height: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            face: FontFace::Plain,
            size: 14.0,
            angle: 0.0,
            color: Rgba::BLACK,
            line_height: 1.2,
        }
    }
}

impl TextStyle {
    /// Set the font face.
    #[must_use]
    pub fn face(mut self, face: FontFace) -> Self {
        self.face = face;
        self
    }

    /// Set the font size in points.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Set the colour.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Height of one text line in points.
    #[must_use]
    pub fn line_points(&self) -> f64 {
        self.size * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_empty() {
        assert!(Content::text("").is_empty());
        assert!(Content::text("  \n").is_empty());
        assert!(!Content::text("caption").is_empty());
        assert!(Content::Math(Expr::Row(vec![])).is_empty());
        assert!(!Content::from(Expr::sym("alpha")).is_empty());
    }

    #[test]
    fn test_font_face_parse() {
        assert_eq!("bold".parse::<FontFace>().unwrap(), FontFace::Bold);
        assert_eq!("bold.italic".parse::<FontFace>().unwrap(), FontFace::BoldItalic);
        assert!("heavy".parse::<FontFace>().is_err());
    }

    #[test]
    fn test_font_face_display_round_trip() {
        for face in [FontFace::Plain, FontFace::Bold, FontFace::Italic, FontFace::BoldItalic] {
            assert_eq!(face.to_string().parse::<FontFace>().unwrap(), face);
        }
    }

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.size, 14.0);
        assert_eq!(style.angle, 0.0);
        assert!((style.line_points() - 16.8).abs() < 1e-9);
    }
}
