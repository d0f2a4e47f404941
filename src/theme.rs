//! Theme configuration.
//!
//! Controls the non-data appearance of composed figures and the defaults
//! picked up by captions and grid tags. With the `config` feature a theme
//! can be loaded from YAML; missing keys fall back to [`Theme::default`].

use crate::color::Rgba;
use crate::content::{FontFace, TextStyle};
#[cfg(feature = "config")]
use crate::error::{Error, Result};

/// Theme specification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Theme {
    /// Canvas background colour.
    pub background: Rgba,
    /// Panel background colour.
    pub panel_background: Rgba,
    /// Panel border colour, if drawn.
    pub panel_border: Option<Rgba>,
    /// Whether panels are drawn at all (plots with only labels on top).
    pub show_panels: bool,
    /// Default text colour.
    pub text_color: Rgba,
    /// Default text size in points.
    pub text_size: f64,
    /// Line height as a multiple of the text size.
    pub line_height: f64,
    /// Caption padding above and below, in lines.
    pub caption_padding: f64,
    /// Grid tag size in points.
    pub tag_size: f64,
    /// Grid tag font face.
    pub tag_face: FontFace,
    /// Grid tag offset from the top-left corner of its cell, as fractions.
    pub tag_offset: (f64, f64),
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl Theme {
    /// Grey panels on white (ggplot2 default-like).
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            panel_border: None,
            show_panels: true,
            text_color: Rgba::rgb(50, 50, 50),
            text_size: 14.0,
            line_height: 1.2,
            caption_padding: 1.0,
            tag_size: 14.0,
            tag_face: FontFace::Bold,
            tag_offset: (0.05, 0.05),
        }
    }

    /// White panels with a thin border.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            panel_border: Some(Rgba::rgb(200, 200, 200)),
            text_color: Rgba::BLACK,
            ..Self::grey()
        }
    }

    /// No panels, transparent background.
    #[must_use]
    pub fn void() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            show_panels: false,
            text_color: Rgba::BLACK,
            ..Self::grey()
        }
    }

    /// Set the text size.
    #[must_use]
    pub fn text_size(mut self, size: f64) -> Self {
        self.text_size = size;
        self
    }

    /// Set the tag offset.
    #[must_use]
    pub fn tag_offset(mut self, dx: f64, dy: f64) -> Self {
        self.tag_offset = (dx, dy);
        self
    }

    /// Default style for labels and captions.
    #[must_use]
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            face: FontFace::Plain,
            size: self.text_size,
            angle: 0.0,
            color: self.text_color,
            line_height: self.line_height,
        }
    }

    /// Style for grid tags.
    #[must_use]
    pub fn tag_style(&self) -> TextStyle {
        TextStyle { face: self.tag_face, size: self.tag_size, ..self.text_style() }
    }

    /// Parse a theme from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the line number on failure.
    #[cfg(feature = "config")]
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::ConfigParse {
            line: e.location().map_or(0, |l| l.line()),
            message: e.to_string(),
        })
    }

    /// Load a theme from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::ConfigParse`] if it does not parse.
    #[cfg(feature = "config")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_grey() {
        assert_eq!(Theme::default(), Theme::grey());
    }

    #[test]
    fn test_tag_style() {
        let style = Theme::grey().tag_style();
        assert_eq!(style.face, FontFace::Bold);
        assert_eq!(style.size, 14.0);
    }

    #[test]
    fn test_presets_differ() {
        assert!(Theme::minimal().panel_border.is_some());
        assert!(!Theme::void().show_panels);
    }

    #[test]
    fn test_builder() {
        let theme = Theme::grey().text_size(11.0).tag_offset(0.0, 0.1);
        assert_eq!(theme.text_style().size, 11.0);
        assert_eq!(theme.tag_offset, (0.0, 0.1));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_parse_partial_yaml() {
        let theme = Theme::parse("text_size: 10.0\ntag_face: italic\n").unwrap();
        assert_eq!(theme.text_size, 10.0);
        assert_eq!(theme.tag_face, FontFace::Italic);
        assert_eq!(theme.line_height, 1.2);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_parse_error_reports_line() {
        let err = Theme::parse("text_size: 10.0\ntag_size: [oops\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.yaml");
        std::fs::write(&path, "caption_padding: 0.5\n").unwrap();
        assert_eq!(Theme::load(&path).unwrap().caption_padding, 0.5);
    }
}
