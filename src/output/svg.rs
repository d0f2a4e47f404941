//! SVG output surface.
//!
//! Collects rectangles and placed labels as SVG elements and serializes
//! them into a standalone document. Labels are written centred on their
//! bounding box and rotated about its centre, so the box computed during
//! placement is exactly where the text lands.

use crate::annotation::PositionedAnnotation;
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::measure::TextMeasure;
use crate::plot::Figure;
use crate::render::{render, Surface};
use crate::theme::Theme;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG surface.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
    },
    /// Text, centred on `(x, y)`; one entry per line
    Text {
        x: f64,
        y: f64,
        lines: Vec<String>,
        font_size: f64,
        line_height: f64,
        fill: Rgba,
        bold: bool,
        italic: bool,
        rotate: f64,
    },
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgSurface {
    /// Create an empty surface with given dimensions in points.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, elements: Vec::new() }
    }

    /// Render `figure` into a new surface of the given size.
    ///
    /// # Errors
    ///
    /// Propagates [`render`] errors.
    pub fn from_figure(
        figure: &Figure,
        width: u32,
        height: u32,
        theme: &Theme,
        measure: &dyn TextMeasure,
    ) -> Result<Self> {
        let mut surface = Self::new(width, height);
        render(figure, surface.size(), theme, measure, &mut surface)?;
        Ok(surface)
    }

    /// Surface size in points.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

impl Surface for SvgSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.elements.push(SvgElement::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        self.elements.push(SvgElement::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        });
    }

    fn text(&mut self, label: &PositionedAnnotation) -> Result<()> {
        let text = label.content.plain_text()?;
        let center = label.center();
        let style = &label.style;
        self.elements.push(SvgElement::Text {
            x: center.x,
            y: center.y,
            lines: text.lines().map(str::to_owned).collect(),
            font_size: style.size,
            line_height: style.line_points(),
            fill: style.color,
            bold: style.face.is_bold(),
            italic: style.face.is_italic(),
            rotate: style.angle,
        });
        Ok(())
    }
}

impl batuta_common::display::WithDimensions for SvgSurface {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Shortest decimal form with at most two fractional digits.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="{}""#, s.to_css(), num(*stroke_width)))
                .unwrap_or_default();
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill_attr}"{stroke_attr}/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height)
            )
        }
        SvgElement::Text { x, y, lines, font_size, line_height, fill, bold, italic, rotate } => {
            let (x, y) = (num(*x), num(*y));
            let mut attrs = format!(
                r#"x="{x}" y="{y}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif""#,
                num(*font_size),
                fill.to_css()
            );
            if *bold {
                attrs.push_str(r#" font-weight="bold""#);
            }
            if *italic {
                attrs.push_str(r#" font-style="italic""#);
            }
            // SVG rotates clockwise in a y-down space
            if *rotate != 0.0 {
                let _ = write!(attrs, r#" transform="rotate({} {x} {y})""#, num(-rotate));
            }
            let body = match lines.as_slice() {
                [single] => escape_xml(single),
                _ => {
                    let first = -(lines.len().saturating_sub(1) as f64) * line_height / 2.0;
                    lines
                        .iter()
                        .enumerate()
                        .map(|(i, line)| {
                            let dy = if i == 0 { first } else { *line_height };
                            format!(r#"<tspan x="{x}" dy="{}">{}</tspan>"#, num(dy), escape_xml(line))
                        })
                        .collect()
                }
            };
            format!("<text {attrs}>{body}</text>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{place, Annotation};
    use crate::content::{Expr, FontFace, Operator};
    use crate::coord::{CoordTransform, DataRange, Frame};
    use crate::error::Error;
    use crate::measure::ApproxMetrics;
    use crate::plot::Renderable;
    use batuta_common::display::WithDimensions;

    fn placed(annotation: &Annotation) -> PositionedAnnotation {
        let transform = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        place(annotation, &transform, &ApproxMetrics::default()).unwrap()
    }

    #[test]
    fn test_svg_surface_new() {
        let svg = SvgSurface::new(800, 600).render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_svg_rects() {
        let mut surface = SvgSurface::new(100, 100);
        surface.fill_rect(Rect::new(10.0, 20.0, 30.0, 40.5), Rgba::rgb(255, 0, 0));
        surface.stroke_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::BLACK, 1.5);
        let svg = surface.render();

        assert!(svg.contains(r#"<rect x="10" y="20" width="30" height="40.5" fill="rgb(255,0,0)"/>"#));
        assert!(svg.contains(r#"fill="none" stroke="rgb(0,0,0)" stroke-width="1.5""#));
    }

    #[test]
    fn test_svg_text_centred_on_box() {
        let mut surface = SvgSurface::new(100, 100);
        let label = placed(
            &Annotation::new("Hi", 0.0, 1.0).frame(Frame::PanelNormalized).hjust(0.0).vjust(1.0),
        );
        surface.text(&label).unwrap();
        match &surface.elements()[0] {
            SvgElement::Text { x, y, lines, .. } => {
                assert!((x - label.size.width / 2.0).abs() < 1e-9);
                assert!((y - label.size.height / 2.0).abs() < 1e-9);
                assert_eq!(lines, &vec!["Hi".to_string()]);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_svg_text_style_attributes() {
        let mut surface = SvgSurface::new(100, 100);
        let label = placed(
            &Annotation::new("R", 0.5, 0.5)
                .frame(Frame::PanelNormalized)
                .fontface(FontFace::BoldItalic)
                .angle(90.0)
                .size(12.0),
        );
        surface.text(&label).unwrap();
        let svg = surface.render();

        assert!(svg.contains("font-size=\"12\""));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("transform=\"rotate(-90 50 50)\""));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut surface = SvgSurface::new(100, 100);
        let label = placed(&Annotation::new("<script>&</script>", 0.5, 0.5).frame(Frame::PanelNormalized));
        surface.text(&label).unwrap();
        let svg = surface.render();

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;&amp;"));
    }

    #[test]
    fn test_svg_multiline_uses_tspans() {
        let mut surface = SvgSurface::new(100, 100);
        let label = placed(&Annotation::new("a\nb", 0.5, 0.5).frame(Frame::PanelNormalized).size(10.0));
        surface.text(&label).unwrap();
        let svg = surface.render();

        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains(r#"dy="-6""#));
        assert!(svg.contains(r#"dy="12""#));
    }

    #[test]
    fn test_svg_math_plain_fallback() {
        let mut surface = SvgSurface::new(100, 100);
        let expr = Expr::op(Operator::Equals, Expr::sup(Expr::lit("R"), Expr::lit("2")), Expr::lit("0.75"));
        let label = placed(&Annotation::new(expr, 0.5, 0.5).frame(Frame::PanelNormalized));
        surface.text(&label).unwrap();
        assert!(surface.render().contains("R² = 0.75"));
    }

    #[test]
    fn test_svg_unknown_symbol_fails() {
        let mut surface = SvgSurface::new(100, 100);
        let label = PositionedAnnotation {
            content: Expr::sym("nope").into(),
            ..placed(&Annotation::new("x", 0.5, 0.5).frame(Frame::PanelNormalized))
        };
        assert!(matches!(surface.text(&label), Err(Error::ContentRender(_))));
    }

    #[test]
    fn test_svg_from_figure() {
        let plot = Renderable::new(DataRange::UNIT).with_label(Annotation::new("mid", 0.5, 0.5));
        let surface =
            SvgSurface::from_figure(&plot.into(), 200, 100, &Theme::grey(), &ApproxMetrics::default()).unwrap();
        // background, panel, label
        assert_eq!(surface.elements().len(), 3);
        assert!(surface.render().contains(">mid</text>"));
    }

    #[test]
    fn test_with_dimensions() {
        let mut surface = SvgSurface::default();
        surface.set_dimensions(320, 240);
        assert_eq!(surface.size(), Size::new(320.0, 240.0));
        assert!(surface.render().contains("viewBox=\"0 0 320 240\""));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(40.5), "40.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        let mut surface = SvgSurface::new(50, 50);
        surface.fill_rect(Rect::new(0.0, 0.0, 50.0, 50.0), Rgba::WHITE);
        surface.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.contains("<rect"));
    }
}
