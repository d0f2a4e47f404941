//! Annotation placement.
//!
//! An [`Annotation`] is an immutable description: content, a point in some
//! [`Frame`], justification and style. [`place`] resolves it against a
//! [`CoordTransform`] and a [`TextMeasure`] into a [`PositionedAnnotation`]
//! in surface space.
//!
//! Justification is applied to the measured box after rotation:
//!
//! ```text
//! anchor = (sx - hjust * w, sy - (1 - vjust) * h)
//! ```
//!
//! where `(sx, sy)` is the surface point and `anchor` the top-left corner
//! of the box. `hjust = 0` left-aligns, `vjust = 0` puts the box bottom on
//! the point.

use crate::color::Rgba;
use crate::content::{Content, FontFace, TextStyle};
use crate::coord::{CoordTransform, Frame};
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};
use crate::log::debug;
use crate::measure::TextMeasure;

/// Fractional anchor inside the content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Justification {
    /// Horizontal: 0 = left edge, 1 = right edge.
    pub h: f64,
    /// Vertical: 0 = bottom edge, 1 = top edge.
    pub v: f64,
}

impl Justification {
    /// Centered on both axes.
    pub const CENTER: Self = Self::new(0.5, 0.5);

    /// Create a justification.
    #[must_use]
    pub const fn new(h: f64, v: f64) -> Self {
        Self { h, v }
    }
}

impl Default for Justification {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Top-left corner of a box of `size` justified at `point` (surface space).
#[must_use]
pub fn justify(point: Point, size: Size, just: Justification) -> Point {
    Point::new(point.x - just.h * size.width, point.y - (1.0 - just.v) * size.height)
}

/// A label to be placed: content, position, justification and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    content: Content,
    x: f64,
    y: f64,
    frame: Frame,
    panel: Option<usize>,
    just: Justification,
    style: TextStyle,
}

impl Annotation {
    /// Create an annotation at `(x, y)` in the DATA frame, centered, in
    /// the default style.
    #[must_use]
    pub fn new(content: impl Into<Content>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            frame: Frame::Data,
            panel: None,
            just: Justification::CENTER,
            style: TextStyle::default(),
        }
    }

    /// Set the coordinate frame.
    #[must_use]
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Select a panel of a faceted plot.
    #[must_use]
    pub fn panel(mut self, index: usize) -> Self {
        self.panel = Some(index);
        self
    }

    /// Set horizontal justification.
    #[must_use]
    pub fn hjust(mut self, h: f64) -> Self {
        self.just.h = h;
        self
    }

    /// Set vertical justification.
    #[must_use]
    pub fn vjust(mut self, v: f64) -> Self {
        self.just.v = v;
        self
    }

    /// Set the font face.
    #[must_use]
    pub fn fontface(mut self, face: FontFace) -> Self {
        self.style.face = face;
        self
    }

    /// Set the font size in points.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.style.size = size;
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn angle(mut self, angle: f64) -> Self {
        self.style.angle = angle;
        self
    }

    /// Set the colour.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.style.color = color;
        self
    }

    /// Replace the whole style.
    #[must_use]
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Content.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Position in its frame.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Coordinate frame.
    #[must_use]
    pub fn coord_frame(&self) -> Frame {
        self.frame
    }

    /// Selected panel, if any.
    #[must_use]
    pub fn panel_index(&self) -> Option<usize> {
        self.panel
    }

    /// Justification.
    #[must_use]
    pub fn justification(&self) -> Justification {
        self.just
    }

    /// Text style.
    #[must_use]
    pub fn text_style(&self) -> &TextStyle {
        &self.style
    }
}

/// An annotation resolved onto the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedAnnotation {
    /// Content to draw.
    pub content: Content,
    /// Style to draw it in.
    pub style: TextStyle,
    /// Reference point the annotation was justified against.
    pub point: Point,
    /// Top-left corner of the rotated bounding box.
    pub anchor: Point,
    /// Bounding box after rotation.
    pub size: Size,
    /// Measured size before rotation.
    pub text_size: Size,
}

impl PositionedAnnotation {
    /// Bounding box on the surface.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.anchor.x, self.anchor.y, self.size.width, self.size.height)
    }

    /// Bottom-left corner of the bounding box.
    #[must_use]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.anchor.x, self.anchor.y + self.size.height)
    }

    /// Center of the bounding box; rotation is applied around it.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Resolve `annotation` against `transform`, measuring with `measure`.
///
/// Measurement happens unrotated; the box is then rotated and justified.
/// Neither the annotation nor the transform's source is modified.
///
/// # Errors
///
/// Frame errors from [`CoordTransform::to_canvas`] and measurement errors
/// from the collaborator propagate unchanged.
pub fn place(
    annotation: &Annotation,
    transform: &CoordTransform,
    measure: &dyn TextMeasure,
) -> Result<PositionedAnnotation> {
    let (x, y) = annotation.position();
    let point = transform.to_surface_point(annotation.frame, x, y, annotation.panel)?;
    let text_size = measure.measure(&annotation.content, &annotation.style)?;
    let size = text_size.rotated(annotation.style.angle);
    let anchor = justify(point, size, annotation.just);
    debug!(?point, ?anchor, "placed annotation");
    Ok(PositionedAnnotation {
        content: annotation.content.clone(),
        style: annotation.style,
        point,
        anchor,
        size,
        text_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Expr;
    use crate::coord::DataRange;
    use crate::error::Error;
    use crate::geometry::Insets;
    use crate::measure::ApproxMetrics;
    use crate::plot::Renderable;
    use approx::assert_relative_eq;

    /// Measures everything as a fixed box.
    struct FixedBox(Size);

    impl TextMeasure for FixedBox {
        fn measure(&self, _: &Content, _: &TextStyle) -> Result<Size> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_justify_bottom_left() {
        let a = justify(Point::new(10.0, 50.0), Size::new(30.0, 8.0), Justification::new(0.0, 0.0));
        assert_eq!(a, Point::new(10.0, 42.0));
    }

    #[test]
    fn test_justify_top_right() {
        let a = justify(Point::new(10.0, 50.0), Size::new(30.0, 8.0), Justification::new(1.0, 1.0));
        assert_eq!(a, Point::new(-20.0, 50.0));
    }

    #[test]
    fn test_justify_center() {
        let a = justify(Point::new(10.0, 50.0), Size::new(30.0, 8.0), Justification::CENTER);
        assert_eq!(a, Point::new(-5.0, 46.0));
    }

    #[test]
    fn test_place_canvas_frame() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 200.0, 100.0));
        let label = Annotation::new("hi", 0.5, 0.5).frame(Frame::CanvasNormalized);
        let placed = place(&label, &t, &FixedBox(Size::new(20.0, 10.0))).unwrap();
        assert_eq!(placed.point, Point::new(100.0, 50.0));
        assert_eq!(placed.anchor, Point::new(90.0, 45.0));
    }

    #[test]
    fn test_place_data_frame_bottom_left() {
        let plot = Renderable::new(DataRange::new(10.0, 500.0, 0.0, 1000.0))
            .margins(Insets::new(10.0, 10.0, 30.0, 40.0));
        let t = CoordTransform::for_renderable(&plot, Rect::new(0.0, 0.0, 250.0, 200.0));
        let label = Annotation::new("x", 20.0, 400.0).hjust(0.0).vjust(0.0);
        let placed = place(&label, &t, &ApproxMetrics::default()).unwrap();
        let target = t.to_surface_point(Frame::Data, 20.0, 400.0, None).unwrap();
        assert_relative_eq!(placed.bottom_left().x, target.x, epsilon = 1e-9);
        assert_relative_eq!(placed.bottom_left().y, target.y, epsilon = 1e-9);
    }

    #[test]
    fn test_place_rotation_swaps_box() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        let label = Annotation::new("wide", 0.5, 0.5)
            .frame(Frame::CanvasNormalized)
            .angle(90.0)
            .hjust(0.0)
            .vjust(0.0);
        let placed = place(&label, &t, &FixedBox(Size::new(40.0, 10.0))).unwrap();
        assert_eq!(placed.text_size, Size::new(40.0, 10.0));
        assert_relative_eq!(placed.size.width, 10.0, epsilon = 1e-9);
        assert_relative_eq!(placed.size.height, 40.0, epsilon = 1e-9);
        assert_relative_eq!(placed.anchor.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_place_math_content() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        let label = Annotation::new(Expr::sup(Expr::lit("R"), Expr::lit("2")), 0.0, 0.0)
            .frame(Frame::PanelNormalized);
        let placed = place(&label, &t, &ApproxMetrics::default()).unwrap();
        assert!(matches!(placed.content, Content::Math(_)));
    }

    #[test]
    fn test_place_propagates_measure_error() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        let label = Annotation::new(Expr::sym("bogus"), 0.5, 0.5).frame(Frame::PanelNormalized);
        let err = place(&label, &t, &ApproxMetrics::default()).unwrap_err();
        assert!(matches!(err, Error::ContentRender(_)));
    }

    #[test]
    fn test_place_data_without_renderable() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        let err = place(&Annotation::new("a", 1.0, 1.0), &t, &ApproxMetrics::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFrame(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let a = Annotation::new("a", 1.0, 2.0);
        assert_eq!(a.coord_frame(), Frame::Data);
        assert_eq!(a.justification(), Justification::CENTER);
        assert_eq!(a.text_style().size, 14.0);
        assert_eq!(a.position(), (1.0, 2.0));
        assert_eq!(a.panel_index(), None);
    }
}
