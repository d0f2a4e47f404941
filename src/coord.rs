//! Coordinate frames and the transform between them.
//!
//! Three frames are exposed to callers, all Cartesian with y pointing up:
//!
//! - [`Frame::Data`]: the plot's own data coordinates, valid only with a
//!   renderable whose panel ranges are known.
//! - [`Frame::PanelNormalized`]: `[0,1]²` over a panel's bounding box.
//! - [`Frame::CanvasNormalized`]: `[0,1]²` over the whole drawing area,
//!   margins included.
//!
//! [`CoordTransform`] maps any of them to canvas-normalized coordinates
//! and back, and from there onto the drawing surface (points, y down).

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::plot::Renderable;
use crate::scale::{LinearScale, Scale};

/// Coordinate frame tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Frame {
    /// Data coordinates of a plot panel.
    #[default]
    Data,
    /// Unit square over a panel.
    PanelNormalized,
    /// Unit square over the full canvas.
    CanvasNormalized,
}

/// Which end of the panel the y axis starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YOrigin {
    /// `ymin` at the bottom edge (conventional plots).
    #[default]
    Bottom,
    /// `ymin` at the top edge (reversed axis, image-style plots).
    Top,
}

/// Data extent of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    /// Lower x bound.
    pub xmin: f64,
    /// Upper x bound.
    pub xmax: f64,
    /// Lower y bound.
    pub ymin: f64,
    /// Upper y bound.
    pub ymax: f64,
}

impl DataRange {
    /// Create a range.
    #[must_use]
    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// The unit square `[0,1]²`.
    pub const UNIT: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    /// Check both axes span a non-zero, finite interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateRange`] naming the offending axis.
    pub fn validate(&self) -> Result<()> {
        LinearScale::unit("x", (self.xmin, self.xmax))?;
        LinearScale::unit("y", (self.ymin, self.ymax))?;
        Ok(())
    }

    /// Whether `(x, y)` lies inside the range (bounds inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (x0, x1) = (self.xmin.min(self.xmax), self.xmin.max(self.xmax));
        let (y0, y1) = (self.ymin.min(self.ymax), self.ymin.max(self.ymax));
        (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
    }
}

/// A panel resolved onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanelGeometry {
    rect: Rect,
    range: Option<DataRange>,
}

/// Maps points between frames for one drawing area.
///
/// Build one per renderable (or per plain cell area) at the size it will be
/// drawn; the transform holds no reference to its source.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordTransform {
    canvas: Rect,
    panels: Vec<PanelGeometry>,
    y_origin: YOrigin,
}

impl CoordTransform {
    /// Transform for a plot drawn into `area` (surface points).
    ///
    /// The panel region is `area` minus the plot's margins; each panel's
    /// normalized bounds are laid out within that region.
    #[must_use]
    pub fn for_renderable(plot: &Renderable, area: Rect) -> Self {
        let region = area.inset(plot.margin_insets());
        let panels = plot
            .panel_list()
            .iter()
            .map(|panel| {
                let b = panel.bounds;
                PanelGeometry {
                    rect: Rect::new(
                        region.x + b.x * region.width,
                        region.y + b.y * region.height,
                        b.width * region.width,
                        b.height * region.height,
                    ),
                    range: Some(panel.range),
                }
            })
            .collect();
        Self { canvas: area, panels, y_origin: plot.origin() }
    }

    /// Transform for a bare area with no data: the area is both the canvas
    /// and the single panel.
    #[must_use]
    pub fn for_area(area: Rect) -> Self {
        Self {
            canvas: area,
            panels: vec![PanelGeometry { rect: area, range: None }],
            y_origin: YOrigin::Bottom,
        }
    }

    /// Surface rectangle covered by the canvas.
    #[must_use]
    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// Number of panels.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Surface rectangle of a panel.
    ///
    /// # Errors
    ///
    /// See [`CoordTransform::to_canvas`] for panel selection rules.
    pub fn panel_rect(&self, panel: Option<usize>) -> Result<Rect> {
        Ok(self.panel(panel)?.rect)
    }

    fn panel(&self, panel: Option<usize>) -> Result<&PanelGeometry> {
        match (panel, self.panels.len()) {
            (_, 0) => Err(Error::InvalidFrame("renderable has no panels".into())),
            (None, 1) => Ok(&self.panels[0]),
            (None, n) => Err(Error::InvalidFrame(format!(
                "{n} panels present; a panel index is required"
            ))),
            (Some(i), n) => self.panels.get(i).ok_or_else(|| {
                Error::InvalidFrame(format!("panel index {i} out of range for {n} panels"))
            }),
        }
    }

    fn data_scales(&self, geom: &PanelGeometry) -> Result<(LinearScale, LinearScale)> {
        let range = geom
            .range
            .ok_or_else(|| Error::InvalidFrame("DATA frame requires a renderable".into()))?;
        let x = LinearScale::unit("x", (range.xmin, range.xmax))?;
        let y = match self.y_origin {
            YOrigin::Bottom => LinearScale::unit("y", (range.ymin, range.ymax))?,
            YOrigin::Top => LinearScale::new("y", (range.ymin, range.ymax), (1.0, 0.0))?,
        };
        Ok((x, y))
    }

    /// Convert a point in `frame` to canvas-normalized coordinates.
    ///
    /// DATA and PANEL_NORMALIZED points need a panel: a single-panel source
    /// selects it implicitly, a faceted one requires `panel`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFrame`] if DATA is requested without a data range,
    ///   or the panel selection is missing/ambiguous/out of range.
    /// - [`Error::DegenerateRange`] if the panel's data range has zero span.
    pub fn to_canvas(&self, frame: Frame, x: f64, y: f64, panel: Option<usize>) -> Result<(f64, f64)> {
        let (px, py, geom) = match frame {
            Frame::CanvasNormalized => return Ok((x, y)),
            Frame::PanelNormalized => (x, y, self.panel(panel)?),
            Frame::Data => {
                let geom = self.panel(panel)?;
                let (sx, sy) = self.data_scales(geom)?;
                (sx.scale(x), sy.scale(y), geom)
            }
        };
        // Panel-normalized (y up) to surface, then surface to canvas.
        let r = geom.rect;
        let surface = Point::new(r.x + px * r.width, r.bottom() - py * r.height);
        Ok(self.surface_to_canvas(surface))
    }

    /// Inverse of [`CoordTransform::to_canvas`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`CoordTransform::to_canvas`].
    pub fn from_canvas(&self, frame: Frame, cx: f64, cy: f64, panel: Option<usize>) -> Result<(f64, f64)> {
        if frame == Frame::CanvasNormalized {
            return Ok((cx, cy));
        }
        let geom = self.panel(panel)?;
        let s = self.to_surface(cx, cy);
        let r = geom.rect;
        let px = (s.x - r.x) / r.width;
        let py = (r.bottom() - s.y) / r.height;
        if frame == Frame::PanelNormalized {
            return Ok((px, py));
        }
        let (sx, sy) = self.data_scales(geom)?;
        Ok((sx.invert(px), sy.invert(py)))
    }

    /// Canvas-normalized point to surface points.
    #[must_use]
    pub fn to_surface(&self, cx: f64, cy: f64) -> Point {
        self.canvas.at_fraction(cx, 1.0 - cy)
    }

    /// Surface point to canvas-normalized coordinates.
    #[must_use]
    pub fn surface_to_canvas(&self, p: Point) -> (f64, f64) {
        let c = self.canvas;
        ((p.x - c.x) / c.width, 1.0 - (p.y - c.y) / c.height)
    }

    /// Convert a point in `frame` straight to surface points.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CoordTransform::to_canvas`].
    pub fn to_surface_point(&self, frame: Frame, x: f64, y: f64, panel: Option<usize>) -> Result<Point> {
        let (cx, cy) = self.to_canvas(frame, x, y, panel)?;
        Ok(self.to_surface(cx, cy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Insets;
    use crate::plot::{Panel, DEFAULT_MARGINS};
    use approx::assert_relative_eq;

    fn plot() -> Renderable {
        Renderable::new(DataRange::new(10.0, 500.0, 0.0, 1000.0))
            .margins(Insets::new(10.0, 10.0, 30.0, 40.0))
    }

    #[test]
    fn test_canvas_is_identity() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(t.to_canvas(Frame::CanvasNormalized, 0.3, 0.7, None).unwrap(), (0.3, 0.7));
    }

    #[test]
    fn test_data_to_canvas_corners() {
        let t = CoordTransform::for_renderable(&plot(), Rect::new(0.0, 0.0, 250.0, 200.0));
        // panel spans x 40..240, y 10..170 on the surface
        let (cx, cy) = t.to_canvas(Frame::Data, 10.0, 0.0, None).unwrap();
        assert_relative_eq!(cx, 40.0 / 250.0);
        assert_relative_eq!(cy, 1.0 - 170.0 / 200.0);
        let (cx, cy) = t.to_canvas(Frame::Data, 500.0, 1000.0, None).unwrap();
        assert_relative_eq!(cx, 240.0 / 250.0);
        assert_relative_eq!(cy, 1.0 - 10.0 / 200.0);
    }

    #[test]
    fn test_panel_normalized_center() {
        let t = CoordTransform::for_renderable(&plot(), Rect::new(0.0, 0.0, 250.0, 200.0));
        let p = t.to_surface_point(Frame::PanelNormalized, 0.5, 0.5, None).unwrap();
        assert_relative_eq!(p.x, 140.0);
        assert_relative_eq!(p.y, 90.0);
    }

    #[test]
    fn test_data_requires_renderable() {
        let t = CoordTransform::for_area(Rect::new(0.0, 0.0, 10.0, 10.0));
        let err = t.to_canvas(Frame::Data, 1.0, 1.0, None).unwrap_err();
        assert!(matches!(err, Error::InvalidFrame(_)));
    }

    #[test]
    fn test_faceted_requires_panel_index() {
        let faceted = Renderable::faceted(
            vec![DataRange::new(0.0, 1.0, 0.0, 1.0), DataRange::new(0.0, 2.0, 0.0, 2.0)],
            2,
        );
        let t = CoordTransform::for_renderable(&faceted, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(matches!(
            t.to_canvas(Frame::Data, 0.5, 0.5, None),
            Err(Error::InvalidFrame(_))
        ));
        assert!(t.to_canvas(Frame::Data, 0.5, 0.5, Some(1)).is_ok());
        assert!(matches!(
            t.to_canvas(Frame::PanelNormalized, 0.5, 0.5, Some(2)),
            Err(Error::InvalidFrame(_))
        ));
        // canvas points never need a panel
        assert!(t.to_canvas(Frame::CanvasNormalized, 0.5, 0.5, None).is_ok());
    }

    #[test]
    fn test_degenerate_range() {
        let flat = Renderable::new(DataRange::new(5.0, 5.0, 0.0, 1.0));
        let t = CoordTransform::for_renderable(&flat, Rect::new(0.0, 0.0, 100.0, 100.0));
        let err = t.to_canvas(Frame::Data, 5.0, 0.5, None).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { axis: "x", .. }));
    }

    #[test]
    fn test_y_origin_top_flips() {
        let reversed = Renderable::new(DataRange::UNIT).margins(Insets::ZERO).y_origin(YOrigin::Top);
        let t = CoordTransform::for_renderable(&reversed, Rect::new(0.0, 0.0, 100.0, 100.0));
        let (_, cy) = t.to_canvas(Frame::Data, 0.0, 0.0, None).unwrap();
        assert_relative_eq!(cy, 1.0);
        let (_, cy) = t.to_canvas(Frame::Data, 0.0, 0.25, None).unwrap();
        assert_relative_eq!(cy, 0.75);

        // with margins the flip stays inside the panel
        let inset = Renderable::new(DataRange::UNIT).y_origin(YOrigin::Top);
        let t = CoordTransform::for_renderable(&inset, Rect::new(0.0, 0.0, 100.0, 100.0));
        let top = t.to_surface_point(Frame::Data, 0.0, 0.0, None).unwrap();
        assert_relative_eq!(top.y, DEFAULT_MARGINS.top);
    }

    #[test]
    fn test_round_trip_all_frames() {
        let t = CoordTransform::for_renderable(&plot(), Rect::new(20.0, 30.0, 250.0, 200.0));
        for frame in [Frame::Data, Frame::PanelNormalized, Frame::CanvasNormalized] {
            let (cx, cy) = t.to_canvas(frame, 0.25, 0.75, None).unwrap();
            let (x, y) = t.from_canvas(frame, cx, cy, None).unwrap();
            assert_relative_eq!(x, 0.25, epsilon = 1e-9);
            assert_relative_eq!(y, 0.75, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_explicit_panel_bounds() {
        let plot = Renderable::new(DataRange::UNIT)
            .margins(Insets::ZERO)
            .panels(vec![Panel::new(DataRange::UNIT).bounds(Rect::new(0.5, 0.0, 0.5, 1.0))]);
        let t = CoordTransform::for_renderable(&plot, Rect::new(0.0, 0.0, 100.0, 100.0));
        let r = t.panel_rect(None).unwrap();
        assert_eq!(r, Rect::new(50.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn test_data_range_contains() {
        let r = DataRange::new(10.0, 500.0, 0.0, 1000.0);
        assert!(r.contains(20.0, 400.0));
        assert!(!r.contains(5.0, 400.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::Insets;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// DATA -> canvas -> DATA reproduces the input point.
        #[test]
        fn prop_data_round_trip(
            xmin in -1.0e4f64..1.0e4,
            xspan in 1.0e-3f64..1.0e4,
            ymin in -1.0e4f64..1.0e4,
            yspan in 1.0e-3f64..1.0e4,
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
            left in 0.0f64..80.0,
            bottom in 0.0f64..80.0,
        ) {
            let range = DataRange::new(xmin, xmin + xspan, ymin, ymin + yspan);
            let plot = Renderable::new(range).margins(Insets::new(5.0, 5.0, bottom, left));
            let t = CoordTransform::for_renderable(&plot, Rect::new(0.0, 0.0, 400.0, 300.0));
            let x = xmin + fx * xspan;
            let y = ymin + fy * yspan;
            let (cx, cy) = t.to_canvas(Frame::Data, x, y, None).unwrap();
            let (rx, ry) = t.from_canvas(Frame::Data, cx, cy, None).unwrap();
            prop_assert!((rx - x).abs() <= 1e-9 * (1.0 + x.abs() + xspan));
            prop_assert!((ry - y).abs() <= 1e-9 * (1.0 + y.abs() + yspan));
        }
    }
}
