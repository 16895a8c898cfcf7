//! The rock garden height field.
//!
//! The canvas is split into a 3x3 grid of square segments. The center segment is flat, and the
//! eight segments around it are covered in cosine ripples that radiate away from the center:
//! ripples in the corner segments are concentric around the nearest corner of the center segment,
//! and ripples in the edge segments run parallel to the edge they share with the center segment.

use nalgebra::{Point2, Unit, Vector2, Vector3};

use crate::{
    error::{Error, Result},
    math::{Clamp, Float, Ortho, TAU},
};

/// The default width of a single segment, in pixels.
pub const SEGMENT_WIDTH: Float = 32.;

/// The number of segments along each axis of the canvas.
pub const SEGMENTS: usize = 3;

/// The largest canvas, in pixels along either axis, that a tiling may cover.
pub const MAX_DIMENSION_PX: u32 = 16384;

/// The geometry of the 3x3 segment grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiling {
    segment_width: Float,
}

impl Default for Tiling {
    fn default() -> Self {
        Tiling {
            segment_width: SEGMENT_WIDTH,
        }
    }
}

impl Tiling {
    /// Construct a tiling, rejecting widths whose canvas would exceed [`MAX_DIMENSION_PX`].
    pub fn new(segment_width: Float) -> Result<Self> {
        if !segment_width.is_finite()
            || segment_width <= 0.
            || (segment_width * SEGMENTS as Float).ceil() > MAX_DIMENSION_PX as Float
        {
            return Err(Error::InvalidSegmentWidth(segment_width));
        }
        Ok(Tiling { segment_width })
    }

    pub fn segment_width(&self) -> Float {
        self.segment_width
    }

    /// The extent of the canvas along either axis.
    pub fn dimension(&self) -> Float {
        self.segment_width * SEGMENTS as Float
    }

    /// The number of whole pixels needed to cover the canvas along either axis.
    pub fn dimension_px(&self) -> u32 {
        self.dimension().ceil() as u32
    }

    /// The inner edge of the first row/column of segments.
    fn lo(&self) -> Float {
        self.segment_width
    }

    /// The inner edge of the last row/column of segments.
    fn hi(&self) -> Float {
        2. * self.segment_width
    }

    /// Section indices of `p`. Points outside of the canvas are attributed to the nearest outer
    /// segment, so that its ripples continue outwards.
    pub fn section(&self, p: &Point2<Float>) -> (usize, usize) {
        let index = |v: Float| (v / self.segment_width).floor().clamp_to(0., 2.) as usize;
        (index(p.x), index(p.y))
    }

    pub fn region(&self, p: &Point2<Float>) -> Region {
        let (x, y) = self.section(p);
        Region::from_section(x, y)
    }
}

/// Corners of the canvas, with `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// The side of the center segment an edge segment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// One of the nine segments of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Center,
    Corner(Quadrant),
    Edge(Side),
}

impl Region {
    /// Classify a pair of section indices, each in `0..=2`.
    pub fn from_section(x: usize, y: usize) -> Self {
        match (x.min(2), y.min(2)) {
            (1, 1) => Region::Center,
            (0, 0) => Region::Corner(Quadrant::TopLeft),
            (2, 0) => Region::Corner(Quadrant::TopRight),
            (0, 2) => Region::Corner(Quadrant::BottomLeft),
            (2, 2) => Region::Corner(Quadrant::BottomRight),
            (1, 0) => Region::Edge(Side::Top),
            (1, _) => Region::Edge(Side::Bottom),
            (0, _) => Region::Edge(Side::Left),
            _ => Region::Edge(Side::Right),
        }
    }

    /// The point that ripples radiate from for a surface point `p` in this region. The center
    /// region is flat, and has no anchor.
    ///
    /// Corner anchors are the matching corner of the center segment. Edge anchors follow `p` along
    /// the shared edge, which makes their ripples constant in that direction.
    pub fn anchor(&self, tiling: &Tiling, p: &Point2<Float>) -> Option<Point2<Float>> {
        let (lo, hi) = (tiling.lo(), tiling.hi());
        let anchor = match self {
            Region::Center => return None,
            Region::Corner(Quadrant::TopLeft) => Point2::new(lo, lo),
            Region::Corner(Quadrant::TopRight) => Point2::new(hi, lo),
            Region::Corner(Quadrant::BottomLeft) => Point2::new(lo, hi),
            Region::Corner(Quadrant::BottomRight) => Point2::new(hi, hi),
            Region::Edge(Side::Top) => Point2::new(p.x, lo),
            Region::Edge(Side::Bottom) => Point2::new(p.x, hi),
            Region::Edge(Side::Left) => Point2::new(lo, p.y),
            Region::Edge(Side::Right) => Point2::new(hi, p.y),
        };
        Some(anchor)
    }
}

/// The normal of the flat parts of the surface.
pub fn flat() -> Unit<Vector3<Float>> {
    Unit::new_unchecked(Vector3::z())
}

/// Analytic surface normals for the tiled ripple pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalField {
    tiling: Tiling,
    interval: Float,
}

impl NormalField {
    /// Construct a new field whose ripples repeat every `interval` pixels.
    pub fn new(tiling: Tiling, interval: Float) -> Result<Self> {
        if !interval.is_finite() || interval <= 0. {
            return Err(Error::InvalidInterval(interval));
        }
        Ok(NormalField { tiling, interval })
    }

    pub fn tiling(&self) -> &Tiling {
        &self.tiling
    }

    pub fn interval(&self) -> Float {
        self.interval
    }

    /// Distance to the next ripple peak, as a fraction of the interval in `(-1, 0]`.
    pub fn offset(&self, radius: Float) -> Float {
        let t = radius / self.interval;
        t - t.ceil()
    }

    /// The normal of the ripple profile `cos(2 pi offset)` in the plane spanned by the radial
    /// direction (`x`) and the surface normal (`y`).
    pub fn profile_normal(&self, radius: Float) -> Unit<Vector2<Float>> {
        let phase = TAU * self.offset(radius);
        let slope = -phase.sin() * TAU;
        Unit::new_unchecked(Vector2::new(1., slope).normalize().ortho())
    }

    /// The unit surface normal at `p`.
    ///
    /// Points exactly on an anchor have no radial direction; they are treated as flat.
    pub fn normal(&self, p: &Point2<Float>) -> Unit<Vector3<Float>> {
        let anchor = match self.tiling.region(p).anchor(&self.tiling, p) {
            Some(anchor) => anchor,
            None => return flat(),
        };

        let v = p - anchor;
        let radius = v.norm();
        if radius == 0. {
            return flat();
        }

        let dir = v / radius;
        let local = self.profile_normal(radius);
        Unit::new_unchecked(Vector3::new(dir.x * local.x, dir.y * local.x, local.y))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn field(interval: Float) -> NormalField {
        NormalField::new(Tiling::default(), interval).unwrap()
    }

    #[test]
    fn test_regions() {
        let tiling = Tiling::default();
        let region = |x: Float, y: Float| tiling.region(&Point2::new(x, y));
        assert_eq!(Region::Center, region(32., 32.));
        assert_eq!(Region::Center, region(63.9, 63.9));
        assert_eq!(Region::Corner(Quadrant::TopLeft), region(0., 0.));
        assert_eq!(Region::Corner(Quadrant::TopRight), region(95., 0.));
        assert_eq!(Region::Corner(Quadrant::BottomLeft), region(0., 95.));
        assert_eq!(Region::Corner(Quadrant::BottomRight), region(64., 64.));
        assert_eq!(Region::Edge(Side::Top), region(40., 31.9));
        assert_eq!(Region::Edge(Side::Bottom), region(40., 70.));
        assert_eq!(Region::Edge(Side::Left), region(10., 40.));
        assert_eq!(Region::Edge(Side::Right), region(80., 40.));
    }

    #[test]
    fn test_regions_outside_canvas() {
        let tiling = Tiling::default();
        assert_eq!((0, 0), tiling.section(&Point2::new(-5., -0.5)));
        assert_eq!((2, 2), tiling.section(&Point2::new(96., 1000.)));
        assert_eq!(
            Region::Edge(Side::Left),
            tiling.region(&Point2::new(-10., 48.))
        );
    }

    #[test]
    fn test_anchors() {
        let tiling = Tiling::default();
        let anchor = |x: Float, y: Float| {
            let p = Point2::new(x, y);
            tiling.region(&p).anchor(&tiling, &p)
        };
        assert_eq!(None, anchor(48., 48.));
        assert_eq!(Some(Point2::new(32., 32.)), anchor(3., 7.));
        assert_eq!(Some(Point2::new(64., 32.)), anchor(90., 7.));
        assert_eq!(Some(Point2::new(32., 64.)), anchor(3., 90.));
        assert_eq!(Some(Point2::new(64., 64.)), anchor(90., 90.));
        assert_eq!(Some(Point2::new(40., 32.)), anchor(40., 7.));
        assert_eq!(Some(Point2::new(40., 64.)), anchor(40., 90.));
        assert_eq!(Some(Point2::new(32., 50.)), anchor(3., 50.));
        assert_eq!(Some(Point2::new(64., 50.)), anchor(90., 50.));
    }

    #[test]
    fn test_anchors_scale_with_segment_width() {
        let tiling = Tiling::new(10.).unwrap();
        let p = Point2::new(25., 1.);
        assert_eq!(Region::Corner(Quadrant::TopRight), tiling.region(&p));
        assert_eq!(Some(Point2::new(20., 10.)), tiling.region(&p).anchor(&tiling, &p));
        assert_eq!(30, tiling.dimension_px());
    }

    #[test]
    fn test_center_is_flat() {
        let f = field(8.);
        for x in 32..64 {
            for y in 32..64 {
                let n = f.normal(&Point2::new(x as Float, y as Float));
                assert_eq!(Vector3::new(0., 0., 1.), n.into_inner());
            }
        }
    }

    #[test]
    fn test_unit_length() {
        let f = field(8.);
        for x in 0..96 {
            for y in 0..96 {
                let n = f.normal(&Point2::new(x as Float + 0.25, y as Float + 0.5));
                assert_abs_diff_eq!(1., n.norm(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_normals_face_up() {
        let f = field(5.);
        for x in 0..96 {
            for y in 0..96 {
                assert!(f.normal(&Point2::new(x as Float, y as Float)).z > 0.);
            }
        }
    }

    #[test]
    fn test_offset_range() {
        let f = field(8.);
        assert_eq!(0., f.offset(0.));
        assert_eq!(0., f.offset(16.));
        assert_abs_diff_eq!(-0.75, f.offset(2.), epsilon = 1e-12);
        assert_abs_diff_eq!(-0.5, f.offset(12.), epsilon = 1e-12);
    }

    #[test]
    fn test_radial_periodicity() {
        let f = field(8.);
        let anchor = Point2::new(32., 32.);
        let dir = Vector2::new(-1., -0.5).normalize();
        for r in [0.5, 1.3, 3.9, 5.3, 7.7] {
            let a = f.normal(&(anchor + dir * r));
            let b = f.normal(&(anchor + dir * (r + 8.)));
            assert_abs_diff_eq!(a.into_inner(), b.into_inner(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_peaks_and_troughs_are_flat() {
        let f = field(8.);

        // a peak, two intervals left of the left edge
        let n = f.normal(&Point2::new(16., 48.));
        assert_abs_diff_eq!(Vector3::new(0., 0., 1.), n.into_inner(), epsilon = 1e-12);

        // a trough, half an interval left of the left edge
        let n = f.normal(&Point2::new(28., 48.));
        assert_abs_diff_eq!(Vector3::new(0., 0., 1.), n.into_inner(), epsilon = 1e-12);
    }

    #[test]
    fn test_edges_are_cylindrical() {
        let f = field(8.);
        let a = f.normal(&Point2::new(35., 10.));
        let b = f.normal(&Point2::new(60., 10.));
        assert_eq!(a, b);
        assert_eq!(0., a.x);
        assert!(a.y != 0.);

        let n = f.normal(&Point2::new(70., 40.));
        assert_eq!(0., n.y);
        assert!(n.x != 0.);
    }

    #[test]
    fn test_slope_matches_profile() {
        // a quarter interval past a peak the slope of the profile is -2 pi
        let f = field(8.);
        let n = f.normal(&Point2::new(66., 48.));
        let expected = Vector2::new(1., -TAU).normalize().ortho();
        assert_abs_diff_eq!(expected.x, n.x, epsilon = 1e-12);
        assert_abs_diff_eq!(0., n.y, epsilon = 1e-12);
        assert_abs_diff_eq!(expected.y, n.z, epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_is_flat() {
        let f = field(8.);

        // the right and bottom edges have their anchors on the first column/row of the segment
        assert_eq!(flat(), f.normal(&Point2::new(64., 40.)));
        assert_eq!(flat(), f.normal(&Point2::new(40., 64.)));
        assert_eq!(flat(), f.normal(&Point2::new(64., 64.)));
    }

    #[test]
    fn test_corner_has_tilt() {
        let n = field(8.).normal(&Point2::new(0., 0.));
        assert!(n.x != 0.);
        assert!(n.y != 0.);
    }

    #[test]
    fn test_invalid_configuration() {
        assert_eq!(
            Err(Error::InvalidInterval(0.)),
            NormalField::new(Tiling::default(), 0.)
        );
        assert_eq!(
            Err(Error::InvalidInterval(-2.)),
            NormalField::new(Tiling::default(), -2.)
        );
        assert!(NormalField::new(Tiling::default(), Float::NAN).is_err());
        assert!(NormalField::new(Tiling::default(), Float::INFINITY).is_err());
        assert_eq!(Err(Error::InvalidSegmentWidth(0.)), Tiling::new(0.));
        assert!(Tiling::new(-1.).is_err());
    }

    #[test]
    fn test_canvas_size_is_bounded() {
        let widest = (MAX_DIMENSION_PX / SEGMENTS as u32) as Float;
        let tiling = Tiling::new(widest).unwrap();
        assert_eq!(16383, tiling.dimension_px());

        assert_eq!(Err(Error::InvalidSegmentWidth(1e6)), Tiling::new(1e6));
        assert_eq!(Err(Error::InvalidSegmentWidth(2e9)), Tiling::new(2e9));
        assert!(Tiling::new(widest + 1.).is_err());
        assert!(Tiling::new(Float::MAX).is_err());
    }
}
