use nalgebra::{Point2, Point3, Vector2};

/// The floating point type used throughout the renderer.
pub type Float = f64;

pub const TAU: Float = std::f64::consts::TAU;

pub trait Ortho {
    type Output;

    /// Rotate by 90 degrees counter-clockwise: `(x, y) -> (-y, x)`.
    fn ortho(&self) -> Self::Output;
}

impl Ortho for Vector2<Float> {
    type Output = Self;

    #[inline]
    fn ortho(&self) -> Self {
        Vector2::new(-self.y, self.x)
    }
}

pub trait Clamp {
    /// Clamp a value to the range `[lo, hi]`. NaN clamps to `lo`.
    fn clamp_to(self, lo: Self, hi: Self) -> Self;
}

impl Clamp for Float {
    #[inline]
    fn clamp_to(self, lo: Float, hi: Float) -> Float {
        self.max(lo).min(hi)
    }
}

/// Lift a surface coordinate onto the `z = 0` plane.
#[inline]
pub fn on_surface(p: &Point2<Float>) -> Point3<Float> {
    Point3::new(p.x, p.y, 0.)
}
