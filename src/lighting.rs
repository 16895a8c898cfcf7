use nalgebra::{Point3, Unit, Vector3};

use crate::math::Float;

/// A point light.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Point3<Float>,
    pub intensity: Float,
}

impl Light {
    pub fn new(position: Point3<Float>, intensity: Float) -> Self {
        Light {
            position,
            intensity,
        }
    }

    /// The Lambertian contribution of this light to a surface at `point` facing `normal`.
    pub fn diffuse(&self, point: &Point3<Float>, normal: &Unit<Vector3<Float>>) -> Float {
        let lightv = self.position - point;
        let dist = lightv.norm();

        // a light sitting on the surface has no direction
        if dist == 0. {
            return 0.;
        }

        let light_dot_normal = normal.dot(&(lightv / dist));
        if light_dot_normal <= 0. {
            0.
        } else {
            light_dot_normal * self.intensity
        }
    }
}

/// Sum the diffuse contributions of `lights`, in order. The result is never negative, and is not
/// clamped from above.
pub fn lambert<'a, Lights>(
    lights: Lights,
    point: &Point3<Float>,
    normal: &Unit<Vector3<Float>>,
) -> Float
where
    Lights: IntoIterator<Item = &'a Light>,
{
    lights
        .into_iter()
        .fold(0., |acc, light| acc + light.diffuse(point, normal))
}
