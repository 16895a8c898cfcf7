use std::{fmt, sync::Arc};

use nalgebra::{Point2, Point3, Unit, Vector3};

use crate::{
    canvas::{Canvas, Color},
    error::{Error, Result},
    field::{NormalField, Tiling},
    lighting::{self, Light},
    math::{self, Float},
    render::{self, RenderConfig},
};

/// The brightness added to every point, regardless of the lights.
pub const AMBIENT: Float = 0.5;

/// The color of the stones.
pub const STONE: Float = 0.8;

/// Base color as a function of the surface coordinate.
pub type Albedo = Arc<dyn Fn(&Point2<Float>) -> Color + Send + Sync>;

/// A flat albedo.
pub fn solid(color: Color) -> Albedo {
    Arc::new(move |_: &Point2<Float>| color)
}

/// The rock garden: a rippled surface lit by point lights.
#[derive(Clone)]
pub struct Scene {
    field: NormalField,
    lights: Vec<Light>,
    ambient: Float,
    albedo: Albedo,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("field", &self.field)
            .field("lights", &self.lights)
            .field("ambient", &self.ambient)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// A scene with ripples every `interval` pixels, lit by the default light.
    pub fn new(interval: Float) -> Result<Self> {
        SceneBuilder::default().set_interval(interval).build()
    }

    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// The light the scene is lit by when no others are given: above the top-right corner of the
    /// canvas, as high as the canvas is wide.
    pub fn default_light(tiling: &Tiling) -> Light {
        let d = tiling.dimension();
        Light::new(Point3::new(d, 0., d), 2.0)
    }

    pub fn field(&self) -> &NormalField {
        &self.field
    }

    pub fn tiling(&self) -> &Tiling {
        self.field.tiling()
    }

    pub fn interval(&self) -> Float {
        self.field.interval()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn ambient(&self) -> Float {
        self.ambient
    }

    pub fn width_px(&self) -> u32 {
        self.tiling().dimension_px()
    }

    pub fn height_px(&self) -> u32 {
        self.tiling().dimension_px()
    }

    pub fn normal(&self, p: &Point2<Float>) -> Unit<Vector3<Float>> {
        self.field.normal(p)
    }

    /// The total diffuse light reaching `p` on a surface facing `normal`.
    pub fn brightness(&self, p: &Point2<Float>, normal: &Unit<Vector3<Float>>) -> Float {
        lighting::lambert(&self.lights, &math::on_surface(p), normal)
    }

    pub fn albedo(&self, p: &Point2<Float>) -> Color {
        (self.albedo)(p)
    }

    /// The linear color of the surface at `p`.
    pub fn shade(&self, p: &Point2<Float>) -> Color {
        let normal = self.normal(p);
        self.albedo(p) * (self.brightness(p, &normal) + self.ambient)
    }

    /// Render the whole canvas on the current thread.
    pub fn render(&self) -> Canvas {
        render::render(self, &RenderConfig::new(1))
    }
}

pub struct SceneBuilder {
    interval: Float,
    tiling: Tiling,
    ambient: Float,
    lights: Option<Vec<Light>>,
    albedo: Albedo,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        SceneBuilder {
            interval: 8.,
            tiling: Tiling::default(),
            ambient: AMBIENT,
            lights: None,
            albedo: solid(Color::repeat(STONE)),
        }
    }
}

impl SceneBuilder {
    pub fn set_interval(mut self, interval: Float) -> Self {
        self.interval = interval;
        self
    }

    pub fn set_tiling(mut self, tiling: Tiling) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn set_ambient(mut self, ambient: Float) -> Self {
        self.ambient = ambient;
        self
    }

    /// Add a light. Once any light has been added, the default light is no longer used.
    pub fn add_light(mut self, light: Light) -> Self {
        self.lights.get_or_insert_with(Vec::new).push(light);
        self
    }

    /// Replace all lights, including the default one.
    pub fn set_lights(mut self, lights: Vec<Light>) -> Self {
        self.lights = Some(lights);
        self
    }

    pub fn set_albedo<F>(mut self, albedo: F) -> Self
    where
        F: Fn(&Point2<Float>) -> Color + Send + Sync + 'static,
    {
        self.albedo = Arc::new(albedo);
        self
    }

    pub fn build(self) -> Result<Scene> {
        let field = NormalField::new(self.tiling, self.interval)?;

        if !self.ambient.is_finite() || self.ambient < 0. {
            return Err(Error::InvalidAmbient(self.ambient));
        }

        let lights = self
            .lights
            .unwrap_or_else(|| vec![Scene::default_light(&self.tiling)]);

        for (index, light) in lights.iter().enumerate() {
            if !light.position.coords.iter().all(|c| c.is_finite()) {
                return Err(Error::InvalidLight {
                    index,
                    reason: "position must be finite",
                });
            }
            if !light.intensity.is_finite() || light.intensity < 0. {
                return Err(Error::InvalidLight {
                    index,
                    reason: "intensity must be non-negative and finite",
                });
            }
        }

        Ok(Scene {
            field,
            lights,
            ambient: self.ambient,
            albedo: self.albedo,
        })
    }
}
