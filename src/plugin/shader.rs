use std::sync::Arc;

use crate::foundation::core::{DVec2, DVec3, Rgb, Rgba};
use crate::foundation::error::HikariResult;
use crate::render::texture::Texture;
use crate::scene::property::{PropertySpec, PropertyValue};

/// Kind of ray that led to a shading call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RayKind {
    Camera,
    Shadow,
    Reflect,
    Refract,
}

/// Geometry handed to a shader, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceInput {
    /// Shaded point.
    pub position: DVec3,
    /// Unit shading normal; zero inside volumes.
    pub normal: DVec3,
    /// Unit direction of the incoming ray (pointing toward the surface).
    pub incident: DVec3,
    pub uv: DVec2,
    /// Per-vertex or per-sample time in `[0, 1)`.
    pub time: f64,
}

/// Shader result with straight (unpremultiplied) color and opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceOutput {
    pub color: Rgb,
    pub opacity: f32,
}

impl SurfaceOutput {
    pub fn opaque(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

/// One light sample as seen from a shaded point, already attenuated by occlusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightOutput {
    /// Unit direction from the shaded point toward the sample.
    pub direction: DVec3,
    pub distance: f64,
    pub color: Rgb,
}

/// Renderer services available during [`Shader::evaluate`].
pub trait ShadingHost {
    fn ray_kind(&self) -> RayKind;

    /// Visits light samples within `angle` radians of `axis` around `position`. Occlusion is
    /// resolved against the shaded object's shadow target; shadow rays see no lights.
    fn illuminance(
        &self,
        position: DVec3,
        axis: DVec3,
        angle: f64,
        visit: &mut dyn FnMut(&LightOutput),
    );

    /// Traces a reflection ray against the object's reflect target. Transparent past the depth limit.
    fn trace_reflect(&self, position: DVec3, direction: DVec3) -> Rgba;

    /// Traces a refraction ray against the object's refract target.
    fn trace_refract(&self, position: DVec3, direction: DVec3) -> Rgba;
}

/// Surface and volume shading capability.
pub trait Shader: Send + Sync + std::fmt::Debug {
    /// Property keys and types this shader accepts.
    fn properties(&self) -> &'static [PropertySpec];

    /// Called only with keys and types already checked against [`Shader::properties`].
    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()>;

    /// Texture slot names accepted by [`Shader::assign_texture`].
    fn texture_slots(&self) -> &'static [&'static str] {
        &[]
    }

    fn assign_texture(&mut self, _slot: &str, _texture: Arc<Texture>) -> HikariResult<()> {
        Ok(())
    }

    fn evaluate(&self, input: &SurfaceInput, host: &dyn ShadingHost) -> SurfaceOutput;
}

/// Mirror `incident` about `normal`.
pub fn reflect(incident: DVec3, normal: DVec3) -> DVec3 {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Refraction direction for relative index `ior`, entering when `incident` opposes `normal`.
/// Falls back to reflection on total internal reflection.
pub fn refract(incident: DVec3, normal: DVec3, ior: f64) -> DVec3 {
    let mut cos1 = -incident.dot(normal);
    let (eta, n) = if cos1 < 0.0 {
        cos1 = -cos1;
        (ior, -normal)
    } else {
        (1.0 / ior, normal)
    };
    let radicand = 1.0 - eta * eta * (1.0 - cos1 * cos1);
    if radicand < 0.0 {
        return reflect(incident, normal);
    }
    incident * eta + n * (eta * cos1 - radicand.sqrt())
}

/// Schlick approximation of the Fresnel reflectance.
pub fn fresnel(incident: DVec3, normal: DVec3, ior: f64) -> f64 {
    let mut cos = -incident.dot(normal);
    let eta = if cos > 0.0 {
        ior
    } else {
        cos = -cos;
        1.0 / ior
    };
    let f0 = ((1.0 - eta) * (1.0 - eta)) / ((1.0 + eta) * (1.0 + eta));
    f0 + (1.0 - f0) * (1.0 - cos).powi(5)
}

/// Flip `normal` to face against `incident`.
pub fn faceforward(incident: DVec3, normal: DVec3) -> DVec3 {
    if incident.dot(normal) < 0.0 {
        normal
    } else {
        -normal
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/shader.rs"]
mod tests;
