use std::f64::consts::FRAC_PI_2;

use crate::foundation::core::{DVec3, Rgb};
use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::shader::{faceforward, fresnel, reflect};
use crate::plugin::{RayKind, Shader, ShadingHost, SurfaceInput, SurfaceOutput};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("diffuse", PropertyKind::Vec3),
    PropertySpec::new("specular", PropertyKind::Vec3),
    PropertySpec::new("ambient", PropertyKind::Vec3),
    PropertySpec::new("roughness", PropertyKind::Scalar),
    PropertySpec::new("reflect", PropertyKind::Vec3),
    PropertySpec::new("ior", PropertyKind::Scalar),
    PropertySpec::new("opacity", PropertyKind::Scalar),
];

#[derive(Debug, Clone)]
pub struct PlasticShader {
    diffuse: Rgb,
    specular: Rgb,
    ambient: Rgb,
    roughness: f64,
    reflect: Rgb,
    ior: f64,
    opacity: f32,
}

impl Default for PlasticShader {
    fn default() -> Self {
        Self {
            diffuse: Rgb::splat(0.8),
            specular: Rgb::ONE,
            ambient: Rgb::ZERO,
            roughness: 0.1,
            reflect: Rgb::ONE,
            ior: 1.4,
            opacity: 1.0,
        }
    }
}

/// Phong lobe around the mirror direction of `incident`.
fn phong(incident: DVec3, n: DVec3, l: DVec3, roughness: f64) -> f64 {
    let r = reflect(incident, n);
    r.dot(l).max(0.0).powf(1.0 / roughness.max(0.001))
}

impl Shader for PlasticShader {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        match name {
            "diffuse" => self.diffuse = value.as_vec3()?.as_vec3(),
            "specular" => self.specular = value.as_vec3()?.as_vec3(),
            "ambient" => self.ambient = value.as_vec3()?.as_vec3(),
            "roughness" => self.roughness = value.as_scalar()?.max(0.0),
            "reflect" => self.reflect = value.as_vec3()?.as_vec3(),
            "ior" => {
                let ior = value.as_scalar()?;
                if ior <= 0.0 {
                    return Err(HikariError::validation("ior must be positive"));
                }
                self.ior = ior;
            }
            "opacity" => self.opacity = value.as_scalar()?.clamp(0.0, 1.0) as f32,
            _ => {}
        }
        Ok(())
    }

    fn evaluate(&self, input: &SurfaceInput, host: &dyn ShadingHost) -> SurfaceOutput {
        if host.ray_kind() == RayKind::Shadow {
            return SurfaceOutput {
                color: Rgb::ZERO,
                opacity: self.opacity,
            };
        }

        let nf = faceforward(input.incident, input.normal);
        let mut diff = Rgb::ZERO;
        let mut spec = Rgb::ZERO;
        host.illuminance(input.position, nf, FRAC_PI_2, &mut |light| {
            let cos = nf.dot(light.direction).max(0.0);
            diff += light.color * cos as f32;
            spec += light.color * phong(input.incident, nf, light.direction, self.roughness) as f32;
        });

        let mut color = diff * self.diffuse + spec * self.specular + self.ambient;

        if self.reflect != Rgb::ZERO {
            let kr = fresnel(input.incident, nf, self.ior) as f32;
            let dir = reflect(input.incident, nf);
            let refl = host.trace_reflect(input.position, dir);
            color += refl.rgb() * self.reflect * kr;
        }

        SurfaceOutput {
            color,
            opacity: self.opacity,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/plastic_shader.rs"]
mod tests;
