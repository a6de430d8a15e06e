use std::f64::consts::PI;

use crate::foundation::core::{DVec3, Rgb};
use crate::foundation::error::HikariResult;
use crate::plugin::{RayKind, Shader, ShadingHost, SurfaceInput, SurfaceOutput};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[PropertySpec::new("diffuse", PropertyKind::Vec3)];

/// Isotropic single scattering: the sum of visible light, tinted by `diffuse`.
#[derive(Debug, Clone)]
pub struct VolumeShader {
    diffuse: Rgb,
}

impl Default for VolumeShader {
    fn default() -> Self {
        Self { diffuse: Rgb::ONE }
    }
}

impl Shader for VolumeShader {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        if name == "diffuse" {
            self.diffuse = value.as_vec3()?.as_vec3();
        }
        Ok(())
    }

    fn evaluate(&self, input: &SurfaceInput, host: &dyn ShadingHost) -> SurfaceOutput {
        if host.ray_kind() == RayKind::Shadow {
            return SurfaceOutput::opaque(Rgb::ZERO);
        }
        let mut light_sum = Rgb::ZERO;
        host.illuminance(input.position, DVec3::Y, PI, &mut |light| {
            light_sum += light.color;
        });
        SurfaceOutput::opaque(self.diffuse * light_sum)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/volume_shader.rs"]
mod tests;
