use std::sync::Arc;

use crate::foundation::core::Rgb;
use crate::foundation::error::HikariResult;
use crate::plugin::{Shader, ShadingHost, SurfaceInput, SurfaceOutput};
use crate::render::texture::Texture;
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[PropertySpec::new("diffuse", PropertyKind::Vec3)];

/// Shadeless color. Lights and shadows have no effect.
#[derive(Debug, Clone)]
pub struct ConstantShader {
    diffuse: Rgb,
    texture: Option<Arc<Texture>>,
}

impl Default for ConstantShader {
    fn default() -> Self {
        Self {
            diffuse: Rgb::ONE,
            texture: None,
        }
    }
}

impl Shader for ConstantShader {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        if name == "diffuse" {
            self.diffuse = value.as_vec3()?.as_vec3();
        }
        Ok(())
    }

    fn texture_slots(&self) -> &'static [&'static str] {
        &["texture"]
    }

    fn assign_texture(&mut self, _slot: &str, texture: Arc<Texture>) -> HikariResult<()> {
        self.texture = Some(texture);
        Ok(())
    }

    fn evaluate(&self, input: &SurfaceInput, _host: &dyn ShadingHost) -> SurfaceOutput {
        let tex = match &self.texture {
            Some(t) => t.lookup(input.uv.x, input.uv.y).rgb(),
            None => Rgb::ONE,
        };
        SurfaceOutput::opaque(self.diffuse * tex)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/constant_shader.rs"]
mod tests;
