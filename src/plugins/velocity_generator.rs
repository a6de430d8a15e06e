use crate::foundation::core::DVec3;
use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::{Procedure, ProcedureInputs};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("velocity", PropertyKind::Vec3),
    PropertySpec::new("normal_scale", PropertyKind::Scalar),
];

/// Writes `velocity + normal * normal_scale` into every vertex of the bound mesh.
#[derive(Debug, Clone)]
pub struct VelocityGeneratorProcedure {
    velocity: DVec3,
    normal_scale: f64,
}

impl Default for VelocityGeneratorProcedure {
    fn default() -> Self {
        Self {
            velocity: DVec3::ZERO,
            normal_scale: 0.05,
        }
    }
}

impl Procedure for VelocityGeneratorProcedure {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        match name {
            "velocity" => self.velocity = value.as_vec3()?,
            "normal_scale" => self.normal_scale = value.as_scalar()?,
            _ => {}
        }
        Ok(())
    }

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()> {
        let mesh = inputs
            .mesh
            .ok_or_else(|| HikariError::validation("no mesh bound to 'mesh'"))?;
        if mesh.normals().is_none() && self.normal_scale != 0.0 {
            mesh.compute_normals();
        }
        let velocities: Vec<DVec3> = match mesh.normals() {
            Some(normals) if self.normal_scale != 0.0 => normals
                .iter()
                .map(|n| self.velocity + *n * self.normal_scale)
                .collect(),
            _ => vec![self.velocity; mesh.vertex_count()],
        };
        mesh.set_velocities(velocities)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/velocity_generator.rs"]
mod tests;
