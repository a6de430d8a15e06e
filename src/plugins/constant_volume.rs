use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::{Procedure, ProcedureInputs};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[PropertySpec::new("density", PropertyKind::Scalar)];

/// Fills every voxel of the bound volume with `density` (clamped to zero or more).
#[derive(Debug, Clone)]
pub struct ConstantVolumeProcedure {
    density: f32,
}

impl Default for ConstantVolumeProcedure {
    fn default() -> Self {
        Self { density: 1.0 }
    }
}

impl Procedure for ConstantVolumeProcedure {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        if name == "density" {
            self.density = value.as_scalar()?.max(0.0) as f32;
        }
        Ok(())
    }

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()> {
        let volume = inputs
            .volume
            .ok_or_else(|| HikariError::validation("no volume bound to 'volume'"))?;
        volume.fill(self.density);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/constant_volume.rs"]
mod tests;
