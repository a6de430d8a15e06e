use crate::foundation::core::{Bounds3, DVec3};
use crate::foundation::error::{HikariError, HikariResult};
use crate::foundation::math::smoothstep;
use crate::plugin::{Procedure, ProcedureInputs};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("radius", PropertyKind::Scalar),
    PropertySpec::new("density", PropertyKind::Scalar),
    PropertySpec::new("falloff", PropertyKind::Scalar),
];

/// Rasterizes points into the bound volume as soft spheres.
///
/// Points come from the bound mesh's vertices, or a single point at the origin when no mesh is
/// bound. A bound turbulence field pushes each sphere's surface outward by `|noise|` sampled at
/// the voxel. Voxels keep the maximum of their current and new density.
#[derive(Debug, Clone)]
pub struct PointCloudsProcedure {
    radius: f64,
    density: f32,
    falloff: f64,
}

impl Default for PointCloudsProcedure {
    fn default() -> Self {
        Self {
            radius: 0.75,
            density: 1.0,
            falloff: 0.05,
        }
    }
}

impl Procedure for PointCloudsProcedure {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        let v = value.as_scalar()?;
        match name {
            "radius" => self.radius = v.max(0.0),
            "density" => self.density = v.max(0.0) as f32,
            "falloff" => self.falloff = v.max(0.0),
            _ => {}
        }
        Ok(())
    }

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()> {
        let volume = inputs
            .volume
            .ok_or_else(|| HikariError::validation("no volume bound to 'volume'"))?;
        volume.validate()?;
        if volume.data().is_empty() {
            return Err(HikariError::validation(
                "volume has no resolution; set 'resolution' before running",
            ));
        }

        let points: Vec<DVec3> = match inputs.mesh.as_deref() {
            Some(mesh) => mesh.positions().to_vec(),
            None => vec![DVec3::ZERO],
        };
        let turbulence = inputs.turbulence;
        let margin = turbulence.map_or(0.0, |t| t.bound());
        let reach = self.radius + margin;

        for p in points {
            let region = Bounds3::new(p - DVec3::splat(reach), p + DVec3::splat(reach));
            let Some((lo, hi)) = volume.voxel_range(&region) else {
                continue;
            };
            for z in lo[2]..=hi[2] {
                for y in lo[1]..=hi[1] {
                    for x in lo[0]..=hi[0] {
                        let c = volume.voxel_center(x, y, z);
                        let displace = turbulence.map_or(0.0, |t| t.evaluate(c).abs());
                        let edge = self.radius + displace;
                        let d = c.distance(p);
                        let w = if self.falloff > 0.0 {
                            1.0 - smoothstep(edge - self.falloff, edge, d)
                        } else if d <= edge {
                            1.0
                        } else {
                            0.0
                        };
                        if w <= 0.0 {
                            continue;
                        }
                        let value = self.density * w as f32;
                        let old = volume.value(x as i64, y as i64, z as i64);
                        if value > old {
                            volume.set_value(x, y, z, value);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/point_clouds.rs"]
mod tests;
