//! Light sources and their precomputed samples.

use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use crate::foundation::core::{DVec3, Rgb};
use crate::foundation::error::{HikariError, HikariResult};
use crate::foundation::math::Rng64;
use crate::render::texture::Texture;
use crate::transform::affine::{InstanceTransform, Transform};

/// Distance at which dome samples are placed; shadow rays toward them span the whole scene.
pub const DOME_RADIUS: f64 = 1.0e6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Grid,
    Sphere,
    Dome,
}

impl LightKind {
    pub fn parse(type_name: &str) -> HikariResult<Self> {
        match type_name {
            "PointLight" => Ok(Self::Point),
            "GridLight" => Ok(Self::Grid),
            "SphereLight" => Ok(Self::Sphere),
            "DomeLight" => Ok(Self::Dome),
            other => Err(HikariError::validation(format!(
                "unknown light type '{other}' (expected PointLight, GridLight, SphereLight or DomeLight)"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Light {
    pub kind: LightKind,
    pub transform: Transform,
    pub color: Rgb,
    pub intensity: f32,
    pub sample_count: u32,
    pub double_sided: bool,
    pub environment_map: Option<Arc<Texture>>,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            color: Rgb::ONE,
            intensity: 1.0,
            sample_count: 16,
            double_sided: false,
            environment_map: None,
        }
    }

    fn effective_sample_count(&self) -> u32 {
        match self.kind {
            LightKind::Point => 1,
            _ => self.sample_count.max(1),
        }
    }

    /// Emitting points (or directions, for a dome) with their share of the light's power.
    pub fn samples(&self) -> HikariResult<Vec<LightSample>> {
        let xf = InstanceTransform::new(&self.transform)?;
        let n = self.effective_sample_count();
        let share = self.color * (self.intensity / n as f32);
        let mut rng = Rng64::new(0x6c69_6768_745f_7331 ^ u64::from(n));

        let mut out = Vec::with_capacity(n as usize);
        match self.kind {
            LightKind::Point => out.push(LightSample {
                position: self.transform.translate,
                normal: DVec3::ZERO,
                color: share,
                emission: Emission::Omni,
            }),
            LightKind::Grid => {
                let cols = (f64::from(n).sqrt().ceil() as u32).max(1);
                let rows = n.div_ceil(cols);
                let normal = xf.normal_to_world(-DVec3::Y);
                for k in 0..n {
                    let (i, j) = (k % cols, k / cols);
                    let u = (f64::from(i) + rng.next_f64_01()) / f64::from(cols) - 0.5;
                    let v = (f64::from(j) + rng.next_f64_01()) / f64::from(rows) - 0.5;
                    out.push(LightSample {
                        position: xf.point_to_world(DVec3::new(u, 0.0, v)),
                        normal,
                        color: share,
                        emission: if self.double_sided {
                            Emission::TwoSided
                        } else {
                            Emission::OneSided
                        },
                    });
                }
            }
            LightKind::Sphere => {
                for d in fibonacci_sphere(n) {
                    out.push(LightSample {
                        position: xf.point_to_world(d),
                        normal: xf.normal_to_world(d),
                        color: share,
                        emission: Emission::OneSided,
                    });
                }
            }
            LightKind::Dome => {
                let rot = self.transform.rotation_matrix();
                for d in fibonacci_sphere(n) {
                    let world_dir = rot.transform_vector3(d).normalize();
                    let tint = match &self.environment_map {
                        Some(tex) => {
                            let (u, v) = latlong_uv(d);
                            tex.lookup(u, v).rgb()
                        }
                        None => Rgb::ONE,
                    };
                    out.push(LightSample {
                        position: world_dir * DOME_RADIUS,
                        normal: -world_dir,
                        color: share * tint,
                        emission: Emission::Omni,
                    });
                }
            }
        }
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emission {
    Omni,
    OneSided,
    TwoSided,
}

/// A point on a light, fixed at scene freeze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    pub position: DVec3,
    pub normal: DVec3,
    pub color: Rgb,
    pub emission: Emission,
}

impl LightSample {
    /// Radiance arriving at `p` before occlusion.
    pub fn illuminate(&self, p: DVec3) -> Rgb {
        let cos = match self.emission {
            Emission::Omni => return self.color,
            Emission::OneSided => self.normal.dot((p - self.position).normalize_or_zero()),
            Emission::TwoSided => self
                .normal
                .dot((p - self.position).normalize_or_zero())
                .abs(),
        };
        self.color * cos.max(0.0) as f32
    }
}

/// `n` nearly uniform unit directions.
fn fibonacci_sphere(n: u32) -> impl Iterator<Item = DVec3> {
    let golden = PI * (3.0 - 5.0f64.sqrt());
    (0..n).map(move |k| {
        let y = 1.0 - 2.0 * (f64::from(k) + 0.5) / f64::from(n);
        let r = (1.0 - y * y).max(0.0).sqrt();
        let phi = golden * f64::from(k);
        DVec3::new(r * phi.cos(), y, r * phi.sin())
    })
}

/// Lat-long mapping with +Y at the top row and -Z at the horizontal center.
pub fn latlong_uv(d: DVec3) -> (f64, f64) {
    let u = 0.5 + d.x.atan2(-d.z) / TAU;
    let v = 0.5 + d.y.clamp(-1.0, 1.0).asin() / PI;
    (u, v)
}

#[cfg(test)]
#[path = "../../tests/unit/render/light.rs"]
mod tests;
