use crate::foundation::core::{DMat4, DVec2, DVec3, Ray};
use crate::foundation::error::{HikariError, HikariResult};
use crate::transform::affine::Transform;

/// Pinhole perspective camera looking down its local -Z with +Y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Width over height. `None` follows the render resolution.
    pub aspect: Option<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov: 30.0,
            aspect: None,
        }
    }
}

/// Camera resolved for one image.
#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    origin: DVec3,
    rotation: DMat4,
    half_height: f64,
    half_width: f64,
}

impl Camera {
    pub fn validate(&self) -> HikariResult<()> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(HikariError::validation(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if let Some(a) = self.aspect
            && !(a > 0.0 && a.is_finite())
        {
            return Err(HikariError::validation("camera aspect must be positive"));
        }
        self.transform.validate()
    }

    pub fn rig(&self, width: u32, height: u32) -> HikariResult<CameraRig> {
        self.validate()?;
        let aspect = self
            .aspect
            .unwrap_or(f64::from(width) / f64::from(height.max(1)));
        let half_height = (self.fov.to_radians() * 0.5).tan();
        Ok(CameraRig {
            origin: self.transform.translate,
            rotation: self.transform.rotation_matrix(),
            half_height,
            half_width: half_height * aspect,
        })
    }
}

impl CameraRig {
    /// Primary ray through screen coordinate `uv`, where `(0, 0)` is bottom-left and `(1, 1)` top-right.
    pub fn ray(&self, uv: DVec2, tmin: f64, tmax: f64) -> Ray {
        let x = (2.0 * uv.x - 1.0) * self.half_width;
        let y = (2.0 * uv.y - 1.0) * self.half_height;
        let dir = self
            .rotation
            .transform_vector3(DVec3::new(x, y, -1.0))
            .normalize();
        Ray::with_range(self.origin, dir, tmin, tmax)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
