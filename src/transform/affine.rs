use crate::foundation::core::{Bounds3, DMat3, DMat4, DVec3, Ray};
use crate::foundation::error::{HikariError, HikariResult};

/// Translate/rotate/scale parameters. Rotation is in degrees, applied X then Y then Z.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translate: DVec3,
    pub rotate: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: DVec3::ZERO,
            rotate: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translate(translate: DVec3) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    pub fn rotation_matrix(&self) -> DMat4 {
        let r = self.rotate * (std::f64::consts::PI / 180.0);
        DMat4::from_rotation_z(r.z) * DMat4::from_rotation_y(r.y) * DMat4::from_rotation_x(r.x)
    }

    /// Object-to-world matrix, `T * R * S`.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_translation(self.translate)
            * self.rotation_matrix()
            * DMat4::from_scale(self.scale)
    }

    pub fn validate(&self) -> HikariResult<()> {
        let all = [self.translate, self.rotate, self.scale];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(HikariError::validation("transform components must be finite"));
        }
        if self.scale.x == 0.0 || self.scale.y == 0.0 || self.scale.z == 0.0 {
            return Err(HikariError::validation(
                "transform scale must be non-zero on every axis",
            ));
        }
        Ok(())
    }
}

/// Cached matrices for one placed object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub world: DMat4,
    pub inverse: DMat4,
    /// Inverse-transpose of the upper 3x3, for normals.
    pub normal: DMat3,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            world: DMat4::IDENTITY,
            inverse: DMat4::IDENTITY,
            normal: DMat3::IDENTITY,
        }
    }
}

impl InstanceTransform {
    pub fn new(xf: &Transform) -> HikariResult<Self> {
        xf.validate()?;
        let world = xf.to_matrix();
        let inverse = world.inverse();
        if !inverse.is_finite() {
            return Err(HikariError::validation("transform is not invertible"));
        }
        let normal = DMat3::from_mat4(inverse).transpose();
        Ok(Self {
            world,
            inverse,
            normal,
        })
    }

    /// World ray to object space. The direction is not renormalized so `t` stays comparable.
    pub fn ray_to_object(&self, ray: &Ray) -> Ray {
        Ray::with_range(
            self.inverse.transform_point3(ray.orig),
            self.inverse.transform_vector3(ray.dir),
            ray.tmin,
            ray.tmax,
        )
    }

    pub fn point_to_world(&self, p: DVec3) -> DVec3 {
        self.world.transform_point3(p)
    }

    pub fn point_to_object(&self, p: DVec3) -> DVec3 {
        self.inverse.transform_point3(p)
    }

    pub fn normal_to_world(&self, n: DVec3) -> DVec3 {
        (self.normal * n).normalize_or_zero()
    }

    /// Bounds of the eight transformed corners; exact for the box under any affine map.
    pub fn bounds_to_world(&self, local: &Bounds3) -> Bounds3 {
        if local.is_empty() {
            return Bounds3::EMPTY;
        }
        let mut out = Bounds3::EMPTY;
        for c in local.corners() {
            out.add_point(self.world.transform_point3(c));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
