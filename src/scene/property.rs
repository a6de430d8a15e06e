//! Typed entity properties and per-kind property tables.

use crate::foundation::core::{DVec2, DVec3};
use crate::foundation::error::{HikariError, HikariResult};

/// A property value as supplied by scene construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(f64),
    Vec2([f64; 2]),
    Vec3([f64; 3]),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar,
    Vec2,
    Vec3,
    Str,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Str => "string",
        }
    }
}

/// One recognized property key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
}

impl PropertySpec {
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self { name, kind }
    }
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Scalar(_) => PropertyKind::Scalar,
            Self::Vec2(_) => PropertyKind::Vec2,
            Self::Vec3(_) => PropertyKind::Vec3,
            Self::Str(_) => PropertyKind::Str,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::Vec2(v) => v.iter().all(|c| c.is_finite()),
            Self::Vec3(v) => v.iter().all(|c| c.is_finite()),
            Self::Str(_) => true,
        }
    }

    pub fn as_scalar(&self) -> HikariResult<f64> {
        match self {
            Self::Scalar(v) => Ok(*v),
            other => Err(type_mismatch(PropertyKind::Scalar, other)),
        }
    }

    pub fn as_vec2(&self) -> HikariResult<DVec2> {
        match self {
            Self::Vec2(v) => Ok(DVec2::from_array(*v)),
            other => Err(type_mismatch(PropertyKind::Vec2, other)),
        }
    }

    pub fn as_vec3(&self) -> HikariResult<DVec3> {
        match self {
            Self::Vec3(v) => Ok(DVec3::from_array(*v)),
            other => Err(type_mismatch(PropertyKind::Vec3, other)),
        }
    }

    pub fn as_str(&self) -> HikariResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            other => Err(type_mismatch(PropertyKind::Str, other)),
        }
    }

    /// Scalar read as a non-negative count.
    pub fn as_count(&self) -> HikariResult<u32> {
        let v = self.as_scalar()?;
        if !(0.0..=f64::from(u32::MAX)).contains(&v) {
            return Err(HikariError::validation(format!(
                "expected a non-negative count, got {v}"
            )));
        }
        Ok(v.round() as u32)
    }
}

fn type_mismatch(expected: PropertyKind, got: &PropertyValue) -> HikariError {
    HikariError::validation(format!(
        "expected {} value, got {}",
        expected.as_str(),
        got.kind().as_str()
    ))
}

/// Looks up `key` in `specs` and checks the value type.
pub fn check_property<'a>(
    specs: &'a [PropertySpec],
    entity: &str,
    key: &str,
    value: &PropertyValue,
) -> HikariResult<&'a PropertySpec> {
    let spec = specs
        .iter()
        .find(|s| s.name == key)
        .ok_or_else(|| HikariError::unknown_property(entity, key))?;
    if spec.kind != value.kind() {
        return Err(HikariError::validation(format!(
            "property '{key}' on '{entity}' expects {}, got {}",
            spec.kind.as_str(),
            value.kind().as_str()
        )));
    }
    if !value.is_finite() {
        return Err(HikariError::validation(format!(
            "property '{key}' on '{entity}' must be finite"
        )));
    }
    Ok(spec)
}

use PropertyKind::{Scalar, Vec2, Vec3};

pub const TRANSFORM_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("translate", Vec3),
    PropertySpec::new("rotate", Vec3),
    PropertySpec::new("scale", Vec3),
];

pub const CAMERA_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("translate", Vec3),
    PropertySpec::new("rotate", Vec3),
    PropertySpec::new("fov", Scalar),
    PropertySpec::new("aspect", Scalar),
];

pub const LIGHT_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("translate", Vec3),
    PropertySpec::new("rotate", Vec3),
    PropertySpec::new("scale", Vec3),
    PropertySpec::new("color", Vec3),
    PropertySpec::new("intensity", Scalar),
    PropertySpec::new("sample_count", Scalar),
    PropertySpec::new("double_sided", Scalar),
];

pub const VOLUME_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("bounds_min", Vec3),
    PropertySpec::new("bounds_max", Vec3),
    PropertySpec::new("resolution", Vec3),
];

pub const TURBULENCE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("amplitude", Vec3),
    PropertySpec::new("frequency", Vec3),
    PropertySpec::new("offset", Vec3),
    PropertySpec::new("lacunarity", Scalar),
    PropertySpec::new("gain", Scalar),
    PropertySpec::new("octaves", Scalar),
];

pub const RENDERER_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("resolution", Vec2),
    PropertySpec::new("pixelsamples", Vec2),
    PropertySpec::new("jitter", Scalar),
    PropertySpec::new("sample_time_range", Vec2),
    PropertySpec::new("cast_shadow", Scalar),
    PropertySpec::new("max_reflect_depth", Scalar),
    PropertySpec::new("max_refract_depth", Scalar),
    PropertySpec::new("raymarch_step", Scalar),
    PropertySpec::new("raymarch_shadow_step", Scalar),
    PropertySpec::new("raymarch_reflect_step", Scalar),
    PropertySpec::new("raymarch_refract_step", Scalar),
    PropertySpec::new("opacity_threshold", Scalar),
    PropertySpec::new("seed", Scalar),
    PropertySpec::new("region_min", Vec2),
    PropertySpec::new("region_max", Vec2),
];

pub const NO_PROPERTIES: &[PropertySpec] = &[];

#[cfg(test)]
#[path = "../../tests/unit/scene/property.rs"]
mod tests;
