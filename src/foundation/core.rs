pub use glam::{DMat3, DMat4, DVec2, DVec3, Vec3};

/// Linear RGB radiance.
pub type Rgb = Vec3;

/// Linear RGBA color. Traced samples carry premultiplied color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(c: Rgb, a: f32) -> Self {
        Self::new(c.x, c.y, c.z, a)
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Front-to-back "over": `self` is in front of `behind`.
    pub fn over(self, behind: Rgba) -> Rgba {
        let k = 1.0 - self.a;
        Rgba::new(
            self.r + behind.r * k,
            self.g + behind.g * k,
            self.b + behind.b * k,
            self.a + behind.a * k,
        )
    }
}

/// Ray with a valid parameter interval `[tmin, tmax]`.
///
/// `dir` is not required to be normalized; object-space rays keep the world-space `t` scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub orig: DVec3,
    pub dir: DVec3,
    pub tmin: f64,
    pub tmax: f64,
}

impl Ray {
    pub const DEFAULT_TMIN: f64 = 0.001;
    pub const DEFAULT_TMAX: f64 = 1000.0;

    pub fn new(orig: DVec3, dir: DVec3) -> Self {
        Self {
            orig,
            dir,
            tmin: Self::DEFAULT_TMIN,
            tmax: Self::DEFAULT_TMAX,
        }
    }

    pub fn with_range(orig: DVec3, dir: DVec3, tmin: f64, tmax: f64) -> Self {
        Self {
            orig,
            dir,
            tmin,
            tmax,
        }
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.orig + self.dir * t
    }

    pub fn in_range(&self, t: f64) -> bool {
        self.tmin <= t && t <= self.tmax
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds3 {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3 {
    /// Inverted box; the identity for [`Bounds3::union`].
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_point(p: DVec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn centroid(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn add_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Bounds3) -> Bounds3 {
        Bounds3 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand(self, delta: f64) -> Bounds3 {
        Bounds3 {
            min: self.min - DVec3::splat(delta),
            max: self.max + DVec3::splat(delta),
        }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }

    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Slab test. Returns the entry/exit parameters clipped to the ray interval.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, f64)> {
        let mut t0 = ray.tmin;
        let mut t1 = ray.tmax;
        for axis in 0..3 {
            let inv = 1.0 / ray.dir[axis];
            let mut tnear = (self.min[axis] - ray.orig[axis]) * inv;
            let mut tfar = (self.max[axis] - ray.orig[axis]) * inv;
            if tnear > tfar {
                std::mem::swap(&mut tnear, &mut tfar);
            }
            // NaN from 0 * inf compares false and leaves the slab unconstrained.
            if tnear > t0 {
                t0 = tnear;
            }
            if tfar < t1 {
                t1 = tfar;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Unclipped entry/exit parameters, which may be negative when the origin is inside.
    pub fn intersect_line(&self, ray: &Ray) -> Option<(f64, f64)> {
        let line = Ray::with_range(ray.orig, ray.dir, f64::NEG_INFINITY, f64::INFINITY);
        self.intersect_ray(&line)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
