use crate::foundation::core::DVec3;
use crate::foundation::error::{HikariError, HikariResult};
use crate::foundation::math::Rng64;

/// Fractal value-noise field consumed by procedures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turbulence {
    pub amplitude: DVec3,
    pub frequency: DVec3,
    pub offset: DVec3,
    pub lacunarity: f64,
    pub gain: f64,
    pub octaves: u32,
}

impl Default for Turbulence {
    fn default() -> Self {
        Self {
            amplitude: DVec3::ONE,
            frequency: DVec3::ONE,
            offset: DVec3::ZERO,
            lacunarity: 2.0,
            gain: 0.5,
            octaves: 8,
        }
    }
}

fn lattice(seed: u64, x: i64, y: i64, z: i64) -> f64 {
    let key = seed
        ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (z as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    Rng64::new(key).next_f64_01() * 2.0 - 1.0
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Value noise in `[-1, 1]`.
fn value_noise(seed: u64, p: DVec3) -> f64 {
    let base = p.floor();
    let f = p - base;
    let (x0, y0, z0) = (base.x as i64, base.y as i64, base.z as i64);
    let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));
    let mut acc = 0.0;
    for k in 0..2 {
        let wz = if k == 0 { 1.0 - w } else { w };
        for j in 0..2 {
            let wy = if j == 0 { 1.0 - v } else { v };
            for i in 0..2 {
                let wx = if i == 0 { 1.0 - u } else { u };
                acc += wx * wy * wz * lattice(seed, x0 + i, y0 + j, z0 + k);
            }
        }
    }
    acc
}

impl Turbulence {
    pub fn validate(&self) -> HikariResult<()> {
        if self.octaves == 0 || self.octaves > 32 {
            return Err(HikariError::validation(
                "turbulence octaves must be in 1..=32",
            ));
        }
        let vals = [self.amplitude, self.frequency, self.offset];
        if vals.iter().any(|v| !v.is_finite()) || !self.lacunarity.is_finite() || !self.gain.is_finite() {
            return Err(HikariError::validation("turbulence parameters must be finite"));
        }
        Ok(())
    }

    fn fbm(&self, seed: u64, p: DVec3) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut q = p * self.frequency + self.offset;
        for _ in 0..self.octaves {
            sum += amp * value_noise(seed, q);
            q *= self.lacunarity;
            amp *= self.gain;
        }
        sum
    }

    /// Upper bound of `evaluate(p).abs()` over all points.
    pub fn bound(&self) -> f64 {
        let g = self.gain.abs();
        let sum: f64 = (0..self.octaves).map(|i| g.powi(i as i32)).sum();
        self.amplitude.x.abs() * sum
    }

    /// Scalar turbulence scaled by `amplitude.x`.
    pub fn evaluate(&self, p: DVec3) -> f64 {
        self.amplitude.x * self.fbm(0, p)
    }

    /// Decorrelated vector turbulence scaled per axis by `amplitude`.
    pub fn evaluate3(&self, p: DVec3) -> DVec3 {
        DVec3::new(self.fbm(1, p), self.fbm(2, p), self.fbm(3, p)) * self.amplitude
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/turbulence.rs"]
mod tests;
