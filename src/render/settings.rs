use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::shader::RayKind;

/// Image and integration settings, filled from renderer properties.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub resolution: [u32; 2],
    pub pixel_samples: [u32; 2],
    /// Fraction of the stratum a sample may move away from its center, in `[0, 1]`.
    pub jitter: f64,
    /// Shutter interval; `[t0, t1)` with `t0 <= t1`.
    pub sample_time_range: [f64; 2],
    pub cast_shadow: bool,
    pub max_reflect_depth: u32,
    pub max_refract_depth: u32,
    pub raymarch_step: f64,
    pub raymarch_shadow_step: f64,
    pub raymarch_reflect_step: f64,
    pub raymarch_refract_step: f64,
    pub opacity_threshold: f32,
    pub seed: u64,
    /// Top-left corner of the pixel window to render; `[0, 0]` when unset.
    pub region_min: Option<[u32; 2]>,
    /// Exclusive bottom-right corner of the window; the resolution when unset.
    pub region_max: Option<[u32; 2]>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: [320, 240],
            pixel_samples: [3, 3],
            jitter: 1.0,
            sample_time_range: [0.0, 1.0],
            cast_shadow: true,
            max_reflect_depth: 5,
            max_refract_depth: 5,
            raymarch_step: 0.05,
            raymarch_shadow_step: 0.05,
            raymarch_reflect_step: 0.05,
            raymarch_refract_step: 0.05,
            opacity_threshold: 0.995,
            seed: 0,
            region_min: None,
            region_max: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> HikariResult<()> {
        let [w, h] = self.resolution;
        if w == 0 || h == 0 {
            return Err(HikariError::validation("resolution must be at least 1x1"));
        }
        let [sx, sy] = self.pixel_samples;
        if sx == 0 || sy == 0 || sx > 64 || sy > 64 {
            return Err(HikariError::validation(
                "pixelsamples must be in 1..=64 on each axis",
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(HikariError::validation("jitter must be in [0, 1]"));
        }
        let [t0, t1] = self.sample_time_range;
        if !(t0.is_finite() && t1.is_finite() && t0 <= t1) {
            return Err(HikariError::validation(
                "sample_time_range must be finite with start <= end",
            ));
        }
        for (name, step) in [
            ("raymarch_step", self.raymarch_step),
            ("raymarch_shadow_step", self.raymarch_shadow_step),
            ("raymarch_reflect_step", self.raymarch_reflect_step),
            ("raymarch_refract_step", self.raymarch_refract_step),
        ] {
            if !(step > 0.0 && step.is_finite()) {
                return Err(HikariError::validation(format!("{name} must be positive")));
            }
        }
        if !(self.opacity_threshold > 0.0 && self.opacity_threshold <= 1.0) {
            return Err(HikariError::validation("opacity_threshold must be in (0, 1]"));
        }
        let (min, max) = self.region_or_full();
        if min[0] >= max[0] || min[1] >= max[1] || max[0] > w || max[1] > h {
            return Err(HikariError::validation(
                "render region must be non-empty and inside the resolution",
            ));
        }
        Ok(())
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.pixel_samples[0] * self.pixel_samples[1]
    }

    /// Pixel window `[min, max)` to render; everything outside stays zero. Unset edges fall
    /// back to the frame edges at the current resolution.
    pub fn region_or_full(&self) -> ([u32; 2], [u32; 2]) {
        (
            self.region_min.unwrap_or([0, 0]),
            self.region_max.unwrap_or(self.resolution),
        )
    }

    pub fn raymarch_step_for(&self, kind: RayKind) -> f64 {
        match kind {
            RayKind::Camera => self.raymarch_step,
            RayKind::Shadow => self.raymarch_shadow_step,
            RayKind::Reflect => self.raymarch_reflect_step,
            RayKind::Refract => self.raymarch_refract_step,
        }
    }
}

/// How row work is scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Defaults with `HIKARI_RENDER_THREADS` applied when it holds a positive integer.
    pub fn from_env() -> Self {
        let threads = std::env::var("HIKARI_RENDER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self {
            threads,
            ..Self::default()
        }
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> HikariResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HikariError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HikariError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/settings.rs"]
mod tests;
