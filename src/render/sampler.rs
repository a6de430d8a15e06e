use smallvec::SmallVec;

use crate::foundation::core::DVec2;
use crate::foundation::math::{Rng64, pixel_seed};
use crate::render::settings::RenderSettings;

const STREAM_POSITION: u32 = 0;
const STREAM_TIME: u32 = 1;

/// One sub-pixel sample: offset inside the pixel in `[0, 1)^2` and shutter time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    pub offset: DVec2,
    pub time: f64,
}

pub type PixelSamples = SmallVec<[PixelSample; 64]>;

/// Stratified pixel and time sampler keyed by pixel coordinate.
///
/// Positions are jittered inside an `nx * ny` grid of strata. Times are stratified into
/// `nx * ny` slices and the slices are shuffled across the spatial strata, using a second
/// stream so positions do not depend on the shutter.
#[derive(Clone, Copy, Debug)]
pub struct PixelSampler {
    nx: u32,
    ny: u32,
    jitter: f64,
    t0: f64,
    t1: f64,
    seed: u64,
}

impl PixelSampler {
    pub fn new(settings: &RenderSettings) -> Self {
        let [nx, ny] = settings.pixel_samples;
        let [t0, t1] = settings.sample_time_range;
        Self {
            nx,
            ny,
            jitter: settings.jitter,
            t0,
            t1,
            seed: settings.seed,
        }
    }

    pub fn count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    pub fn samples(&self, x: u32, y: u32, out: &mut PixelSamples) {
        out.clear();
        let n = self.count();
        let mut pos_rng = Rng64::new(pixel_seed(self.seed, x, y, STREAM_POSITION));
        let mut time_rng = Rng64::new(pixel_seed(self.seed, x, y, STREAM_TIME));

        let mut slices: SmallVec<[u32; 64]> = (0..n as u32).collect();
        time_rng.shuffle(&mut slices);

        let du = 1.0 / f64::from(self.nx);
        let dv = 1.0 / f64::from(self.ny);
        for j in 0..self.ny {
            for i in 0..self.nx {
                let ju = 0.5 + self.jitter * (pos_rng.next_f64_01() - 0.5);
                let jv = 0.5 + self.jitter * (pos_rng.next_f64_01() - 0.5);
                let offset = DVec2::new((f64::from(i) + ju) * du, (f64::from(j) + jv) * dv);

                let k = (j * self.nx + i) as usize;
                let slice = f64::from(slices[k]) + time_rng.next_f64_01();
                let time = self.t0 + (self.t1 - self.t0) * (slice / n as f64);
                out.push(PixelSample { offset, time });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sampler.rs"]
mod tests;
