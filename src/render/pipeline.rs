use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::foundation::core::{DVec2, Ray};
use crate::foundation::error::{HikariError, HikariResult};
use crate::render::framebuffer::{FrameBuffer, PixelAccumulator, write_pixel};
use crate::render::sampler::{PixelSampler, PixelSamples};
use crate::render::settings::{RenderThreading, build_thread_pool};
use crate::render::trace::{TraceContext, Tracer};
use crate::scene::frozen::FrozenScene;

/// Cancellation flag and progress counter shared with a running render.
///
/// The flag is checked before each row; a cancelled render fails with
/// `render error: render cancelled`. The flag stays set until [`RenderControl::reset`].
#[derive(Debug, Default)]
pub struct RenderControl {
    cancel: AtomicBool,
    rows_done: AtomicUsize,
}

impl RenderControl {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.cancel.store(false, Ordering::Relaxed);
        self.rows_done.store(0, Ordering::Relaxed);
    }

    /// Rows finished by the current (or last) render.
    pub fn rows_done(&self) -> usize {
        self.rows_done.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pixels: u64,
    pub samples: u64,
    pub rows: u64,
    pub elapsed: Duration,
}

/// Renders a frozen scene into `fb`, resizing it to the scene resolution.
///
/// Rows are independent work units: each pixel is owned by the row that computes it, and every
/// pixel draws its samples from a generator seeded by its coordinates, so serial and parallel
/// renders produce identical images. Pixels outside the render region are left at zero.
#[tracing::instrument(skip_all)]
pub fn render_frame(
    scene: &FrozenScene<'_>,
    fb: &mut FrameBuffer,
    threading: &RenderThreading,
    control: &RenderControl,
) -> HikariResult<RenderStats> {
    let settings = scene.settings();
    let [w, h] = settings.resolution;
    if fb.width() != w || fb.height() != h {
        fb.resize(w, h);
    }
    let ([x0, y0], [x1, y1]) = settings.region_or_full();
    let spp = settings.samples_per_pixel();
    let rows = (y1 - y0) as usize;
    let pixels = u64::from(x1 - x0) * rows as u64;

    tracing::info!(
        width = w,
        height = h,
        samples_per_pixel = spp,
        instances = scene.instance_count(),
        light_samples = scene.light_sample_count(),
        parallel = threading.parallel,
        "render start"
    );
    control.rows_done.store(0, Ordering::Relaxed);
    let started = Instant::now();

    let job = RowJob {
        scene,
        tracer: Tracer::new(scene),
        sampler: PixelSampler::new(settings),
        channels: fb.channels(),
        span: (x0, x1),
        control,
    };
    let stride = fb.row_stride().max(1);

    if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            fb.data_mut()
                .par_chunks_exact_mut(stride)
                .enumerate()
                .skip(y0 as usize)
                .take(rows)
                .try_for_each(|(y, row)| job.render_row(y as u32, row))
        })?;
    } else {
        for (y, row) in fb.rows_mut().enumerate().skip(y0 as usize).take(rows) {
            job.render_row(y as u32, row)?;
        }
    }

    let stats = RenderStats {
        pixels,
        samples: pixels * u64::from(spp),
        rows: rows as u64,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        pixels = stats.pixels,
        samples = stats.samples,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "render finished"
    );
    Ok(stats)
}

struct RowJob<'j> {
    scene: &'j FrozenScene<'j>,
    tracer: Tracer<'j>,
    sampler: PixelSampler,
    channels: usize,
    span: (u32, u32),
    control: &'j RenderControl,
}

impl RowJob<'_> {
    fn render_row(&self, y: u32, row: &mut [f32]) -> HikariResult<()> {
        if self.control.is_cancelled() {
            tracing::debug!(row = y, "render cancelled");
            return Err(HikariError::render("render cancelled"));
        }
        let settings = self.scene.settings();
        let [w, h] = settings.resolution;
        let (w, h) = (f64::from(w), f64::from(h));
        let camera = self.scene.camera();
        let mut samples = PixelSamples::new();

        for x in self.span.0..self.span.1 {
            self.sampler.samples(x, y, &mut samples);
            let mut acc = PixelAccumulator::default();
            for s in &samples {
                let uv = DVec2::new(
                    (f64::from(x) + s.offset.x) / w,
                    1.0 - (f64::from(y) + s.offset.y) / h,
                );
                let ray = camera.ray(uv, Ray::DEFAULT_TMIN, Ray::DEFAULT_TMAX);
                let cx = TraceContext::camera(settings, self.scene.target, s.time);
                acc.add(self.tracer.trace(&cx, &ray));
            }
            let i = x as usize * self.channels;
            write_pixel(&mut row[i..i + self.channels], acc.value());
        }

        self.control.rows_done.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
