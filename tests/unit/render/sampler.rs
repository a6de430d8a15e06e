use super::*;

fn sampler(nx: u32, ny: u32, jitter: f64, range: [f64; 2]) -> PixelSampler {
    PixelSampler::new(&RenderSettings {
        pixel_samples: [nx, ny],
        jitter,
        sample_time_range: range,
        ..RenderSettings::default()
    })
}

#[test]
fn each_stratum_holds_one_sample() {
    let s = sampler(4, 3, 1.0, [0.0, 1.0]);
    let mut out = PixelSamples::new();
    s.samples(5, 9, &mut out);
    assert_eq!(out.len(), 12);
    let mut seen = [[false; 4]; 3];
    for p in &out {
        let (i, j) = ((p.offset.x * 4.0) as usize, (p.offset.y * 3.0) as usize);
        assert!(!seen[j][i]);
        seen[j][i] = true;
    }
}

#[test]
fn times_are_stratified_over_the_shutter() {
    let s = sampler(3, 3, 1.0, [0.0, 1.0]);
    let mut out = PixelSamples::new();
    s.samples(0, 0, &mut out);
    let mut slices: Vec<usize> = out.iter().map(|p| (p.time * 9.0) as usize).collect();
    slices.sort_unstable();
    assert_eq!(slices, (0..9).collect::<Vec<_>>());
}

#[test]
fn zero_jitter_uses_stratum_centers() {
    let s = sampler(2, 2, 0.0, [0.0, 1.0]);
    let mut out = PixelSamples::new();
    s.samples(1, 1, &mut out);
    assert_eq!(out[0].offset, DVec2::new(0.25, 0.25));
    assert_eq!(out[3].offset, DVec2::new(0.75, 0.75));
}

#[test]
fn positions_do_not_depend_on_shutter() {
    let open = sampler(3, 3, 1.0, [0.0, 1.0]);
    let closed = sampler(3, 3, 1.0, [0.0, 0.0]);
    let (mut a, mut b) = (PixelSamples::new(), PixelSamples::new());
    open.samples(7, 2, &mut a);
    closed.samples(7, 2, &mut b);
    for (p, q) in a.iter().zip(&b) {
        assert_eq!(p.offset, q.offset);
        assert_eq!(q.time, 0.0);
    }
}

#[test]
fn samples_are_reproducible_per_pixel() {
    let s = sampler(3, 3, 1.0, [0.0, 1.0]);
    let (mut a, mut b, mut c) = (PixelSamples::new(), PixelSamples::new(), PixelSamples::new());
    s.samples(3, 4, &mut a);
    s.samples(3, 4, &mut b);
    s.samples(4, 3, &mut c);
    assert_eq!(a, b);
    assert_ne!(a, c);
}
