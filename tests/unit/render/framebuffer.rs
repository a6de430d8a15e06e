use super::*;

fn tmp(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("hikari-fb-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn constant_samples_average_exactly() {
    let c = Rgba::new(0.1, 0.7, 0.3, 1.0);
    for n in [1, 4, 9, 36] {
        let mut acc = PixelAccumulator::default();
        for _ in 0..n {
            acc.add(c);
        }
        assert_eq!(acc.value(), c, "n = {n}");
    }
}

#[test]
fn accumulator_is_arithmetic_mean() {
    let mut acc = PixelAccumulator::default();
    acc.add(Rgba::new(0.0, 0.0, 0.0, 0.0));
    acc.add(Rgba::new(1.0, 1.0, 1.0, 1.0));
    assert_eq!(acc.value(), Rgba::new(0.5, 0.5, 0.5, 0.5));
    assert_eq!(acc.count(), 2);
}

#[test]
fn fb_file_keeps_exact_floats() {
    let mut fb = FrameBuffer::new(3, 2, ChannelLayout::Rgba);
    fb.set_pixel(2, 1, Rgba::new(1.5, -0.25, 1e-7, 0.5));
    let p = tmp("a.fb");
    fb.save(&p).unwrap();
    let back = FrameBuffer::load_fb(&p).unwrap();
    assert_eq!(back, fb);
}

#[test]
fn rgb_layout_reports_opaque_alpha() {
    let mut fb = FrameBuffer::new(1, 1, ChannelLayout::Rgb);
    fb.set_pixel(0, 0, Rgba::new(0.2, 0.3, 0.4, 0.1));
    assert_eq!(fb.data().len(), 3);
    assert_eq!(fb.pixel(0, 0).a, 1.0);
}

#[test]
fn corrupt_headers_are_rejected() {
    assert!(FrameBuffer::read_from(&b"NOPE"[..]).is_err());
    let mut bytes = Vec::new();
    FrameBuffer::new(2, 2, ChannelLayout::Rgb)
        .write_to(&mut bytes)
        .unwrap();
    bytes.truncate(bytes.len() - 4);
    assert!(FrameBuffer::read_from(&bytes[..]).is_err());
}

#[test]
fn png_export_clamps_and_encodes_srgb() {
    let mut fb = FrameBuffer::new(2, 1, ChannelLayout::Rgba);
    fb.set_pixel(0, 0, Rgba::new(4.0, 0.0, 0.2161, 1.0));
    let px = fb.to_rgba8();
    assert_eq!(&px[0..4], &[255, 0, 128, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);

    let p = tmp("a.png");
    fb.save(&p).unwrap();
    let img = image::open(&p).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
}

#[test]
fn layout_names_parse() {
    assert_eq!(ChannelLayout::parse("rgba").unwrap().channels(), 4);
    assert!(ChannelLayout::parse("rgbz").is_err());
}

#[test]
fn huge_header_dimensions_fail_without_allocating() {
    for (w, h) in [(u32::MAX, u32::MAX), (65_536, 65_536)] {
        let mut bytes = FB_MAGIC.to_vec();
        for v in [FB_VERSION, w, h, 4] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(
            matches!(FrameBuffer::read_from(&bytes[..]), Err(HikariError::Validation(_))),
            "{w}x{h}"
        );
    }
}
