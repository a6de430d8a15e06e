use super::*;

#[test]
fn defaults_are_valid() {
    let s = RenderSettings::default();
    s.validate().unwrap();
    assert_eq!(s.samples_per_pixel(), 9);
    assert_eq!(s.opacity_threshold, 0.995);
    assert_eq!(s.raymarch_step_for(RayKind::Shadow), 0.05);
}

#[test]
fn invalid_settings_are_rejected() {
    let bad = [
        RenderSettings {
            resolution: [0, 10],
            ..RenderSettings::default()
        },
        RenderSettings {
            pixel_samples: [3, 0],
            ..RenderSettings::default()
        },
        RenderSettings {
            raymarch_shadow_step: 0.0,
            ..RenderSettings::default()
        },
        RenderSettings {
            sample_time_range: [1.0, 0.0],
            ..RenderSettings::default()
        },
        RenderSettings {
            region_min: Some([10, 10]),
            region_max: Some([10, 20]),
            ..RenderSettings::default()
        },
    ];
    for s in bad {
        assert!(matches!(s.validate(), Err(HikariError::Validation(_))), "{s:?}");
    }
}

#[test]
fn region_defaults_to_full_frame() {
    let s = RenderSettings {
        resolution: [8, 4],
        ..RenderSettings::default()
    };
    assert_eq!(s.region_or_full(), ([0, 0], [8, 4]));

    let half = RenderSettings {
        region_min: Some([2, 1]),
        ..s.clone()
    };
    assert_eq!(half.region_or_full(), ([2, 1], [8, 4]));
    half.validate().unwrap();

    let wide = RenderSettings {
        resolution: [16, 12],
        ..half
    };
    assert_eq!(wide.region_or_full(), ([2, 1], [16, 12]));
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
}
