use super::*;

#[test]
fn noise_is_deterministic_and_bounded() {
    let t = Turbulence::default();
    let p = DVec3::new(0.3, -1.7, 2.2);
    assert_eq!(t.evaluate(p), t.evaluate(p));
    let bound = t.bound();
    for i in 0..200 {
        let q = DVec3::new(i as f64 * 0.37, i as f64 * -0.11, i as f64 * 0.05);
        assert!(t.evaluate(q).abs() <= bound + 1e-9);
    }
}

#[test]
fn noise_is_continuous_across_lattice_cells() {
    let t = Turbulence {
        octaves: 1,
        ..Turbulence::default()
    };
    let a = t.evaluate(DVec3::new(1.0 - 1e-7, 0.5, 0.5));
    let b = t.evaluate(DVec3::new(1.0 + 1e-7, 0.5, 0.5));
    assert!((a - b).abs() < 1e-5);
}

#[test]
fn zero_amplitude_axis_is_flat() {
    let t = Turbulence {
        amplitude: DVec3::new(1.0, 0.0, 1.0),
        ..Turbulence::default()
    };
    assert_eq!(t.evaluate3(DVec3::new(0.4, 0.2, 0.9)).y, 0.0);
}

#[test]
fn octave_count_is_validated() {
    let t = Turbulence {
        octaves: 0,
        ..Turbulence::default()
    };
    assert!(t.validate().is_err());
    assert!(Turbulence::default().validate().is_ok());
}
