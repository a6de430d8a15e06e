use super::*;

#[test]
fn center_ray_looks_down_negative_z() {
    let cam = Camera {
        transform: Transform::from_translate(DVec3::new(0.0, 1.0, 5.0)),
        ..Camera::default()
    };
    let rig = cam.rig(640, 480).unwrap();
    let r = rig.ray(DVec2::splat(0.5), 0.0, 100.0);
    assert_eq!(r.orig, DVec3::new(0.0, 1.0, 5.0));
    assert!((r.dir - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
}

#[test]
fn top_of_screen_points_up() {
    let rig = Camera::default().rig(100, 100).unwrap();
    let top = rig.ray(DVec2::new(0.5, 1.0), 0.0, 1.0);
    assert!(top.dir.y > 0.0);
    let expected = (15.0f64).to_radians().tan();
    assert!((top.dir.y / -top.dir.z - expected).abs() < 1e-12);
}

#[test]
fn aspect_widens_horizontal_extent() {
    let rig = Camera::default().rig(200, 100).unwrap();
    let right = rig.ray(DVec2::new(1.0, 0.5), 0.0, 1.0);
    let expected = 2.0 * (15.0f64).to_radians().tan();
    assert!((right.dir.x / -right.dir.z - expected).abs() < 1e-12);
}

#[test]
fn rotation_turns_view_direction() {
    let cam = Camera {
        transform: Transform {
            rotate: DVec3::new(0.0, 90.0, 0.0),
            ..Transform::default()
        },
        ..Camera::default()
    };
    let r = cam.rig(10, 10).unwrap().ray(DVec2::splat(0.5), 0.0, 1.0);
    assert!((r.dir - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
}

#[test]
fn bad_fov_is_rejected() {
    let cam = Camera {
        fov: 180.0,
        ..Camera::default()
    };
    assert!(cam.rig(10, 10).is_err());
}
