use super::*;

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn composition_order_is_translate_rotate_scale() {
    let xf = Transform {
        translate: DVec3::new(10.0, 0.0, 0.0),
        rotate: DVec3::new(0.0, 0.0, 90.0),
        scale: DVec3::new(2.0, 1.0, 1.0),
    };
    // Scale x first (1 -> 2), rotate +90 about z (-> +y), then translate.
    let p = xf.to_matrix().transform_point3(DVec3::X);
    assert!(close(p, DVec3::new(10.0, 2.0, 0.0)), "{p:?}");
}

#[test]
fn rotation_applies_x_before_y() {
    let xf = Transform {
        rotate: DVec3::new(90.0, 90.0, 0.0),
        ..Transform::default()
    };
    // +y rotated about x by 90 -> +z, then about y by 90 -> +x.
    let p = xf.to_matrix().transform_point3(DVec3::Y);
    assert!(close(p, DVec3::X), "{p:?}");
}

#[test]
fn zero_scale_is_rejected() {
    let xf = Transform {
        scale: DVec3::new(1.0, 0.0, 1.0),
        ..Transform::default()
    };
    assert!(InstanceTransform::new(&xf).is_err());

    let nan = Transform::from_translate(DVec3::new(f64::NAN, 0.0, 0.0));
    assert!(nan.validate().is_err());
}

#[test]
fn object_ray_keeps_world_t() {
    let xf = Transform {
        translate: DVec3::new(0.0, 0.0, -5.0),
        scale: DVec3::splat(2.0),
        ..Transform::default()
    };
    let inst = InstanceTransform::new(&xf).unwrap();
    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
    let local = inst.ray_to_object(&ray);
    let world_at = inst.point_to_world(local.at(3.0));
    assert!(close(world_at, ray.at(3.0)));
}

#[test]
fn normals_stay_perpendicular_under_non_uniform_scale() {
    let xf = Transform {
        scale: DVec3::new(4.0, 1.0, 1.0),
        rotate: DVec3::new(0.0, 0.0, 30.0),
        ..Transform::default()
    };
    let inst = InstanceTransform::new(&xf).unwrap();
    // Plane through the origin spanned by (1,1,0) and z; local normal (1,-1,0).
    let tangent = inst.world.transform_vector3(DVec3::new(1.0, 1.0, 0.0));
    let n = inst.normal_to_world(DVec3::new(1.0, -1.0, 0.0));
    assert!(n.dot(tangent).abs() < 1e-9);
    assert!((n.length() - 1.0).abs() < 1e-9);
}

#[test]
fn world_bounds_contain_every_transformed_corner() {
    let xf = Transform {
        translate: DVec3::new(1.0, 2.0, 3.0),
        rotate: DVec3::new(20.0, 45.0, 10.0),
        scale: DVec3::new(3.0, 0.5, 1.0),
    };
    let inst = InstanceTransform::new(&xf).unwrap();
    let local = Bounds3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let world = inst.bounds_to_world(&local).expand(1e-9);
    for c in local.corners() {
        assert!(world.contains(inst.point_to_world(c)));
    }
}
