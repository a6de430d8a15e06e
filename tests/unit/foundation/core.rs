use super::*;

#[test]
fn over_composites_front_to_back() {
    let front = Rgba::new(0.25, 0.0, 0.0, 0.5);
    let back = Rgba::new(0.0, 1.0, 0.0, 1.0);
    let out = front.over(back);
    assert_eq!(out, Rgba::new(0.25, 0.5, 0.0, 1.0));

    let clear = Rgba::TRANSPARENT.over(back);
    assert_eq!(clear, back);
}

#[test]
fn box_ray_hits_and_misses() {
    let b = Bounds3::new(DVec3::splat(-1.0), DVec3::splat(1.0));

    let hit = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
    let (t0, t1) = b.intersect_ray(&hit).unwrap();
    assert!((t0 - 4.0).abs() < 1e-12);
    assert!((t1 - 6.0).abs() < 1e-12);

    let miss = Ray::new(DVec3::new(3.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
    assert!(b.intersect_ray(&miss).is_none());
}

#[test]
fn axis_parallel_ray_inside_slab_is_not_rejected() {
    let b = Bounds3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let r = Ray::new(DVec3::new(0.5, 0.5, 5.0), DVec3::new(0.0, 0.0, -1.0));
    assert!(b.intersect_ray(&r).is_some());
}

#[test]
fn line_interval_reports_negative_entry_from_inside() {
    let b = Bounds3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let r = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));
    let (t0, t1) = b.intersect_line(&r).unwrap();
    assert!(t0 < 0.0);
    assert!((t1 - 1.0).abs() < 1e-12);
}

#[test]
fn empty_bounds_is_union_identity() {
    let b = Bounds3::new(DVec3::ZERO, DVec3::ONE);
    assert_eq!(Bounds3::EMPTY.union(b), b);
    assert!(Bounds3::EMPTY.is_empty());
    assert_eq!(Bounds3::EMPTY.size(), DVec3::ZERO);
}
