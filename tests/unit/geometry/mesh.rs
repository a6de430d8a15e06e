use super::*;

fn unit_quad() -> Mesh {
    let mut m = Mesh::new();
    let a = m.add_vertex(DVec3::new(-1.0, -1.0, 0.0));
    let b = m.add_vertex(DVec3::new(1.0, -1.0, 0.0));
    let c = m.add_vertex(DVec3::new(1.0, 1.0, 0.0));
    let d = m.add_vertex(DVec3::new(-1.0, 1.0, 0.0));
    m.add_face([a, b, c]);
    m.add_face([a, c, d]);
    m
}

#[test]
fn ray_hits_quad_from_front_and_back() {
    let m = unit_quad();
    let front = Ray::new(DVec3::new(0.2, 0.3, 5.0), DVec3::new(0.0, 0.0, -1.0));
    let hit = (0..2).find_map(|f| m.intersect_face(f, &front, 0.0)).unwrap();
    assert!((hit.t - 5.0).abs() < 1e-12);

    let back = Ray::new(DVec3::new(0.2, 0.3, -5.0), DVec3::new(0.0, 0.0, 1.0));
    assert!((0..2).any(|f| m.intersect_face(f, &back, 0.0).is_some()));
}

#[test]
fn velocity_moves_geometry_with_time() {
    let mut m = unit_quad();
    m.set_velocities(vec![DVec3::new(4.0, 0.0, 0.0); 4]).unwrap();
    assert!(m.has_motion());

    let ray = Ray::new(DVec3::new(3.5, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
    assert!((0..2).all(|f| m.intersect_face(f, &ray, 0.0).is_none()));
    assert!((0..2).any(|f| m.intersect_face(f, &ray, 0.75).is_some()));

    let swept = m.swept_bounds(0.0, 1.0);
    assert_eq!(swept.min.x, -1.0);
    assert_eq!(swept.max.x, 5.0);
}

#[test]
fn zero_velocity_is_not_motion() {
    let mut m = unit_quad();
    m.set_velocities(vec![DVec3::ZERO; 4]).unwrap();
    assert!(!m.has_motion());
    assert_eq!(m.position_at(2, 0.9), m.positions()[2]);
}

#[test]
fn attribute_counts_must_match_vertices() {
    let mut m = unit_quad();
    assert!(m.set_velocities(vec![DVec3::ZERO; 3]).is_err());
    assert!(m.set_uvs(vec![DVec2::ZERO; 5]).is_err());
}

#[test]
fn validate_rejects_out_of_range_faces() {
    let mut m = unit_quad();
    assert!(m.validate().is_ok());
    m.add_face([0, 1, 9]);
    assert!(m.validate().is_err());
}

#[test]
fn surface_point_interpolates_normals_and_groups() {
    let mut m = unit_quad();
    m.compute_normals();
    let g = m.add_group("trim");
    assert_eq!(m.add_group("trim"), g);
    m.add_face_in_group([0, 1, 2], g);

    let ray = Ray::new(DVec3::new(0.5, -0.5, 1.0), DVec3::new(0.0, 0.0, -1.0));
    let hit = m.intersect_face(2, &ray, 0.0).unwrap();
    let sp = m.surface_point(&hit, 0.0);
    assert_eq!(sp.group, g);
    assert!((sp.normal - DVec3::Z).length() < 1e-12);
    assert!((sp.position - DVec3::new(0.5, -0.5, 0.0)).length() < 1e-12);
}
