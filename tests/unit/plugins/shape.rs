use std::path::Path;

use super::*;

fn build(shape: &str, divisions: f64) -> Mesh {
    let mut p = ShapeProcedure::default();
    p.set_property("shape", &PropertyValue::Str(shape.to_owned()))
        .unwrap();
    p.set_property("size", &PropertyValue::Scalar(2.0)).unwrap();
    p.set_property("divisions", &PropertyValue::Scalar(divisions))
        .unwrap();
    let mut mesh = Mesh::new();
    p.run(ProcedureInputs {
        mesh: Some(&mut mesh),
        volume: None,
        turbulence: None,
        base_dir: Path::new("."),
    })
    .unwrap();
    mesh
}

#[test]
fn plane_is_flat_and_spans_size() {
    let mesh = build("plane", 4.0);
    assert_eq!(mesh.face_count(), 32);
    let b = mesh.bounds();
    assert_eq!(b.min, DVec3::new(-1.0, 0.0, -1.0));
    assert_eq!(b.max, DVec3::new(1.0, 0.0, 1.0));
    mesh.validate().unwrap();
}

#[test]
fn plane_faces_wind_toward_plus_y() {
    let mesh = build("plane", 1.0);
    for f in 0..mesh.face_count() {
        let [a, b, c] = mesh.triangle_at(f, 0.0);
        assert!((b - a).cross(c - a).y > 0.0);
    }
}

#[test]
fn box_has_twelve_outward_triangles() {
    let mesh = build("box", 1.0);
    assert_eq!(mesh.face_count(), 12);
    for f in 0..mesh.face_count() {
        let [a, b, c] = mesh.triangle_at(f, 0.0);
        let n = (b - a).cross(c - a);
        let center = (a + b + c) / 3.0;
        assert!(n.dot(center) > 0.0);
    }
}

#[test]
fn sphere_vertices_lie_on_radius() {
    let mesh = build("sphere", 8.0);
    for p in mesh.positions() {
        assert!((p.length() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn unknown_shape_is_rejected() {
    let mut p = ShapeProcedure::default();
    assert!(
        p.set_property("shape", &PropertyValue::Str("torus".into()))
            .is_err()
    );
}
