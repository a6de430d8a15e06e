use std::path::Path;

use super::*;
use crate::geometry::mesh::Mesh;

fn triangle() -> Mesh {
    let mut m = Mesh::new();
    m.add_vertex(DVec3::ZERO);
    m.add_vertex(DVec3::X);
    m.add_vertex(DVec3::Z);
    m.add_face([0, 1, 2]);
    m
}

fn run(p: &VelocityGeneratorProcedure, mesh: &mut Mesh) {
    p.run(ProcedureInputs {
        mesh: Some(mesh),
        volume: None,
        turbulence: None,
        base_dir: Path::new("."),
    })
    .unwrap();
}

#[test]
fn constant_velocity_without_normal_term() {
    let mut mesh = triangle();
    let mut p = VelocityGeneratorProcedure::default();
    p.set_property("velocity", &PropertyValue::Vec3([1.0, 0.0, 0.0]))
        .unwrap();
    p.set_property("normal_scale", &PropertyValue::Scalar(0.0))
        .unwrap();
    run(&p, &mut mesh);
    assert_eq!(mesh.velocities().unwrap(), &[DVec3::X; 3]);
    assert!(mesh.has_motion());
}

#[test]
fn default_pushes_along_normals() {
    let mut mesh = triangle();
    run(&VelocityGeneratorProcedure::default(), &mut mesh);
    let n = mesh.normals().unwrap()[0];
    for v in mesh.velocities().unwrap() {
        assert!((*v - n * 0.05).length() < 1e-12);
    }
}

#[test]
fn zero_settings_produce_a_static_mesh() {
    let mut mesh = triangle();
    let mut p = VelocityGeneratorProcedure::default();
    p.set_property("normal_scale", &PropertyValue::Scalar(0.0))
        .unwrap();
    run(&p, &mut mesh);
    assert!(!mesh.has_motion());
}
