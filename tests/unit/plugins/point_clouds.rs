use std::path::Path;

use super::*;
use crate::geometry::mesh::Mesh;
use crate::geometry::turbulence::Turbulence;
use crate::geometry::volume::Volume;

fn unit_volume(res: usize) -> Volume {
    let mut vol = Volume::new();
    vol.set_bounds(Bounds3::new(DVec3::splat(-1.0), DVec3::ONE))
        .unwrap();
    vol.resize(res, res, res).unwrap();
    vol
}

fn run(p: &PointCloudsProcedure, vol: &mut Volume, mesh: Option<&mut Mesh>, turb: Option<&Turbulence>) {
    p.run(ProcedureInputs {
        mesh,
        volume: Some(vol),
        turbulence: turb,
        base_dir: Path::new("."),
    })
    .unwrap();
}

#[test]
fn origin_sphere_is_dense_inside_and_empty_outside() {
    let mut vol = unit_volume(20);
    let p = PointCloudsProcedure::default();
    run(&p, &mut vol, None, None);

    assert!(vol.sample(DVec3::ZERO).unwrap() > 0.999);
    assert_eq!(vol.sample(DVec3::new(0.95, 0.95, 0.95)), Some(0.0));
}

#[test]
fn mesh_vertices_seed_the_cloud() {
    let mut vol = unit_volume(20);
    let mut mesh = Mesh::new();
    mesh.add_vertex(DVec3::new(0.5, 0.5, 0.5));
    let mut p = PointCloudsProcedure::default();
    p.set_property("radius", &PropertyValue::Scalar(0.3)).unwrap();
    run(&p, &mut vol, Some(&mut mesh), None);

    assert!(vol.sample(DVec3::new(0.5, 0.5, 0.5)).unwrap() > 0.99);
    assert_eq!(vol.sample(DVec3::new(-0.5, -0.5, -0.5)), Some(0.0));
}

#[test]
fn turbulence_only_grows_the_sphere() {
    let mut plain = unit_volume(16);
    let mut noisy = unit_volume(16);
    let mut p = PointCloudsProcedure::default();
    p.set_property("radius", &PropertyValue::Scalar(0.4)).unwrap();
    run(&p, &mut plain, None, None);

    let turb = Turbulence {
        amplitude: DVec3::new(0.3, 1.0, 1.0),
        ..Turbulence::default()
    };
    run(&p, &mut noisy, None, Some(&turb));

    let plain_sum: f32 = plain.data().iter().sum();
    let noisy_sum: f32 = noisy.data().iter().sum();
    assert!(noisy_sum >= plain_sum);
    for (a, b) in plain.data().iter().zip(noisy.data()) {
        assert!(b >= a);
    }
}

#[test]
fn unallocated_volume_is_rejected() {
    let mut vol = Volume::new();
    let p = PointCloudsProcedure::default();
    let err = p
        .run(ProcedureInputs {
            mesh: None,
            volume: Some(&mut vol),
            turbulence: None,
            base_dir: Path::new("."),
        })
        .unwrap_err();
    assert!(err.to_string().contains("resolution"));
}
