use super::*;
use crate::geometry::mesh::Mesh;

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("hikari_ply_proc_{tag}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn loads_relative_to_base_dir() {
    let dir = temp_dir("ok");
    std::fs::write(
        dir.join("tri.ply"),
        "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\n\
         property float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n\
         0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n",
    )
    .unwrap();

    let mut p = StanfordPlyProcedure::default();
    p.set_property("filepath", &PropertyValue::Str("tri.ply".into()))
        .unwrap();
    p.set_property("io_mode", &PropertyValue::Str("r".into()))
        .unwrap();
    let mut mesh = Mesh::new();
    p.run(ProcedureInputs {
        mesh: Some(&mut mesh),
        volume: None,
        turbulence: None,
        base_dir: &dir,
    })
    .unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = temp_dir("missing");
    let mut p = StanfordPlyProcedure::default();
    p.set_property("filepath", &PropertyValue::Str("nope.ply".into()))
        .unwrap();
    let mut mesh = Mesh::new();
    let err = p
        .run(ProcedureInputs {
            mesh: Some(&mut mesh),
            volume: None,
            turbulence: None,
            base_dir: &dir,
        })
        .unwrap_err();
    assert!(matches!(err, HikariError::Io { .. }));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_mode_is_rejected() {
    let mut p = StanfordPlyProcedure::default();
    assert!(
        p.set_property("io_mode", &PropertyValue::Str("w".into()))
            .is_err()
    );
}
