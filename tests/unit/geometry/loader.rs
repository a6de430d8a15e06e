use super::*;

fn write_tmp(name: &str, body: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("hikari-ply-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join(name);
    std::fs::write(&p, body).unwrap();
    p
}

const QUAD: &str = "ply
format ascii 1.0
comment unit quad
element vertex 4
property float x
property float y
property float z
property float vx
property float vy
property float vz
element face 1
property list uchar int vertex_indices
end_header
-1 0 -1 0 1 0
1 0 -1 0 1 0
1 0 1 0 1 0
-1 0 1 0 1 0
4 0 1 2 3
";

#[test]
fn ascii_quad_is_fan_triangulated_with_velocity() {
    let p = write_tmp("quad.ply", QUAD);
    let mesh = PlyLoader.load(&p, IoMode::Read).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.faces()[1], [0, 2, 3]);
    assert!(mesh.has_motion());
}

#[test]
fn missing_file_is_io_error() {
    let err = PlyLoader
        .load(Path::new("/nonexistent/hikari/missing.ply"), IoMode::Read)
        .unwrap_err();
    assert!(matches!(err, HikariError::Io { .. }));
}

#[test]
fn binary_and_truncated_files_are_rejected() {
    let bin = write_tmp(
        "bin.ply",
        "ply\nformat binary_little_endian 1.0\nend_header\n",
    );
    assert!(matches!(
        PlyLoader.load(&bin, IoMode::Read),
        Err(HikariError::Validation(_))
    ));

    let cut = write_tmp("cut.ply", &QUAD[..QUAD.len() - 12]);
    assert!(PlyLoader.load(&cut, IoMode::Read).is_err());
}

#[test]
fn face_indices_out_of_range_fail_validation() {
    let body = QUAD.replace("4 0 1 2 3", "3 0 1 7");
    let p = write_tmp("oob.ply", &body);
    assert!(PlyLoader.load(&p, IoMode::Read).is_err());
}

#[test]
fn io_mode_parses_read_only() {
    assert_eq!(IoMode::parse("r").unwrap(), IoMode::Read);
    assert!(IoMode::parse("w").is_err());
}

#[test]
fn oversized_face_counts_are_rejected() {
    for row in ["1e30 0 1 2", "5 0 1 2", "nan 0 1 2", "2.5 0 1 2"] {
        let p = write_tmp("count.ply", &QUAD.replace("4 0 1 2 3", row));
        assert!(
            matches!(PlyLoader.load(&p, IoMode::Read), Err(HikariError::Validation(_))),
            "{row}"
        );
    }
}

#[test]
fn negative_and_fractional_indices_are_rejected() {
    for row in ["3 -1 1 2", "3 0 1.7 2", "3 0 1 5e12"] {
        let p = write_tmp("index.ply", &QUAD.replace("4 0 1 2 3", row));
        assert!(
            matches!(PlyLoader.load(&p, IoMode::Read), Err(HikariError::Validation(_))),
            "{row}"
        );
    }
}
