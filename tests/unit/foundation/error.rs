use std::error::Error as _;

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HikariError::name_conflict("cam1")
            .to_string()
            .contains("name conflict:")
    );
    assert!(
        HikariError::unknown_property("cam1", "fov2")
            .to_string()
            .contains("unknown property:")
    );
    assert!(
        HikariError::unknown_plugin("x")
            .to_string()
            .contains("unknown plugin:")
    );
    assert!(
        HikariError::scene_incomplete("x")
            .to_string()
            .contains("scene incomplete:")
    );
    assert!(
        HikariError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(HikariError::render("x").to_string().contains("render error:"));
}

#[test]
fn procedure_error_keeps_plugin_source() {
    let inner = HikariError::io(
        "open mesh file",
        Path::new("missing.ply"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    );
    let err = HikariError::procedure("dragon_proc", inner);
    assert!(err.to_string().contains("dragon_proc"));

    let source = err.source().unwrap();
    assert!(source.to_string().contains("missing.ply"));
    assert!(source.source().unwrap().to_string().contains("no such file"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HikariError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
