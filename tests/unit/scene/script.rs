use super::*;
use crate::foundation::core::Rgba;

const WALL_SCENE: &str = r#"{
  "commands": [
    { "op": "OpenPlugin", "alias": "shape", "implementation": "ShapeProcedure" },
    { "op": "OpenPlugin", "alias": "flat", "implementation": "ConstantShader" },
    { "op": "NewCamera", "name": "cam" },
    { "op": "NewMesh", "name": "wall_mesh" },
    { "op": "NewProcedure", "name": "make_wall", "plugin": "shape" },
    { "op": "AssignMesh", "name": "make_wall", "key": "mesh", "mesh": "wall_mesh" },
    { "op": "RunProcedure", "name": "make_wall" },
    { "op": "NewShader", "name": "paint", "plugin": "flat" },
    { "op": "SetProperty", "name": "paint", "key": "diffuse", "value": [0.25, 0.5, 1.0] },
    { "op": "NewObjectInstance", "name": "wall", "geometry": "wall_mesh" },
    { "op": "SetProperty", "name": "wall", "key": "translate", "value": [0, 0, -5] },
    { "op": "SetProperty", "name": "wall", "key": "rotate", "value": [90, 0, 0] },
    { "op": "SetProperty", "name": "wall", "key": "scale", "value": [20, 20, 20] },
    { "op": "AssignShader", "instance": "wall", "shading_group": "DEFAULT_SHADING_GROUP", "shader": "paint" },
    { "op": "NewFrameBuffer", "name": "fb" },
    { "op": "NewRenderer", "name": "ren" },
    { "op": "AssignCamera", "renderer": "ren", "camera": "cam" },
    { "op": "AssignFrameBuffer", "renderer": "ren", "framebuffer": "fb" },
    { "op": "SetProperty", "name": "ren", "key": "resolution", "value": [4, 3] },
    { "op": "SetProperty", "name": "ren", "key": "pixelsamples", "value": [2, 2] },
    { "op": "RenderScene", "renderer": "ren" }
  ]
}"#;

#[test]
fn commands_parse_with_defaults() {
    let script = SceneScript::from_json_str(
        r#"{"commands": [
            {"op": "NewCamera", "name": "cam"},
            {"op": "NewFrameBuffer", "name": "fb"},
            {"op": "SetProperty", "name": "cam", "key": "fov", "value": 45}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        script.commands,
        vec![
            SceneCommand::NewCamera {
                name: "cam".to_owned(),
                camera_type: "PerspectiveCamera".to_owned(),
            },
            SceneCommand::NewFrameBuffer {
                name: "fb".to_owned(),
                layout: "rgba".to_owned(),
            },
            SceneCommand::SetProperty {
                name: "cam".to_owned(),
                key: "fov".to_owned(),
                value: PropertyValue::Scalar(45.0),
            },
        ]
    );
}

#[test]
fn unknown_ops_and_fields_are_rejected() {
    for bad in [
        r#"{"commands": [{"op": "Teleport", "name": "x"}]}"#,
        r#"{"commands": [{"op": "NewMesh", "name": "m", "color": 1}]}"#,
        r#"{"commands": [{"op": "NewMesh"}]}"#,
    ] {
        assert!(
            matches!(SceneScript::from_json_str(bad), Err(HikariError::Validation(_))),
            "{bad}"
        );
    }
}

#[test]
fn executing_a_script_renders_into_the_framebuffer() {
    let script = SceneScript::from_json_str(WALL_SCENE).unwrap();
    let mut ctx = SceneContext::new();
    let renders = script.execute(&mut ctx).unwrap();

    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].pixels, 12);
    assert_eq!(renders[0].samples, 48);

    let fb = ctx.framebuffer("fb").unwrap();
    assert_eq!((fb.width(), fb.height()), (4, 3));
    let px = fb.pixel(1, 1);
    let expected = Rgba::new(0.25, 0.5, 1.0, 1.0);
    for (got, want) in px.to_array().into_iter().zip(expected.to_array()) {
        assert!((got - want).abs() < 1e-6, "{px:?}");
    }
}

#[test]
fn execution_stops_at_the_first_failing_command() {
    let script = SceneScript::from_json_str(
        r#"{"commands": [
            {"op": "NewMesh", "name": "a"},
            {"op": "NewVolume", "name": "a"},
            {"op": "NewMesh", "name": "b"}
        ]}"#,
    )
    .unwrap();
    let mut ctx = SceneContext::new();
    let err = script.execute(&mut ctx).unwrap_err();
    assert!(matches!(err, HikariError::NameConflict(ref n) if n == "a"));
    assert!(ctx.kind_of("b").is_err());
}

#[test]
fn script_files_resolve_paths_against_their_directory() {
    let dir = std::env::temp_dir().join(format!("hikari-script-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut script = SceneScript::from_json_str(WALL_SCENE).unwrap();
    script.commands.push(SceneCommand::SaveFrameBuffer {
        name: "fb".to_owned(),
        path: "out.fb".to_owned(),
    });
    let path = dir.join("wall.json");
    std::fs::write(&path, serde_json::to_string(&script).unwrap()).unwrap();

    let mut ctx = SceneContext::new();
    run_script_file(&path, &mut ctx).unwrap();

    let saved = crate::render::framebuffer::FrameBuffer::load_fb(&dir.join("out.fb")).unwrap();
    assert_eq!(saved.data(), ctx.framebuffer("fb").unwrap().data());
    std::fs::remove_dir_all(&dir).ok();
}
