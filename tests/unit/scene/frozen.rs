use super::*;
use crate::foundation::core::DVec3;
use crate::scene::property::PropertyValue;

/// Camera, framebuffer and renderer wired together, plus a unit box mesh.
fn base_scene() -> SceneContext {
    let mut ctx = SceneContext::new();
    ctx.new_camera("cam", "PerspectiveCamera").unwrap();
    ctx.new_framebuffer("fb", "rgba").unwrap();
    ctx.new_renderer("r").unwrap();
    ctx.assign_camera("r", "cam").unwrap();
    ctx.assign_framebuffer("r", "fb").unwrap();
    ctx.set_property("r", "resolution", PropertyValue::Vec2([8.0, 8.0]))
        .unwrap();

    ctx.new_mesh("box").unwrap();
    ctx.new_procedure("make_box", "ShapeProcedure").unwrap();
    ctx.set_string_property("make_box", "shape", "box").unwrap();
    ctx.assign_mesh("make_box", "mesh", "box").unwrap();
    ctx.run_procedure("make_box").unwrap();
    ctx
}

#[test]
fn instances_share_one_mesh_accel() {
    let mut ctx = base_scene();
    ctx.new_object_instance("a", "box").unwrap();
    ctx.new_object_instance("b", "box").unwrap();
    ctx.set_property("b", "translate", PropertyValue::Vec3([3.0, 0.0, 0.0]))
        .unwrap();

    let scene = FrozenScene::build(&ctx, "r").unwrap();
    assert_eq!(scene.instance_count(), 2);
    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].bvh.bounds().max, DVec3::splat(0.5));

    let b = &scene.instances[1];
    assert_eq!(b.name, "b");
    assert_eq!(b.world_bounds.min, DVec3::new(2.5, -0.5, -0.5));
}

#[test]
fn group_zero_holds_every_instance() {
    let mut ctx = base_scene();
    ctx.new_object_instance("a", "box").unwrap();
    ctx.new_object_instance("b", "box").unwrap();
    ctx.new_object_group("only_b").unwrap();
    ctx.add_object_to_group("only_b", "b").unwrap();
    ctx.assign_object_group("a", "shadow_target", "only_b")
        .unwrap();
    ctx.assign_object_group("r", "target_objects", "only_b")
        .unwrap();

    let scene = FrozenScene::build(&ctx, "r").unwrap();
    assert_eq!(scene.groups.len(), 2);
    assert_eq!(scene.groups[ALL_OBJECTS].surfaces, vec![0, 1]);
    assert_eq!(scene.groups[1].surfaces, vec![1]);
    assert_eq!(scene.target, 1);

    assert_eq!(scene.instances[0].shadow_target, Some(1));
    assert_eq!(scene.instances[1].shadow_target, None);
    assert_eq!(scene.instances[0].reflect_target, ALL_OBJECTS);
}

#[test]
fn volumes_are_kept_apart_from_surfaces() {
    let mut ctx = base_scene();
    ctx.new_volume("smoke").unwrap();
    ctx.set_property("smoke", "bounds_min", PropertyValue::Vec3([-1.0; 3]))
        .unwrap();
    ctx.set_property("smoke", "bounds_max", PropertyValue::Vec3([1.0; 3]))
        .unwrap();
    ctx.set_property("smoke", "resolution", PropertyValue::Vec3([2.0; 3]))
        .unwrap();
    ctx.new_object_instance("cloud", "smoke").unwrap();
    ctx.new_object_instance("solid", "box").unwrap();

    let scene = FrozenScene::build(&ctx, "r").unwrap();
    let group = &scene.groups[ALL_OBJECTS];
    assert_eq!(group.surfaces, vec![1]);
    assert_eq!(group.volumes, vec![0]);
    assert!(matches!(
        scene.instances[0].geometry,
        FrozenGeometry::Volume { shader: None, .. }
    ));
}

#[test]
fn unallocated_volumes_have_empty_bounds() {
    let mut ctx = base_scene();
    ctx.new_volume("v").unwrap();
    ctx.new_object_instance("i", "v").unwrap();
    let scene = FrozenScene::build(&ctx, "r").unwrap();
    assert!(scene.instances[0].world_bounds.is_empty());
}

#[test]
fn group_shaders_fall_back_to_the_default_binding() {
    let mut ctx = base_scene();
    ctx.new_shader("s", "ConstantShader").unwrap();
    ctx.new_object_instance("plain", "box").unwrap();
    ctx.new_object_instance("shaded", "box").unwrap();
    ctx.assign_shader("shaded", "DEFAULT_SHADING_GROUP", "s")
        .unwrap();

    let scene = FrozenScene::build(&ctx, "r").unwrap();
    let FrozenGeometry::Mesh { shaders, .. } = &scene.instances[0].geometry else {
        panic!("expected a mesh instance");
    };
    assert!(shaders.iter().all(Option::is_none));
    let FrozenGeometry::Mesh { shaders, .. } = &scene.instances[1].geometry else {
        panic!("expected a mesh instance");
    };
    assert!(shaders.iter().all(Option::is_some));
}

#[test]
fn static_meshes_are_bounded_at_time_zero() {
    let mut ctx = base_scene();
    ctx.new_procedure("push", "VelocityGeneratorProcedure").unwrap();
    ctx.set_property("push", "velocity", PropertyValue::Vec3([2.0, 0.0, 0.0]))
        .unwrap();
    ctx.set_property("push", "normal_scale", PropertyValue::Scalar(0.0))
        .unwrap();
    ctx.new_object_instance("i", "box").unwrap();

    let still = FrozenScene::build(&ctx, "r").unwrap();
    assert_eq!(still.meshes[0].bvh.bounds().max.x, 0.5);
    drop(still);

    ctx.assign_mesh("push", "mesh", "box").unwrap();
    ctx.run_procedure("push").unwrap();
    let moving = FrozenScene::build(&ctx, "r").unwrap();
    assert_eq!(moving.meshes[0].bvh.bounds().max.x, 2.5);
}

#[test]
fn lights_are_flattened_into_samples() {
    let mut ctx = base_scene();
    ctx.new_light("key", "PointLight").unwrap();
    ctx.new_light("fill", "GridLight").unwrap();
    ctx.set_property("fill", "sample_count", PropertyValue::Scalar(4.0))
        .unwrap();
    let scene = FrozenScene::build(&ctx, "r").unwrap();
    assert_eq!(scene.light_sample_count(), 5);
}

#[test]
fn invalid_settings_fail_the_freeze() {
    let mut ctx = base_scene();
    ctx.set_property("r", "raymarch_step", PropertyValue::Scalar(0.0))
        .unwrap();
    assert!(matches!(
        FrozenScene::build(&ctx, "r"),
        Err(HikariError::Validation(_))
    ));
}
