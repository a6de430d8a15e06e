use super::*;
use crate::foundation::core::{DVec2, Rgba};
use crate::plugin::LightOutput;

struct TwoLights;

impl ShadingHost for TwoLights {
    fn ray_kind(&self) -> RayKind {
        RayKind::Camera
    }
    fn illuminance(&self, _: DVec3, _: DVec3, angle: f64, visit: &mut dyn FnMut(&LightOutput)) {
        assert!(angle >= PI);
        for direction in [DVec3::Y, DVec3::NEG_Y] {
            visit(&LightOutput {
                direction,
                distance: 1.0,
                color: Rgb::splat(0.5),
            });
        }
    }
    fn trace_reflect(&self, _: DVec3, _: DVec3) -> Rgba {
        Rgba::TRANSPARENT
    }
    fn trace_refract(&self, _: DVec3, _: DVec3) -> Rgba {
        Rgba::TRANSPARENT
    }
}

#[test]
fn sums_lights_from_every_direction() {
    let mut s = VolumeShader::default();
    s.set_property("diffuse", &PropertyValue::Vec3([0.5, 1.0, 1.0]))
        .unwrap();
    let input = SurfaceInput {
        position: DVec3::ZERO,
        normal: DVec3::ZERO,
        incident: DVec3::Z,
        uv: DVec2::ZERO,
        time: 0.0,
    };
    let out = s.evaluate(&input, &TwoLights);
    assert!((out.color - Rgb::new(0.5, 1.0, 1.0)).abs().max_element() < 1e-6);
}
