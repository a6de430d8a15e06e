//! Ray tracing against a [`FrozenScene`]: surfaces, raymarched volumes and shadow queries.

use std::f64::consts::PI;

use smallvec::SmallVec;

use crate::foundation::core::{DVec2, DVec3, Ray, Rgb, Rgba};
use crate::geometry::mesh::TriangleHit;
use crate::geometry::volume::Volume;
use crate::plugin::{LightOutput, RayKind, Shader, ShadingHost, SurfaceInput, SurfaceOutput};
use crate::render::settings::RenderSettings;
use crate::scene::frozen::{FrozenGeometry, FrozenInstance, FrozenScene, GroupId};

/// Color of surfaces and volumes that have no shader bound.
pub const NO_SHADER_COLOR: Rgb = Rgb::new(0.5, 1.0, 0.0);

const SHADOW_RAY_TMIN: f64 = 1.0e-4;

/// Light samples dimmer than this on every channel are skipped.
const MIN_LIGHT: f32 = 1.0e-4;

/// Semi-transparent surfaces a single shadow ray may pass through.
const MAX_SHADOW_LAYERS: usize = 64;

/// Per-ray state: what kind of ray it is, how deep it is, and which group it can see.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceContext {
    pub kind: RayKind,
    pub reflect_depth: u32,
    pub refract_depth: u32,
    pub max_reflect_depth: u32,
    pub max_refract_depth: u32,
    pub cast_shadow: bool,
    pub target: GroupId,
    pub time: f64,
}

impl TraceContext {
    pub fn camera(settings: &RenderSettings, target: GroupId, time: f64) -> Self {
        Self {
            kind: RayKind::Camera,
            reflect_depth: 0,
            refract_depth: 0,
            max_reflect_depth: settings.max_reflect_depth,
            max_refract_depth: settings.max_refract_depth,
            cast_shadow: settings.cast_shadow,
            target,
            time,
        }
    }

    /// Occlusion query. Occluders are shaded with every secondary bounce disabled.
    pub fn shadow(&self, target: GroupId) -> Self {
        Self {
            kind: RayKind::Shadow,
            max_reflect_depth: 0,
            max_refract_depth: 0,
            target,
            ..*self
        }
    }

    pub fn reflect(&self, target: GroupId) -> Self {
        Self {
            kind: RayKind::Reflect,
            reflect_depth: self.reflect_depth + 1,
            target,
            ..*self
        }
    }

    pub fn refract(&self, target: GroupId) -> Self {
        Self {
            kind: RayKind::Refract,
            refract_depth: self.refract_depth + 1,
            target,
            ..*self
        }
    }

    /// Camera and shadow rays never hit the limit.
    pub fn reached_bounce_limit(&self) -> bool {
        match self.kind {
            RayKind::Reflect => self.reflect_depth > self.max_reflect_depth,
            RayKind::Refract => self.refract_depth > self.max_refract_depth,
            RayKind::Camera | RayKind::Shadow => false,
        }
    }
}

/// Front-to-back accumulation of raymarch samples.
///
/// Opacity never decreases, and snaps to 1 once it reaches the threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VolumeAccumulator {
    rgba: Rgba,
}

impl VolumeAccumulator {
    /// Adds one sample with straight `color` and step `opacity` (clamped to `[0, 1]`).
    pub fn add(&mut self, color: Rgb, opacity: f32) {
        let op = opacity.clamp(0.0, 1.0);
        let k = 1.0 - self.rgba.a;
        self.rgba.r += color.x * op * k;
        self.rgba.g += color.y * op * k;
        self.rgba.b += color.z * op * k;
        self.rgba.a += op * k;
    }

    pub fn alpha(&self) -> f32 {
        self.rgba.a
    }

    pub fn saturated(&self, threshold: f32) -> bool {
        self.rgba.a >= threshold
    }

    pub fn finish(mut self, threshold: f32) -> Rgba {
        if self.saturated(threshold) {
            self.rgba.a = 1.0;
        }
        self.rgba.a = self.rgba.a.clamp(0.0, 1.0);
        self.rgba
    }
}

#[derive(Clone, Copy, Debug)]
struct SurfaceHit {
    t: f64,
    instance: usize,
    tri: TriangleHit,
}

struct VolumeSpan<'s> {
    instance: &'s FrozenInstance<'s>,
    volume: &'s Volume,
    shader: Option<&'s dyn Shader>,
    local: Ray,
}

/// Traces rays through one frozen scene. Cheap to construct; shared by reference across threads.
pub struct Tracer<'s> {
    scene: &'s FrozenScene<'s>,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s FrozenScene<'s>) -> Self {
        Self { scene }
    }

    fn settings(&self) -> &'s RenderSettings {
        self.scene.settings()
    }

    /// Premultiplied color and coverage along `ray`.
    ///
    /// Surfaces are hit first; volumes in front of the hit are raymarched and composited over
    /// it. Shadow rays only report opacity.
    pub fn trace(&self, cx: &TraceContext, ray: &Ray) -> Rgba {
        if cx.reached_bounce_limit() {
            return Rgba::TRANSPARENT;
        }
        let Some(dir) = ray.dir.try_normalize() else {
            return Rgba::TRANSPARENT;
        };
        let ray = Ray::with_range(ray.orig, dir, ray.tmin, ray.tmax);

        if cx.kind == RayKind::Shadow {
            return Rgba::new(0.0, 0.0, 0.0, self.occlusion(cx, &ray));
        }

        let hit = self.nearest_surface(cx.target, &ray, cx.time);
        let (surface, t_limit) = match &hit {
            Some(h) => (self.shade_surface(cx, &ray, h), h.t),
            None => (Rgba::TRANSPARENT, ray.tmax),
        };
        let volume = self.raymarch(cx, &ray, 0.0, t_limit);
        volume.over(surface)
    }

    fn nearest_surface(&self, group: GroupId, ray: &Ray, time: f64) -> Option<SurfaceHit> {
        let group = self.scene.groups.get(group)?;
        group
            .bvh
            .intersect(ray, |prim, r| {
                let ix = group.surfaces[prim as usize];
                let inst = &self.scene.instances[ix];
                let FrozenGeometry::Mesh { accel, .. } = inst.geometry else {
                    return None;
                };
                let local = inst.xf.ray_to_object(r);
                self.scene.meshes[accel]
                    .intersect(&local, time)
                    .map(|h| (h.t, (ix, h)))
            })
            .map(|(t, (instance, tri))| SurfaceHit { t, instance, tri })
    }

    fn shade_surface(&self, cx: &TraceContext, ray: &Ray, hit: &SurfaceHit) -> Rgba {
        let inst = &self.scene.instances[hit.instance];
        let FrozenGeometry::Mesh { accel, shaders } = &inst.geometry else {
            return Rgba::TRANSPARENT;
        };
        let mesh = self.scene.meshes[*accel].mesh;
        let sp = mesh.surface_point(&hit.tri, cx.time);
        let input = SurfaceInput {
            position: ray.at(hit.t),
            normal: inst.xf.normal_to_world(sp.normal),
            incident: ray.dir,
            uv: sp.uv,
            time: cx.time,
        };
        let out = match shaders.get(sp.group as usize).copied().flatten() {
            Some(shader) => shader.evaluate(&input, &self.host(cx, inst)),
            None => SurfaceOutput::opaque(NO_SHADER_COLOR),
        };
        premultiply(out)
    }

    /// Opacity between `ray.tmin` and `ray.tmax`, passing through semi-transparent surfaces.
    fn occlusion(&self, cx: &TraceContext, ray: &Ray) -> f32 {
        let threshold = self.settings().opacity_threshold;
        let mut transmit = 1.0f32;
        let mut segment = *ray;
        let mut from = 0.0;

        for _ in 0..MAX_SHADOW_LAYERS {
            let hit = self.nearest_surface(cx.target, &segment, cx.time);
            let to = hit.as_ref().map_or(segment.tmax, |h| h.t);
            transmit *= 1.0 - self.raymarch(cx, ray, from, to).a;

            let Some(hit) = hit else {
                break;
            };
            transmit *= 1.0 - self.shade_surface(cx, &segment, &hit).a;
            if 1.0 - transmit > threshold {
                return 1.0;
            }
            from = hit.t;
            segment.tmin = hit.t + SHADOW_RAY_TMIN;
            if segment.tmin > segment.tmax {
                break;
            }
        }

        let alpha = (1.0 - transmit).clamp(0.0, 1.0);
        if alpha >= threshold { 1.0 } else { alpha }
    }

    /// Samples at every multiple of the step in `(from, to]` that lies inside a volume.
    fn raymarch(&self, cx: &TraceContext, ray: &Ray, from: f64, to: f64) -> Rgba {
        let Some(group) = self.scene.groups.get(cx.target) else {
            return Rgba::TRANSPARENT;
        };
        if group.volumes.is_empty() {
            return Rgba::TRANSPARENT;
        }

        let mut spans: SmallVec<[VolumeSpan<'_>; 4]> = SmallVec::new();
        let mut t_start = f64::INFINITY;
        let mut t_limit = f64::NEG_INFINITY;
        for &ix in &group.volumes {
            let inst = &self.scene.instances[ix];
            let FrozenGeometry::Volume { volume, shader } = &inst.geometry else {
                continue;
            };
            if inst.world_bounds.is_empty() {
                continue;
            }
            let local = inst.xf.ray_to_object(ray);
            let Some((enter, exit)) = volume.bounds().intersect_line(&local) else {
                continue;
            };
            let lo = enter.max(from);
            let hi = exit.min(to);
            if lo > hi {
                continue;
            }
            t_start = t_start.min(lo);
            t_limit = t_limit.max(hi);
            spans.push(VolumeSpan {
                instance: inst,
                volume: *volume,
                shader: *shader,
                local,
            });
        }
        if spans.is_empty() {
            return Rgba::TRANSPARENT;
        }

        let settings = self.settings();
        let threshold = settings.opacity_threshold;
        let dt = settings.raymarch_step_for(cx.kind);
        let shade = cx.kind != RayKind::Shadow;
        let mut acc = VolumeAccumulator::default();
        // Indexing by step count keeps sample positions on exact multiples of dt.
        let mut k = (t_start.max(0.0) / dt).floor() + 1.0;

        loop {
            let t = k * dt;
            if t > t_limit || acc.saturated(threshold) {
                break;
            }
            k += 1.0;

            let mut opacity = 0.0f64;
            let mut densest: Option<&VolumeSpan<'_>> = None;
            for span in &spans {
                let density = span.volume.sample(span.local.at(t)).unwrap_or(0.0);
                let op = dt * f64::from(density);
                if op > opacity {
                    opacity = op;
                    densest = Some(span);
                }
            }
            let Some(span) = densest else {
                continue;
            };

            let color = if shade {
                match span.shader {
                    Some(shader) => {
                        let input = SurfaceInput {
                            position: ray.at(t),
                            normal: DVec3::ZERO,
                            incident: ray.dir,
                            uv: DVec2::ZERO,
                            time: cx.time,
                        };
                        shader.evaluate(&input, &self.host(cx, span.instance)).color
                    }
                    None => NO_SHADER_COLOR,
                }
            } else {
                Rgb::ZERO
            };
            acc.add(color, opacity as f32);
        }

        acc.finish(threshold)
    }

    fn host<'h>(&'h self, cx: &TraceContext, instance: &'h FrozenInstance<'s>) -> Host<'h, 's> {
        Host {
            tracer: self,
            cx: *cx,
            instance,
        }
    }
}

fn premultiply(out: SurfaceOutput) -> Rgba {
    let a = if out.opacity.is_finite() {
        out.opacity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let color = if out.color.is_finite() {
        out.color
    } else {
        Rgb::ZERO
    };
    Rgba::from_rgb(color * a, a)
}

/// Shading services for one evaluation at one instance.
struct Host<'h, 's> {
    tracer: &'h Tracer<'s>,
    cx: TraceContext,
    instance: &'h FrozenInstance<'s>,
}

impl ShadingHost for Host<'_, '_> {
    fn ray_kind(&self) -> RayKind {
        self.cx.kind
    }

    fn illuminance(
        &self,
        position: DVec3,
        axis: DVec3,
        angle: f64,
        visit: &mut dyn FnMut(&LightOutput),
    ) {
        if self.cx.kind == RayKind::Shadow {
            return;
        }
        let axis = axis.normalize_or_zero();
        let check_cone = angle < PI && axis != DVec3::ZERO;
        let cos_angle = angle.cos();
        let shadow_target = if self.cx.cast_shadow {
            self.instance.shadow_target
        } else {
            None
        };

        for sample in &self.tracer.scene.lights {
            let to_light = sample.position - position;
            let distance = to_light.length();
            let direction = if distance > 0.0 {
                to_light / distance
            } else {
                DVec3::ZERO
            };
            if check_cone && axis.dot(direction) < cos_angle {
                continue;
            }

            let mut color = sample.illuminate(position);
            if color.max_element() < MIN_LIGHT {
                continue;
            }

            if let Some(target) = shadow_target {
                let shadow_cx = self.cx.shadow(target);
                let ray = Ray::with_range(position, direction, SHADOW_RAY_TMIN, distance);
                let occluded = self.tracer.trace(&shadow_cx, &ray).a;
                color *= 1.0 - occluded;
            }

            visit(&LightOutput {
                direction,
                distance,
                color,
            });
        }
    }

    fn trace_reflect(&self, position: DVec3, direction: DVec3) -> Rgba {
        let cx = self.cx.reflect(self.instance.reflect_target);
        self.tracer.trace(&cx, &Ray::new(position, direction))
    }

    fn trace_refract(&self, position: DVec3, direction: DVec3) -> Rgba {
        let cx = self.cx.refract(self.instance.refract_target);
        self.tracer.trace(&cx, &Ray::new(position, direction))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/trace.rs"]
mod tests;
