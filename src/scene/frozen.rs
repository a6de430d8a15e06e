//! Immutable render-time view of a [`SceneContext`].

use std::collections::BTreeMap;

use crate::accel::bvh::Bvh;
use crate::foundation::core::{Bounds3, Ray};
use crate::foundation::error::{HikariError, HikariResult};
use crate::geometry::mesh::{DEFAULT_SHADING_GROUP, Mesh, TriangleHit};
use crate::geometry::volume::Volume;
use crate::plugin::Shader;
use crate::render::camera::CameraRig;
use crate::render::light::LightSample;
use crate::render::settings::RenderSettings;
use crate::scene::context::SceneContext;
use crate::scene::entity::{GeometryRef, InstanceEntry};
use crate::transform::affine::InstanceTransform;

/// Index into [`FrozenScene`] groups. Group 0 holds every object instance.
pub type GroupId = usize;

pub const ALL_OBJECTS: GroupId = 0;

/// Object-space BVH over one mesh, shared by every instance of it.
#[derive(Debug)]
pub struct MeshAccel<'a> {
    pub mesh: &'a Mesh,
    pub bvh: Bvh,
}

impl MeshAccel<'_> {
    /// Nearest triangle along an object-space ray at `time`.
    pub fn intersect(&self, ray: &Ray, time: f64) -> Option<TriangleHit> {
        self.bvh
            .intersect(ray, |face, r| {
                self.mesh.intersect_face(face, r, time).map(|h| (h.t, h))
            })
            .map(|(_, hit)| hit)
    }
}

#[derive(Debug)]
pub enum FrozenGeometry<'a> {
    Mesh {
        accel: usize,
        /// Shader per mesh shading group, falling back to the default group's binding.
        shaders: Vec<Option<&'a dyn Shader>>,
    },
    Volume {
        volume: &'a Volume,
        shader: Option<&'a dyn Shader>,
    },
}

#[derive(Debug)]
pub struct FrozenInstance<'a> {
    pub name: &'a str,
    pub xf: InstanceTransform,
    pub geometry: FrozenGeometry<'a>,
    pub world_bounds: Bounds3,
    /// `None` leaves the instance unshadowed.
    pub shadow_target: Option<GroupId>,
    pub reflect_target: GroupId,
    pub refract_target: GroupId,
}

/// Surface BVH over world-space instance bounds plus the group's volume instances.
#[derive(Debug)]
pub struct GroupAccel {
    pub surfaces: Vec<usize>,
    pub bvh: Bvh,
    pub volumes: Vec<usize>,
}

impl GroupAccel {
    fn build(members: Vec<usize>, instances: &[FrozenInstance<'_>]) -> Self {
        let (surfaces, volumes): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&i| matches!(instances[i].geometry, FrozenGeometry::Mesh { .. }));
        let bounds: Vec<Bounds3> = surfaces.iter().map(|&i| instances[i].world_bounds).collect();
        Self {
            surfaces,
            bvh: Bvh::build(&bounds),
            volumes,
        }
    }
}

/// Everything the render pipeline reads, resolved once and never mutated while rendering.
#[derive(Debug)]
pub struct FrozenScene<'a> {
    settings: RenderSettings,
    camera: CameraRig,
    pub(crate) meshes: Vec<MeshAccel<'a>>,
    pub(crate) instances: Vec<FrozenInstance<'a>>,
    pub(crate) groups: Vec<GroupAccel>,
    pub(crate) lights: Vec<LightSample>,
    pub(crate) target: GroupId,
}

impl<'a> FrozenScene<'a> {
    /// Resolves a renderer's bindings. Fails with `SceneIncomplete` without a camera or framebuffer.
    #[tracing::instrument(skip(ctx))]
    pub fn build(ctx: &'a SceneContext, renderer: &str) -> HikariResult<Self> {
        let entry = ctx
            .renderers
            .get(renderer)
            .ok_or_else(|| HikariError::not_found(renderer))?;
        let camera_name = entry.camera.as_deref().ok_or_else(|| {
            HikariError::scene_incomplete(format!("renderer '{renderer}' has no camera"))
        })?;
        if entry.framebuffer.is_none() {
            return Err(HikariError::scene_incomplete(format!(
                "renderer '{renderer}' has no framebuffer"
            )));
        }
        let settings = entry.settings.clone();
        settings.validate()?;

        let [w, h] = settings.resolution;
        let camera = ctx
            .cameras
            .get(camera_name)
            .ok_or_else(|| HikariError::not_found(camera_name))?
            .rig(w, h)?;

        let [t0, t1] = settings.sample_time_range;
        let mut meshes = Vec::new();
        let mut mesh_index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut instances = Vec::with_capacity(ctx.instances.len());
        let mut instance_index: BTreeMap<&str, usize> = BTreeMap::new();

        for (name, inst) in &ctx.instances {
            let xf = InstanceTransform::new(&inst.transform)
                .map_err(|e| HikariError::validation(format!("instance '{name}': {e}")))?;
            let (geometry, local_bounds) = match &inst.geometry {
                GeometryRef::Mesh(mesh_name) => {
                    let accel = match mesh_index.get(mesh_name.as_str()) {
                        Some(&ix) => ix,
                        None => {
                            let mesh = ctx
                                .meshes
                                .get(mesh_name)
                                .ok_or_else(|| HikariError::not_found(mesh_name))?;
                            meshes.push(build_mesh_accel(mesh, t0, t1));
                            mesh_index.insert(mesh_name.as_str(), meshes.len() - 1);
                            meshes.len() - 1
                        }
                    };
                    let mesh = meshes[accel].mesh;
                    let shaders = mesh
                        .group_names()
                        .iter()
                        .map(|g| lookup_shader(ctx, inst, g))
                        .collect::<HikariResult<Vec<_>>>()?;
                    if !mesh.is_empty() && shaders.iter().any(Option::is_none) {
                        tracing::warn!(instance = name.as_str(), "instance has unshaded groups");
                    }
                    let bounds = meshes[accel].bvh.bounds();
                    (FrozenGeometry::Mesh { accel, shaders }, bounds)
                }
                GeometryRef::Volume(volume_name) => {
                    let volume = ctx
                        .volumes
                        .get(volume_name)
                        .ok_or_else(|| HikariError::not_found(volume_name))?;
                    volume.validate()?;
                    let shader = lookup_shader(ctx, inst, DEFAULT_SHADING_GROUP)?;
                    if shader.is_none() {
                        tracing::warn!(instance = name.as_str(), "volume instance has no shader");
                    }
                    let bounds = if volume.data().is_empty() {
                        Bounds3::EMPTY
                    } else {
                        volume.bounds()
                    };
                    (FrozenGeometry::Volume { volume, shader }, bounds)
                }
            };
            instance_index.insert(name.as_str(), instances.len());
            instances.push(FrozenInstance {
                name: name.as_str(),
                world_bounds: xf.bounds_to_world(&local_bounds),
                xf,
                geometry,
                shadow_target: None,
                reflect_target: ALL_OBJECTS,
                refract_target: ALL_OBJECTS,
            });
        }

        let mut group_ids: BTreeMap<&str, GroupId> = BTreeMap::new();
        let mut groups = vec![GroupAccel::build((0..instances.len()).collect(), &instances)];
        for (name, group) in &ctx.groups {
            let members = group
                .members()
                .iter()
                .map(|m| {
                    instance_index
                        .get(m.as_str())
                        .copied()
                        .ok_or_else(|| HikariError::not_found(m))
                })
                .collect::<HikariResult<Vec<_>>>()?;
            group_ids.insert(name.as_str(), groups.len());
            groups.push(GroupAccel::build(members, &instances));
        }

        let group_id = |name: &Option<String>| -> HikariResult<Option<GroupId>> {
            name.as_deref()
                .map(|g| {
                    group_ids
                        .get(g)
                        .copied()
                        .ok_or_else(|| HikariError::not_found(g))
                })
                .transpose()
        };
        for (inst, (_, entry)) in instances.iter_mut().zip(&ctx.instances) {
            inst.shadow_target = group_id(&entry.shadow_target)?;
            inst.reflect_target = group_id(&entry.reflect_target)?.unwrap_or(ALL_OBJECTS);
            inst.refract_target = group_id(&entry.refract_target)?.unwrap_or(ALL_OBJECTS);
        }
        let target = group_id(&entry.target_objects)?.unwrap_or(ALL_OBJECTS);

        let mut lights = Vec::new();
        for (name, light) in &ctx.lights {
            let samples = light
                .samples()
                .map_err(|e| HikariError::validation(format!("light '{name}': {e}")))?;
            lights.extend(samples);
        }

        tracing::debug!(
            meshes = meshes.len(),
            instances = instances.len(),
            groups = groups.len(),
            light_samples = lights.len(),
            "scene frozen"
        );

        Ok(Self {
            settings,
            camera,
            meshes,
            instances,
            groups,
            lights,
            target,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn light_sample_count(&self) -> usize {
        self.lights.len()
    }
}

/// Static meshes get bounds at `t = 0`; moving meshes get bounds swept over the shutter.
fn build_mesh_accel(mesh: &Mesh, t0: f64, t1: f64) -> MeshAccel<'_> {
    let (t0, t1) = if mesh.has_motion() { (t0, t1) } else { (0.0, 0.0) };
    let bounds: Vec<Bounds3> = (0..mesh.face_count())
        .map(|f| mesh.face_swept_bounds(f, t0, t1))
        .collect();
    MeshAccel {
        mesh,
        bvh: Bvh::build(&bounds),
    }
}

fn lookup_shader<'a>(
    ctx: &'a SceneContext,
    inst: &InstanceEntry,
    group: &str,
) -> HikariResult<Option<&'a dyn Shader>> {
    let Some(shader_name) = inst
        .shaders
        .get(group)
        .or_else(|| inst.shaders.get(DEFAULT_SHADING_GROUP))
    else {
        return Ok(None);
    };
    ctx.shaders
        .get(shader_name)
        .map(|s| Some(s.as_ref()))
        .ok_or_else(|| HikariError::not_found(shader_name))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/frozen.rs"]
mod tests;
