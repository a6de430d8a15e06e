//! Scene construction: the named entity registry and every operation that populates it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{Bounds3, DVec3};
use crate::foundation::error::{HikariError, HikariResult};
use crate::geometry::mesh::{DEFAULT_SHADING_GROUP, Mesh};
use crate::geometry::turbulence::Turbulence;
use crate::geometry::volume::Volume;
use crate::plugin::{PluginKind, PluginRegistry, ProcedureInputs, Shader};
use crate::render::camera::Camera;
use crate::render::framebuffer::{ChannelLayout, FrameBuffer};
use crate::render::light::{Light, LightKind};
use crate::render::pipeline::{RenderControl, RenderStats, render_frame};
use crate::render::settings::{RenderSettings, RenderThreading};
use crate::render::texture::Texture;
use crate::scene::entity::{
    EntityKind, GeometryRef, InstanceEntry, ObjectGroup, ProcedureEntry, RendererEntry,
    TargetSlot, check_kind, wrong_kind,
};
use crate::scene::frozen::FrozenScene;
use crate::scene::property::{
    CAMERA_PROPERTIES, LIGHT_PROPERTIES, NO_PROPERTIES, PropertyValue, RENDERER_PROPERTIES,
    TRANSFORM_PROPERTIES, TURBULENCE_PROPERTIES, VOLUME_PROPERTIES, check_property,
};
use crate::transform::affine::Transform;

/// Name the scripts use for the default shading group.
pub const DEFAULT_SHADING_GROUP_NAME: &str = "DEFAULT_SHADING_GROUP";

const CAMERA_TYPES: &[&str] = &["PerspectiveCamera"];

/// Mutable scene under construction.
///
/// Every entity lives here under a unique name. Procedures mutate meshes and volumes in place;
/// [`SceneContext::render_scene`] takes an immutable [`FrozenScene`] snapshot for the duration of
/// the render.
#[derive(Debug)]
pub struct SceneContext {
    plugins: PluginRegistry,
    names: BTreeMap<String, EntityKind>,
    pub(crate) cameras: BTreeMap<String, Camera>,
    pub(crate) lights: BTreeMap<String, Light>,
    pub(crate) textures: BTreeMap<String, Arc<Texture>>,
    pub(crate) shaders: BTreeMap<String, Box<dyn Shader>>,
    pub(crate) meshes: BTreeMap<String, Mesh>,
    pub(crate) volumes: BTreeMap<String, Volume>,
    pub(crate) turbulences: BTreeMap<String, Turbulence>,
    procedures: BTreeMap<String, ProcedureEntry>,
    pub(crate) instances: BTreeMap<String, InstanceEntry>,
    pub(crate) groups: BTreeMap<String, ObjectGroup>,
    framebuffers: BTreeMap<String, FrameBuffer>,
    pub(crate) renderers: BTreeMap<String, RendererEntry>,
    base_dir: PathBuf,
    threading: RenderThreading,
    control: Arc<RenderControl>,
    last_stats: Option<RenderStats>,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneContext {
    /// Empty scene with the built-in plugins available and paths relative to the working directory.
    pub fn new() -> Self {
        Self::with_registry(PluginRegistry::with_builtins())
    }

    pub fn with_registry(plugins: PluginRegistry) -> Self {
        Self {
            plugins,
            names: BTreeMap::new(),
            cameras: BTreeMap::new(),
            lights: BTreeMap::new(),
            textures: BTreeMap::new(),
            shaders: BTreeMap::new(),
            meshes: BTreeMap::new(),
            volumes: BTreeMap::new(),
            turbulences: BTreeMap::new(),
            procedures: BTreeMap::new(),
            instances: BTreeMap::new(),
            groups: BTreeMap::new(),
            framebuffers: BTreeMap::new(),
            renderers: BTreeMap::new(),
            base_dir: PathBuf::from("."),
            threading: RenderThreading::from_env(),
            control: Arc::new(RenderControl::default()),
            last_stats: None,
        }
    }

    /// Directory that relative texture, geometry and output paths resolve against.
    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = dir.into();
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn set_threading(&mut self, threading: RenderThreading) {
        self.threading = threading;
    }

    pub fn threading(&self) -> &RenderThreading {
        &self.threading
    }

    /// Shared handle for cancelling a render from another thread.
    pub fn control(&self) -> Arc<RenderControl> {
        Arc::clone(&self.control)
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats
    }

    pub fn kind_of(&self, name: &str) -> HikariResult<EntityKind> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| HikariError::not_found(name))
    }

    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.get(name)
    }

    pub fn volume(&self, name: &str) -> Option<&Volume> {
        self.volumes.get(name)
    }

    pub fn framebuffer(&self, name: &str) -> Option<&FrameBuffer> {
        self.framebuffers.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&ObjectGroup> {
        self.groups.get(name)
    }

    fn resolve(&self, name: &str, expected: EntityKind) -> HikariResult<()> {
        check_kind(name, self.kind_of(name)?, expected)
    }

    fn claim(&mut self, name: &str, kind: EntityKind) -> HikariResult<()> {
        self.ensure_free(name)?;
        self.names.insert(name.to_owned(), kind);
        tracing::debug!(name, kind = kind.as_str(), "entity created");
        Ok(())
    }

    fn ensure_free(&self, name: &str) -> HikariResult<()> {
        if name.is_empty() {
            return Err(HikariError::validation("entity names must not be empty"));
        }
        if self.names.contains_key(name) {
            return Err(HikariError::name_conflict(name));
        }
        Ok(())
    }

    /// Binds `alias` to a registered implementation. The alias takes a name in the scene namespace.
    pub fn open_plugin(&mut self, alias: &str, implementation: &str) -> HikariResult<PluginKind> {
        self.ensure_free(alias)?;
        let kind = self.plugins.open(alias, implementation)?;
        self.claim(alias, EntityKind::Plugin)?;
        Ok(kind)
    }

    pub fn new_camera(&mut self, name: &str, type_name: &str) -> HikariResult<()> {
        if !CAMERA_TYPES.contains(&type_name) {
            return Err(HikariError::validation(format!(
                "unknown camera type '{type_name}' (expected PerspectiveCamera)"
            )));
        }
        self.claim(name, EntityKind::Camera)?;
        self.cameras.insert(name.to_owned(), Camera::default());
        Ok(())
    }

    pub fn new_light(&mut self, name: &str, type_name: &str) -> HikariResult<()> {
        let kind = LightKind::parse(type_name)?;
        self.claim(name, EntityKind::Light)?;
        self.lights.insert(name.to_owned(), Light::new(kind));
        Ok(())
    }

    /// Loads an image eagerly. Relative paths resolve against the base directory.
    pub fn new_texture(&mut self, name: &str, path: &str) -> HikariResult<()> {
        self.ensure_free(name)?;
        let texture = Texture::open(&self.base_dir.join(path))?;
        self.claim(name, EntityKind::Texture)?;
        self.textures.insert(name.to_owned(), Arc::new(texture));
        Ok(())
    }

    /// Creates a shader from a plugin alias (or an implementation name).
    pub fn new_shader(&mut self, name: &str, plugin: &str) -> HikariResult<()> {
        self.ensure_free(name)?;
        let shader = self.plugins.new_shader(plugin)?;
        self.claim(name, EntityKind::Shader)?;
        self.shaders.insert(name.to_owned(), shader);
        Ok(())
    }

    pub fn new_mesh(&mut self, name: &str) -> HikariResult<()> {
        self.claim(name, EntityKind::Mesh)?;
        self.meshes.insert(name.to_owned(), Mesh::new());
        Ok(())
    }

    pub fn new_volume(&mut self, name: &str) -> HikariResult<()> {
        self.claim(name, EntityKind::Volume)?;
        self.volumes.insert(name.to_owned(), Volume::new());
        Ok(())
    }

    pub fn new_turbulence(&mut self, name: &str) -> HikariResult<()> {
        self.claim(name, EntityKind::Turbulence)?;
        self.turbulences
            .insert(name.to_owned(), Turbulence::default());
        Ok(())
    }

    pub fn new_procedure(&mut self, name: &str, plugin: &str) -> HikariResult<()> {
        self.ensure_free(name)?;
        let plugin = self.plugins.new_procedure(plugin)?;
        self.claim(name, EntityKind::Procedure)?;
        self.procedures.insert(
            name.to_owned(),
            ProcedureEntry {
                plugin,
                mesh: None,
                volume: None,
                turbulence: None,
            },
        );
        Ok(())
    }

    /// Places a mesh or volume in the scene. The geometry is shared, never copied.
    pub fn new_object_instance(&mut self, name: &str, geometry: &str) -> HikariResult<()> {
        let geometry = match self.kind_of(geometry)? {
            EntityKind::Mesh => GeometryRef::Mesh(geometry.to_owned()),
            EntityKind::Volume => GeometryRef::Volume(geometry.to_owned()),
            other => {
                return Err(wrong_kind(
                    geometry,
                    other,
                    &[EntityKind::Mesh, EntityKind::Volume],
                ));
            }
        };
        self.claim(name, EntityKind::ObjectInstance)?;
        self.instances
            .insert(name.to_owned(), InstanceEntry::new(geometry));
        Ok(())
    }

    pub fn new_object_group(&mut self, name: &str) -> HikariResult<()> {
        self.claim(name, EntityKind::ObjectGroup)?;
        self.groups.insert(name.to_owned(), ObjectGroup::default());
        Ok(())
    }

    /// `layout` is `"rgb"` or `"rgba"`. Storage is sized by the renderer at render time.
    pub fn new_framebuffer(&mut self, name: &str, layout: &str) -> HikariResult<()> {
        let layout = ChannelLayout::parse(layout)?;
        self.claim(name, EntityKind::FrameBuffer)?;
        self.framebuffers
            .insert(name.to_owned(), FrameBuffer::new(0, 0, layout));
        Ok(())
    }

    pub fn new_renderer(&mut self, name: &str) -> HikariResult<()> {
        self.claim(name, EntityKind::Renderer)?;
        self.renderers
            .insert(name.to_owned(), RendererEntry::default());
        Ok(())
    }

    /// Sets a typed property, checked against the entity's (or its plugin's) property table.
    pub fn set_property(&mut self, name: &str, key: &str, value: PropertyValue) -> HikariResult<()> {
        match self.kind_of(name)? {
            EntityKind::Camera => {
                check_property(CAMERA_PROPERTIES, name, key, &value)?;
                let camera = entry(&mut self.cameras, name)?;
                match key {
                    "fov" => camera.fov = value.as_scalar()?,
                    "aspect" => camera.aspect = Some(value.as_scalar()?),
                    _ => set_transform(&mut camera.transform, key, &value)?,
                }
                camera.validate()
            }
            EntityKind::Light => {
                check_property(LIGHT_PROPERTIES, name, key, &value)?;
                let light = entry(&mut self.lights, name)?;
                match key {
                    "color" => light.color = value.as_vec3()?.as_vec3(),
                    "intensity" => light.intensity = value.as_scalar()? as f32,
                    "sample_count" => light.sample_count = value.as_count()?.max(1),
                    "double_sided" => light.double_sided = value.as_scalar()? != 0.0,
                    _ => set_transform(&mut light.transform, key, &value)?,
                }
                Ok(())
            }
            EntityKind::Shader => {
                let shader = entry(&mut self.shaders, name)?;
                check_property(shader.properties(), name, key, &value)?;
                shader.set_property(key, &value)
            }
            EntityKind::Procedure => {
                let proc = entry(&mut self.procedures, name)?;
                check_property(proc.plugin.properties(), name, key, &value)?;
                proc.plugin.set_property(key, &value)
            }
            EntityKind::Volume => {
                check_property(VOLUME_PROPERTIES, name, key, &value)?;
                let volume = entry(&mut self.volumes, name)?;
                set_volume_property(volume, key, &value)
            }
            EntityKind::Turbulence => {
                check_property(TURBULENCE_PROPERTIES, name, key, &value)?;
                let turb = entry(&mut self.turbulences, name)?;
                match key {
                    "amplitude" => turb.amplitude = value.as_vec3()?,
                    "frequency" => turb.frequency = value.as_vec3()?,
                    "offset" => turb.offset = value.as_vec3()?,
                    "lacunarity" => turb.lacunarity = value.as_scalar()?,
                    "gain" => turb.gain = value.as_scalar()?,
                    _ => turb.octaves = value.as_count()?,
                }
                turb.validate()
            }
            EntityKind::ObjectInstance => {
                check_property(TRANSFORM_PROPERTIES, name, key, &value)?;
                let inst = entry(&mut self.instances, name)?;
                set_transform(&mut inst.transform, key, &value)?;
                inst.transform.validate()
            }
            EntityKind::Renderer => {
                check_property(RENDERER_PROPERTIES, name, key, &value)?;
                let renderer = entry(&mut self.renderers, name)?;
                set_render_setting(&mut renderer.settings, key, &value)
            }
            EntityKind::Plugin
            | EntityKind::Texture
            | EntityKind::Mesh
            | EntityKind::ObjectGroup
            | EntityKind::FrameBuffer => {
                check_property(NO_PROPERTIES, name, key, &value).map(|_| ())
            }
        }
    }

    pub fn set_string_property(&mut self, name: &str, key: &str, value: &str) -> HikariResult<()> {
        self.set_property(name, key, PropertyValue::Str(value.to_owned()))
    }

    /// Binds a mesh to a procedure's `mesh` input.
    pub fn assign_mesh(&mut self, procedure: &str, key: &str, mesh: &str) -> HikariResult<()> {
        self.resolve(mesh, EntityKind::Mesh)?;
        let slot = self.procedure_slot(procedure, key, "mesh")?;
        slot.mesh = Some(mesh.to_owned());
        Ok(())
    }

    pub fn assign_volume(&mut self, procedure: &str, key: &str, volume: &str) -> HikariResult<()> {
        self.resolve(volume, EntityKind::Volume)?;
        let slot = self.procedure_slot(procedure, key, "volume")?;
        slot.volume = Some(volume.to_owned());
        Ok(())
    }

    pub fn assign_turbulence(
        &mut self,
        procedure: &str,
        key: &str,
        turbulence: &str,
    ) -> HikariResult<()> {
        self.resolve(turbulence, EntityKind::Turbulence)?;
        let slot = self.procedure_slot(procedure, key, "turbulence")?;
        slot.turbulence = Some(turbulence.to_owned());
        Ok(())
    }

    fn procedure_slot(
        &mut self,
        procedure: &str,
        key: &str,
        expected: &str,
    ) -> HikariResult<&mut ProcedureEntry> {
        self.resolve(procedure, EntityKind::Procedure)?;
        if key != expected {
            return Err(HikariError::unknown_property(procedure, key));
        }
        entry(&mut self.procedures, procedure)
    }

    /// Binds a texture to a light's `environment_map` or to one of a shader's texture slots.
    pub fn assign_texture(&mut self, name: &str, key: &str, texture: &str) -> HikariResult<()> {
        self.resolve(texture, EntityKind::Texture)?;
        let tex = Arc::clone(entry(&mut self.textures, texture)?);
        match self.kind_of(name)? {
            EntityKind::Light => {
                if key != "environment_map" {
                    return Err(HikariError::unknown_property(name, key));
                }
                entry(&mut self.lights, name)?.environment_map = Some(tex);
                Ok(())
            }
            EntityKind::Shader => {
                let shader = entry(&mut self.shaders, name)?;
                if !shader.texture_slots().contains(&key) {
                    return Err(HikariError::unknown_property(name, key));
                }
                shader.assign_texture(key, tex)
            }
            other => Err(wrong_kind(
                name,
                other,
                &[EntityKind::Light, EntityKind::Shader],
            )),
        }
    }

    /// Binds `shader` to one shading group of an instance.
    pub fn assign_shader(
        &mut self,
        instance: &str,
        shading_group: &str,
        shader: &str,
    ) -> HikariResult<()> {
        self.resolve(shader, EntityKind::Shader)?;
        self.resolve(instance, EntityKind::ObjectInstance)?;
        let group = if shading_group == DEFAULT_SHADING_GROUP_NAME {
            DEFAULT_SHADING_GROUP
        } else {
            shading_group
        };
        entry(&mut self.instances, instance)?
            .shaders
            .insert(group.to_owned(), shader.to_owned());
        Ok(())
    }

    /// Sets an instance's `shadow_target`/`reflect_target`/`refract_target`, or a renderer's
    /// `target_objects`.
    pub fn assign_object_group(&mut self, name: &str, key: &str, group: &str) -> HikariResult<()> {
        self.resolve(group, EntityKind::ObjectGroup)?;
        match self.kind_of(name)? {
            EntityKind::ObjectInstance => {
                let slot =
                    TargetSlot::parse(key).ok_or_else(|| HikariError::unknown_property(name, key))?;
                *entry(&mut self.instances, name)?.target_mut(slot) = Some(group.to_owned());
                Ok(())
            }
            EntityKind::Renderer => {
                if key != "target_objects" {
                    return Err(HikariError::unknown_property(name, key));
                }
                entry(&mut self.renderers, name)?.target_objects = Some(group.to_owned());
                Ok(())
            }
            other => Err(wrong_kind(
                name,
                other,
                &[EntityKind::ObjectInstance, EntityKind::Renderer],
            )),
        }
    }

    pub fn add_object_to_group(&mut self, group: &str, instance: &str) -> HikariResult<()> {
        self.resolve(instance, EntityKind::ObjectInstance)?;
        self.resolve(group, EntityKind::ObjectGroup)?;
        entry(&mut self.groups, group)?.add(instance);
        Ok(())
    }

    pub fn assign_camera(&mut self, renderer: &str, camera: &str) -> HikariResult<()> {
        self.resolve(camera, EntityKind::Camera)?;
        self.resolve(renderer, EntityKind::Renderer)?;
        entry(&mut self.renderers, renderer)?.camera = Some(camera.to_owned());
        Ok(())
    }

    pub fn assign_framebuffer(&mut self, renderer: &str, framebuffer: &str) -> HikariResult<()> {
        self.resolve(framebuffer, EntityKind::FrameBuffer)?;
        self.resolve(renderer, EntityKind::Renderer)?;
        entry(&mut self.renderers, renderer)?.framebuffer = Some(framebuffer.to_owned());
        Ok(())
    }

    /// Runs a procedure against its assigned resources. Plugin failures are wrapped as
    /// [`HikariError::Procedure`].
    #[tracing::instrument(skip(self))]
    pub fn run_procedure(&mut self, name: &str) -> HikariResult<()> {
        self.resolve(name, EntityKind::Procedure)?;
        let proc = self
            .procedures
            .get(name)
            .ok_or_else(|| HikariError::not_found(name))?;

        let mesh = match &proc.mesh {
            Some(m) => Some(
                self.meshes
                    .get_mut(m)
                    .ok_or_else(|| HikariError::not_found(m))?,
            ),
            None => None,
        };
        let volume = match &proc.volume {
            Some(v) => Some(
                self.volumes
                    .get_mut(v)
                    .ok_or_else(|| HikariError::not_found(v))?,
            ),
            None => None,
        };
        let turbulence = match &proc.turbulence {
            Some(t) => Some(
                self.turbulences
                    .get(t)
                    .ok_or_else(|| HikariError::not_found(t))?,
            ),
            None => None,
        };

        let inputs = ProcedureInputs {
            mesh,
            volume,
            turbulence,
            base_dir: &self.base_dir,
        };
        proc.plugin
            .run(inputs)
            .map_err(|e| HikariError::procedure(name, e))?;

        if let Some(m) = &proc.mesh
            && let Some(mesh) = self.meshes.get(m)
        {
            mesh.validate()
                .map_err(|e| HikariError::procedure(name, e))?;
            tracing::debug!(
                mesh = m.as_str(),
                vertices = mesh.vertex_count(),
                faces = mesh.face_count(),
                "procedure wrote mesh"
            );
        }
        Ok(())
    }

    /// Freezes the scene and renders it into the renderer's framebuffer.
    #[tracing::instrument(skip(self))]
    pub fn render_scene(&mut self, renderer: &str) -> HikariResult<RenderStats> {
        self.resolve(renderer, EntityKind::Renderer)?;
        let fb_name = self
            .renderers
            .get(renderer)
            .ok_or_else(|| HikariError::not_found(renderer))?
            .framebuffer
            .clone()
            .ok_or_else(|| {
                HikariError::scene_incomplete(format!("renderer '{renderer}' has no framebuffer"))
            })?;
        let layout = self
            .framebuffers
            .get(&fb_name)
            .map(FrameBuffer::layout)
            .ok_or_else(|| HikariError::not_found(&fb_name))?;

        let (fb, stats) = {
            let scene = FrozenScene::build(self, renderer)?;
            let [w, h] = scene.settings().resolution;
            let mut fb = FrameBuffer::new(w, h, layout);
            let stats = render_frame(&scene, &mut fb, &self.threading, &self.control)?;
            (fb, stats)
        };
        self.framebuffers.insert(fb_name, fb);
        self.last_stats = Some(stats);
        Ok(stats)
    }

    /// Writes a framebuffer to disk; `.png` is encoded as an image, anything else in the native format.
    pub fn save_framebuffer(&self, name: &str, path: &str) -> HikariResult<()> {
        self.resolve(name, EntityKind::FrameBuffer)?;
        let fb = self
            .framebuffers
            .get(name)
            .ok_or_else(|| HikariError::not_found(name))?;
        if fb.is_empty() {
            return Err(HikariError::validation(format!(
                "framebuffer '{name}' has not been rendered"
            )));
        }
        fb.save(&self.base_dir.join(path))
    }
}

fn entry<'m, T>(map: &'m mut BTreeMap<String, T>, name: &str) -> HikariResult<&'m mut T> {
    map.get_mut(name).ok_or_else(|| HikariError::not_found(name))
}

fn set_transform(xf: &mut Transform, key: &str, value: &PropertyValue) -> HikariResult<()> {
    let v = value.as_vec3()?;
    match key {
        "translate" => xf.translate = v,
        "rotate" => xf.rotate = v,
        "scale" => xf.scale = v,
        other => {
            return Err(HikariError::validation(format!(
                "'{other}' is not a transform property"
            )));
        }
    }
    Ok(())
}

fn set_volume_property(volume: &mut Volume, key: &str, value: &PropertyValue) -> HikariResult<()> {
    let v = value.as_vec3()?;
    let bounds = volume.bounds();
    match key {
        "bounds_min" => volume.set_bounds(Bounds3::new(v, bounds.max)),
        "bounds_max" => volume.set_bounds(Bounds3::new(bounds.min, v)),
        _ => {
            let res = resolution_from(v)?;
            volume.resize(res[0], res[1], res[2])
        }
    }
}

fn resolution_from(v: DVec3) -> HikariResult<[usize; 3]> {
    let mut out = [0usize; 3];
    for (slot, c) in out.iter_mut().zip(v.to_array()) {
        if !(1.0..=4096.0).contains(&c) {
            return Err(HikariError::validation(format!(
                "volume resolution components must be in 1..=4096, got {c}"
            )));
        }
        *slot = c.round() as usize;
    }
    Ok(out)
}

fn pair_u32(key: &str, value: &PropertyValue) -> HikariResult<[u32; 2]> {
    let v = value.as_vec2()?;
    if v.x < 0.0 || v.y < 0.0 || v.x > f64::from(u32::MAX) || v.y > f64::from(u32::MAX) {
        return Err(HikariError::validation(format!(
            "'{key}' components must be non-negative integers"
        )));
    }
    Ok([v.x.round() as u32, v.y.round() as u32])
}

fn set_render_setting(
    settings: &mut RenderSettings,
    key: &str,
    value: &PropertyValue,
) -> HikariResult<()> {
    match key {
        "resolution" => settings.resolution = pair_u32(key, value)?,
        "pixelsamples" => settings.pixel_samples = pair_u32(key, value)?,
        "jitter" => settings.jitter = value.as_scalar()?,
        "sample_time_range" => settings.sample_time_range = value.as_vec2()?.to_array(),
        "cast_shadow" => settings.cast_shadow = value.as_scalar()? != 0.0,
        "max_reflect_depth" => settings.max_reflect_depth = value.as_count()?,
        "max_refract_depth" => settings.max_refract_depth = value.as_count()?,
        "raymarch_step" => settings.raymarch_step = value.as_scalar()?,
        "raymarch_shadow_step" => settings.raymarch_shadow_step = value.as_scalar()?,
        "raymarch_reflect_step" => settings.raymarch_reflect_step = value.as_scalar()?,
        "raymarch_refract_step" => settings.raymarch_refract_step = value.as_scalar()?,
        "opacity_threshold" => settings.opacity_threshold = value.as_scalar()? as f32,
        "seed" => settings.seed = u64::from(value.as_count()?),
        "region_min" => settings.region_min = Some(pair_u32(key, value)?),
        "region_max" => settings.region_max = Some(pair_u32(key, value)?),
        other => {
            return Err(HikariError::validation(format!(
                "'{other}' is not a renderer setting"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/context.rs"]
mod tests;
