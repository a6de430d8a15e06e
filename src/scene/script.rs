//! JSON scene scripts: an ordered list of scene-construction commands.

use std::path::Path;

use crate::foundation::error::{HikariError, HikariResult};
use crate::render::pipeline::RenderStats;
use crate::scene::context::SceneContext;
use crate::scene::property::PropertyValue;

fn perspective_camera() -> String {
    "PerspectiveCamera".to_owned()
}

fn rgba_layout() -> String {
    "rgba".to_owned()
}

/// One scene-construction call. Serialized as `{"op": "NewCamera", "name": "cam1", ...}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", deny_unknown_fields)]
pub enum SceneCommand {
    OpenPlugin {
        alias: String,
        implementation: String,
    },
    NewCamera {
        name: String,
        #[serde(default = "perspective_camera")]
        camera_type: String,
    },
    NewLight {
        name: String,
        light_type: String,
    },
    NewTexture {
        name: String,
        path: String,
    },
    NewShader {
        name: String,
        plugin: String,
    },
    NewMesh {
        name: String,
    },
    NewVolume {
        name: String,
    },
    NewTurbulence {
        name: String,
    },
    NewProcedure {
        name: String,
        plugin: String,
    },
    NewObjectInstance {
        name: String,
        geometry: String,
    },
    NewObjectGroup {
        name: String,
    },
    NewFrameBuffer {
        name: String,
        #[serde(default = "rgba_layout")]
        layout: String,
    },
    NewRenderer {
        name: String,
    },
    SetProperty {
        name: String,
        key: String,
        value: PropertyValue,
    },
    SetStringProperty {
        name: String,
        key: String,
        value: String,
    },
    AssignMesh {
        name: String,
        key: String,
        mesh: String,
    },
    AssignVolume {
        name: String,
        key: String,
        volume: String,
    },
    AssignTurbulence {
        name: String,
        key: String,
        turbulence: String,
    },
    AssignTexture {
        name: String,
        key: String,
        texture: String,
    },
    AssignShader {
        instance: String,
        shading_group: String,
        shader: String,
    },
    AssignObjectGroup {
        name: String,
        key: String,
        group: String,
    },
    AddObjectToGroup {
        group: String,
        instance: String,
    },
    AssignCamera {
        renderer: String,
        camera: String,
    },
    AssignFrameBuffer {
        renderer: String,
        framebuffer: String,
    },
    RunProcedure {
        name: String,
    },
    RenderScene {
        renderer: String,
    },
    SaveFrameBuffer {
        name: String,
        path: String,
    },
}

impl SceneCommand {
    pub fn apply(&self, ctx: &mut SceneContext) -> HikariResult<Option<RenderStats>> {
        match self {
            Self::OpenPlugin {
                alias,
                implementation,
            } => ctx.open_plugin(alias, implementation).map(|_| ())?,
            Self::NewCamera { name, camera_type } => ctx.new_camera(name, camera_type)?,
            Self::NewLight { name, light_type } => ctx.new_light(name, light_type)?,
            Self::NewTexture { name, path } => ctx.new_texture(name, path)?,
            Self::NewShader { name, plugin } => ctx.new_shader(name, plugin)?,
            Self::NewMesh { name } => ctx.new_mesh(name)?,
            Self::NewVolume { name } => ctx.new_volume(name)?,
            Self::NewTurbulence { name } => ctx.new_turbulence(name)?,
            Self::NewProcedure { name, plugin } => ctx.new_procedure(name, plugin)?,
            Self::NewObjectInstance { name, geometry } => ctx.new_object_instance(name, geometry)?,
            Self::NewObjectGroup { name } => ctx.new_object_group(name)?,
            Self::NewFrameBuffer { name, layout } => ctx.new_framebuffer(name, layout)?,
            Self::NewRenderer { name } => ctx.new_renderer(name)?,
            Self::SetProperty { name, key, value } => ctx.set_property(name, key, value.clone())?,
            Self::SetStringProperty { name, key, value } => {
                ctx.set_string_property(name, key, value)?
            }
            Self::AssignMesh { name, key, mesh } => ctx.assign_mesh(name, key, mesh)?,
            Self::AssignVolume { name, key, volume } => ctx.assign_volume(name, key, volume)?,
            Self::AssignTurbulence {
                name,
                key,
                turbulence,
            } => ctx.assign_turbulence(name, key, turbulence)?,
            Self::AssignTexture { name, key, texture } => ctx.assign_texture(name, key, texture)?,
            Self::AssignShader {
                instance,
                shading_group,
                shader,
            } => ctx.assign_shader(instance, shading_group, shader)?,
            Self::AssignObjectGroup { name, key, group } => {
                ctx.assign_object_group(name, key, group)?
            }
            Self::AddObjectToGroup { group, instance } => ctx.add_object_to_group(group, instance)?,
            Self::AssignCamera { renderer, camera } => ctx.assign_camera(renderer, camera)?,
            Self::AssignFrameBuffer {
                renderer,
                framebuffer,
            } => ctx.assign_framebuffer(renderer, framebuffer)?,
            Self::RunProcedure { name } => ctx.run_procedure(name)?,
            Self::RenderScene { renderer } => return ctx.render_scene(renderer).map(Some),
            Self::SaveFrameBuffer { name, path } => ctx.save_framebuffer(name, path)?,
        }
        Ok(None)
    }
}

/// An ordered scene-construction program.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneScript {
    pub commands: Vec<SceneCommand>,
}

impl SceneScript {
    pub fn from_json_str(s: &str) -> HikariResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| HikariError::validation(format!("invalid scene script: {e}")))
    }

    pub fn load(path: &Path) -> HikariResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HikariError::io("read scene script", path, e))?;
        Self::from_json_str(&text)
    }

    /// Applies every command in order and stops at the first error.
    ///
    /// Returns the stats of each `RenderScene` command.
    #[tracing::instrument(skip_all, fields(commands = self.commands.len()))]
    pub fn execute(&self, ctx: &mut SceneContext) -> HikariResult<Vec<RenderStats>> {
        let mut renders = Vec::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            let stats = cmd.apply(ctx).map_err(|e| {
                tracing::debug!(index = i, error = %e, "scene command failed");
                e
            })?;
            renders.extend(stats);
        }
        Ok(renders)
    }
}

/// Loads a script and runs it with `ctx` rooted at the script's directory.
pub fn run_script_file(path: &Path, ctx: &mut SceneContext) -> HikariResult<Vec<RenderStats>> {
    let script = SceneScript::load(path)?;
    if let Some(dir) = path.parent() {
        ctx.set_base_dir(dir);
    }
    script.execute(ctx)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/script.rs"]
mod tests;
