//! Entity kinds and the records the scene context keeps per entity.

use std::collections::BTreeMap;

use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::Procedure;
use crate::render::settings::RenderSettings;
use crate::transform::affine::Transform;

/// Every kind of named entity. Names are unique across all kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Plugin,
    Camera,
    Light,
    Texture,
    Shader,
    Mesh,
    Volume,
    Turbulence,
    Procedure,
    ObjectInstance,
    ObjectGroup,
    FrameBuffer,
    Renderer,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "Plugin",
            Self::Camera => "Camera",
            Self::Light => "Light",
            Self::Texture => "Texture",
            Self::Shader => "Shader",
            Self::Mesh => "Mesh",
            Self::Volume => "Volume",
            Self::Turbulence => "Turbulence",
            Self::Procedure => "Procedure",
            Self::ObjectInstance => "ObjectInstance",
            Self::ObjectGroup => "ObjectGroup",
            Self::FrameBuffer => "FrameBuffer",
            Self::Renderer => "Renderer",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry an instance points at. The registry owns the data; instances hold names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometryRef {
    Mesh(String),
    Volume(String),
}

/// Group slots on an object instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetSlot {
    Shadow,
    Reflect,
    Refract,
}

impl TargetSlot {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "shadow_target" => Some(Self::Shadow),
            "reflect_target" => Some(Self::Reflect),
            "refract_target" => Some(Self::Refract),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InstanceEntry {
    pub geometry: GeometryRef,
    pub transform: Transform,
    /// Shading group name to shader entity. `""` is the default group.
    pub shaders: BTreeMap<String, String>,
    /// Without a shadow target the instance is never shadowed.
    pub shadow_target: Option<String>,
    /// `None` means every object in the scene.
    pub reflect_target: Option<String>,
    pub refract_target: Option<String>,
}

impl InstanceEntry {
    pub fn new(geometry: GeometryRef) -> Self {
        Self {
            geometry,
            transform: Transform::default(),
            shaders: BTreeMap::new(),
            shadow_target: None,
            reflect_target: None,
            refract_target: None,
        }
    }

    pub fn target_mut(&mut self, slot: TargetSlot) -> &mut Option<String> {
        match slot {
            TargetSlot::Shadow => &mut self.shadow_target,
            TargetSlot::Reflect => &mut self.reflect_target,
            TargetSlot::Refract => &mut self.refract_target,
        }
    }
}

/// A procedure plugin plus the resources assigned to it.
#[derive(Debug)]
pub struct ProcedureEntry {
    pub plugin: Box<dyn Procedure>,
    pub mesh: Option<String>,
    pub volume: Option<String>,
    pub turbulence: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RendererEntry {
    pub camera: Option<String>,
    pub framebuffer: Option<String>,
    /// `None` renders every object in the scene.
    pub target_objects: Option<String>,
    pub settings: RenderSettings,
}

/// Ordered, duplicate-free instance names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectGroup {
    members: Vec<String>,
}

impl ObjectGroup {
    pub fn add(&mut self, instance: &str) {
        if !self.members.iter().any(|m| m == instance) {
            self.members.push(instance.to_owned());
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, instance: &str) -> bool {
        self.members.iter().any(|m| m == instance)
    }
}

pub(crate) fn wrong_kind(name: &str, got: EntityKind, expected: &[EntityKind]) -> HikariError {
    let expected: Vec<&str> = expected.iter().map(|k| k.as_str()).collect();
    HikariError::validation(format!(
        "'{name}' is a {got}, expected {}",
        expected.join(" or ")
    ))
}

pub(crate) fn check_kind(name: &str, got: EntityKind, expected: EntityKind) -> HikariResult<()> {
    if got == expected {
        Ok(())
    } else {
        Err(wrong_kind(name, got, &[expected]))
    }
}
