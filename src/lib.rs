//! Hikari is an offline renderer core for meshes and voxel volumes.
//!
//! Scenes are built through a [`SceneContext`]: every entity (cameras, lights, shaders,
//! meshes, volumes, procedures, object instances, groups, framebuffers, renderers) lives in
//! one global namespace and is wired together by name. Rendering freezes the context into
//! an immutable snapshot and fills a [`FrameBuffer`] row by row:
//!
//! - stratified supersampling with optional jitter and box filtering
//! - motion blur from per-vertex velocities over the sample time range
//! - fixed-step raymarching through volumes, composited over surfaces
//! - shadow, reflect and refract rays restricted to object groups
//!
//! Shading and geometry generation are plugins behind the [`Shader`] and [`Procedure`]
//! traits; [`plugins::builtins`] lists the ones that ship with the crate.
#![forbid(unsafe_code)]

pub mod accel;
pub mod foundation;
pub mod geometry;
pub mod plugin;
pub mod plugins;
pub mod render;
pub mod scene;
pub mod transform;

pub use crate::foundation::core::{Bounds3, Ray, Rgb, Rgba};
pub use crate::foundation::error::{HikariError, HikariResult};
pub use crate::geometry::mesh::Mesh;
pub use crate::geometry::turbulence::Turbulence;
pub use crate::geometry::volume::Volume;
pub use crate::plugin::{PluginKind, PluginRegistry, Procedure, Shader};
pub use crate::render::framebuffer::{ChannelLayout, FrameBuffer};
pub use crate::render::pipeline::{RenderControl, RenderStats};
pub use crate::render::settings::{RenderSettings, RenderThreading};
pub use crate::scene::context::SceneContext;
pub use crate::scene::property::PropertyValue;
pub use crate::scene::script::{SceneCommand, SceneScript, run_script_file};
