//! Plugin capability contracts and the name-to-factory registry.
//!
//! The scene only ever talks to [`Shader`] and [`Procedure`] trait objects; concrete
//! implementations are registered under an implementation name and bound to an alias with
//! `open_plugin`.

pub mod procedure;
pub mod registry;
pub mod shader;

pub use procedure::{Procedure, ProcedureInputs};
pub use registry::{PluginFactory, PluginInfo, PluginKind, PluginRegistry};
pub use shader::{LightOutput, RayKind, Shader, ShadingHost, SurfaceInput, SurfaceOutput};
