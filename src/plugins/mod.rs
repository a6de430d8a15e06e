//! Built-in shader and procedure implementations.

mod constant_shader;
mod constant_volume;
mod plastic_shader;
mod point_clouds;
mod shape;
mod stanford_ply;
mod velocity_generator;
mod volume_shader;

pub use constant_shader::ConstantShader;
pub use constant_volume::ConstantVolumeProcedure;
pub use plastic_shader::PlasticShader;
pub use point_clouds::PointCloudsProcedure;
pub use shape::ShapeProcedure;
pub use stanford_ply::StanfordPlyProcedure;
pub use velocity_generator::VelocityGeneratorProcedure;
pub use volume_shader::VolumeShader;

use crate::plugin::{PluginFactory, PluginInfo, Procedure, Shader};

fn shader<T: Shader + Default + 'static>() -> Box<dyn Shader> {
    Box::new(T::default())
}

fn procedure<T: Procedure + Default + 'static>() -> Box<dyn Procedure> {
    Box::new(T::default())
}

/// Every implementation registered by [`crate::PluginRegistry::with_builtins`].
pub fn builtins() -> Vec<PluginInfo> {
    vec![
        PluginInfo {
            name: "ConstantShader",
            help: "Unlit color, optionally multiplied by a texture.",
            factory: PluginFactory::Shader(shader::<ConstantShader>),
        },
        PluginInfo {
            name: "PlasticShader",
            help: "Diffuse plus Phong specular with Fresnel-weighted reflection.",
            factory: PluginFactory::Shader(shader::<PlasticShader>),
        },
        PluginInfo {
            name: "VolumeShader",
            help: "Lit scattering color for volume samples.",
            factory: PluginFactory::Shader(shader::<VolumeShader>),
        },
        PluginInfo {
            name: "ConstantVolumeProcedure",
            help: "Fills a volume with a constant density.",
            factory: PluginFactory::Procedure(procedure::<ConstantVolumeProcedure>),
        },
        PluginInfo {
            name: "PointCloudsProcedure",
            help: "Rasterizes points into a volume as turbulent soft spheres.",
            factory: PluginFactory::Procedure(procedure::<PointCloudsProcedure>),
        },
        PluginInfo {
            name: "VelocityGeneratorProcedure",
            help: "Writes per-vertex velocity into a mesh.",
            factory: PluginFactory::Procedure(procedure::<VelocityGeneratorProcedure>),
        },
        PluginInfo {
            name: "StanfordPlyProcedure",
            help: "Loads an ASCII PLY file into a mesh.",
            factory: PluginFactory::Procedure(procedure::<StanfordPlyProcedure>),
        },
        PluginInfo {
            name: "ShapeProcedure",
            help: "Generates a plane, box or sphere mesh.",
            factory: PluginFactory::Procedure(procedure::<ShapeProcedure>),
        },
    ]
}
