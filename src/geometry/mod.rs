//! Geometry and volume store: meshes, voxel volumes, turbulence fields and file loaders.

pub mod loader;
pub mod mesh;
pub mod turbulence;
pub mod volume;
