//! Render side: cameras, lights, textures, sampling, the tracer and the frame pipeline.

pub mod camera;
pub mod framebuffer;
pub mod light;
pub mod pipeline;
pub mod sampler;
pub mod settings;
pub mod texture;
pub mod trace;
