//! Scene construction: named entities, their properties and the render-time snapshot.

pub mod context;
pub mod entity;
pub mod frozen;
pub mod property;
pub mod script;
