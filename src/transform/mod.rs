//! Instance transforms: `T * R * S` composition and cached inverses for ray transformation.

pub mod affine;
