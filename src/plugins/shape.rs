use std::f64::consts::{PI, TAU};

use crate::foundation::core::{DVec2, DVec3};
use crate::foundation::error::{HikariError, HikariResult};
use crate::geometry::mesh::Mesh;
use crate::plugin::{Procedure, ProcedureInputs};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("shape", PropertyKind::Str),
    PropertySpec::new("size", PropertyKind::Scalar),
    PropertySpec::new("divisions", PropertyKind::Scalar),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Plane,
    Box,
    Sphere,
}

impl Shape {
    fn parse(s: &str) -> HikariResult<Self> {
        match s {
            "plane" => Ok(Self::Plane),
            "box" => Ok(Self::Box),
            "sphere" => Ok(Self::Sphere),
            other => Err(HikariError::validation(format!(
                "unknown shape '{other}' (expected plane, box or sphere)"
            ))),
        }
    }
}

/// Generates a centered primitive into the bound mesh.
///
/// - `plane`: `size` x `size` square in XZ facing +Y, `divisions` quads per side.
/// - `box`: cube with edge `size`.
/// - `sphere`: UV sphere of diameter `size` with `divisions` rings.
#[derive(Debug, Clone)]
pub struct ShapeProcedure {
    shape: Shape,
    size: f64,
    divisions: u32,
}

impl Default for ShapeProcedure {
    fn default() -> Self {
        Self {
            shape: Shape::Plane,
            size: 1.0,
            divisions: 16,
        }
    }
}

impl Procedure for ShapeProcedure {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        match name {
            "shape" => self.shape = Shape::parse(value.as_str()?)?,
            "size" => {
                let size = value.as_scalar()?;
                if size <= 0.0 {
                    return Err(HikariError::validation("shape size must be positive"));
                }
                self.size = size;
            }
            "divisions" => self.divisions = value.as_count()?.clamp(1, 1024),
            _ => {}
        }
        Ok(())
    }

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()> {
        let mesh = inputs
            .mesh
            .ok_or_else(|| HikariError::validation("no mesh bound to 'mesh'"))?;
        *mesh = match self.shape {
            Shape::Plane => plane(self.size, self.divisions),
            Shape::Box => cube(self.size),
            Shape::Sphere => sphere(self.size * 0.5, self.divisions.max(3)),
        }?;
        Ok(())
    }
}

fn grid(
    mesh: &mut Mesh,
    n: u32,
    normals: &mut Vec<DVec3>,
    uvs: &mut Vec<DVec2>,
    point: impl Fn(f64, f64) -> (DVec3, DVec3),
) {
    let base = mesh.vertex_count() as u32;
    for j in 0..=n {
        for i in 0..=n {
            let (u, v) = (f64::from(i) / f64::from(n), f64::from(j) / f64::from(n));
            let (p, nrm) = point(u, v);
            mesh.add_vertex(p);
            normals.push(nrm);
            uvs.push(DVec2::new(u, v));
        }
    }
    let row = n + 1;
    for j in 0..n {
        for i in 0..n {
            let a = base + j * row + i;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;
            mesh.add_face([a, b, c]);
            mesh.add_face([a, c, d]);
        }
    }
}

fn finish(mut mesh: Mesh, normals: Vec<DVec3>, uvs: Vec<DVec2>) -> HikariResult<Mesh> {
    mesh.set_normals(normals)?;
    mesh.set_uvs(uvs)?;
    Ok(mesh)
}

fn plane(size: f64, n: u32) -> HikariResult<Mesh> {
    let h = size * 0.5;
    let mut mesh = Mesh::new();
    let (mut normals, mut uvs) = (Vec::new(), Vec::new());
    grid(&mut mesh, n, &mut normals, &mut uvs, |u, v| {
        (DVec3::new(-h + u * size, 0.0, h - v * size), DVec3::Y)
    });
    finish(mesh, normals, uvs)
}

fn cube(size: f64) -> HikariResult<Mesh> {
    let h = size * 0.5;
    let mut mesh = Mesh::new();
    let (mut normals, mut uvs) = (Vec::new(), Vec::new());
    // (normal, u axis, v axis) per face; u x v points along the normal.
    let faces = [
        (DVec3::X, DVec3::NEG_Z, DVec3::Y),
        (DVec3::NEG_X, DVec3::Z, DVec3::Y),
        (DVec3::Y, DVec3::X, DVec3::NEG_Z),
        (DVec3::NEG_Y, DVec3::X, DVec3::Z),
        (DVec3::Z, DVec3::X, DVec3::Y),
        (DVec3::NEG_Z, DVec3::NEG_X, DVec3::Y),
    ];
    for (nrm, du, dv) in faces {
        grid(&mut mesh, 1, &mut normals, &mut uvs, |u, v| {
            let p = nrm * h + du * ((u - 0.5) * size) + dv * ((v - 0.5) * size);
            (p, nrm)
        });
    }
    finish(mesh, normals, uvs)
}

fn sphere(radius: f64, rings: u32) -> HikariResult<Mesh> {
    let mut mesh = Mesh::new();
    let (mut normals, mut uvs) = (Vec::new(), Vec::new());
    grid(&mut mesh, rings, &mut normals, &mut uvs, |u, v| {
        let phi = u * TAU;
        let theta = (1.0 - v) * PI;
        let n = DVec3::new(theta.sin() * phi.cos(), theta.cos(), -theta.sin() * phi.sin());
        (n * radius, n)
    });
    finish(mesh, normals, uvs)
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/shape.rs"]
mod tests;
