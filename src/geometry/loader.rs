//! Geometry file loading behind the [`MeshLoader`] contract.

use std::io::BufRead;
use std::path::Path;

use crate::foundation::core::{DVec2, DVec3};
use crate::foundation::error::{HikariError, HikariResult};
use crate::geometry::mesh::Mesh;

/// How a loader may access its file. Only reading is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoMode {
    Read,
}

impl IoMode {
    pub fn parse(s: &str) -> HikariResult<Self> {
        match s {
            "r" | "read" => Ok(Self::Read),
            other => Err(HikariError::validation(format!(
                "unsupported io_mode '{other}' (expected \"r\")"
            ))),
        }
    }
}

/// Populates a mesh from a file.
pub trait MeshLoader: Send + Sync {
    fn load(&self, path: &Path, mode: IoMode) -> HikariResult<Mesh>;
}

/// ASCII Stanford PLY reader (triangles and polygons, optional normals/uvs/velocities).
#[derive(Clone, Copy, Debug, Default)]
pub struct PlyLoader;

#[derive(Default)]
struct PlyHeader {
    vertex_count: usize,
    face_count: usize,
    vertex_props: Vec<String>,
    saw_face_list: bool,
}

fn malformed(path: &Path, msg: impl std::fmt::Display) -> HikariError {
    HikariError::validation(format!("malformed ply '{}': {msg}", path.display()))
}

fn parse_header(
    path: &Path,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> HikariResult<PlyHeader> {
    let mut next = |what: &str| -> HikariResult<String> {
        match lines.next() {
            Some(Ok(l)) => Ok(l),
            Some(Err(e)) => Err(HikariError::io("read ply", path, e)),
            None => Err(malformed(path, format!("unexpected end of file in {what}"))),
        }
    };

    if next("magic")?.trim() != "ply" {
        return Err(malformed(path, "missing 'ply' magic"));
    }
    let mut h = PlyHeader::default();
    let mut current = String::new();
    loop {
        let line = next("header")?;
        let tok: Vec<&str> = line.split_whitespace().collect();
        match tok.as_slice() {
            ["format", "ascii", _] => {}
            ["format", other, ..] => {
                return Err(malformed(path, format!("unsupported format '{other}'")));
            }
            ["comment", ..] | ["obj_info", ..] | [] => {}
            ["element", name, count] => {
                let n: usize = count
                    .parse()
                    .map_err(|_| malformed(path, format!("bad element count '{count}'")))?;
                match *name {
                    "vertex" => h.vertex_count = n,
                    "face" => h.face_count = n,
                    _ => {}
                }
                current = (*name).to_owned();
            }
            ["property", "list", _, _, _] if current == "face" => h.saw_face_list = true,
            ["property", _, name] if current == "vertex" => h.vertex_props.push((*name).to_owned()),
            ["property", ..] => {}
            ["end_header"] => break,
            _ => return Err(malformed(path, format!("unexpected header line '{line}'"))),
        }
    }
    if h.face_count > 0 && !h.saw_face_list {
        return Err(malformed(path, "face element without vertex index list"));
    }
    Ok(h)
}

fn prop_index(props: &[String], names: &[&str]) -> Option<usize> {
    props.iter().position(|p| names.contains(&p.as_str()))
}

/// Non-negative integer that fits a `u32`.
fn as_index(v: f64) -> Option<u32> {
    (v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v)).then_some(v as u32)
}

fn triple(props: &[String], names: [&str; 3]) -> Option<[usize; 3]> {
    Some([
        prop_index(props, &[names[0]])?,
        prop_index(props, &[names[1]])?,
        prop_index(props, &[names[2]])?,
    ])
}

impl MeshLoader for PlyLoader {
    #[tracing::instrument(skip(self))]
    fn load(&self, path: &Path, mode: IoMode) -> HikariResult<Mesh> {
        let IoMode::Read = mode;
        let f = std::fs::File::open(path).map_err(|e| HikariError::io("open ply", path, e))?;
        let mut lines = std::io::BufReader::new(f).lines();
        let h = parse_header(path, &mut lines)?;

        let pos = triple(&h.vertex_props, ["x", "y", "z"])
            .ok_or_else(|| malformed(path, "vertex element lacks x/y/z"))?;
        let nml = triple(&h.vertex_props, ["nx", "ny", "nz"]);
        let vel = triple(&h.vertex_props, ["vx", "vy", "vz"]);
        let uv = prop_index(&h.vertex_props, &["u", "s", "texture_u"])
            .zip(prop_index(&h.vertex_props, &["v", "t", "texture_v"]));

        let mut mesh = Mesh::new();
        let mut normals = Vec::new();
        let mut velocities = Vec::new();
        let mut uvs = Vec::new();

        let mut data = lines.filter(|l| l.as_ref().map_or(true, |s| !s.trim().is_empty()));
        let mut next_row = |what: &str| -> HikariResult<Vec<f64>> {
            let line = match data.next() {
                Some(Ok(l)) => l,
                Some(Err(e)) => return Err(HikariError::io("read ply", path, e)),
                None => return Err(malformed(path, format!("missing {what} data"))),
            };
            line.split_whitespace()
                .map(|t| {
                    t.parse::<f64>()
                        .map_err(|_| malformed(path, format!("bad number '{t}'")))
                })
                .collect()
        };

        for _ in 0..h.vertex_count {
            let row = next_row("vertex")?;
            if row.len() < h.vertex_props.len() {
                return Err(malformed(path, "short vertex row"));
            }
            let v3 = |ix: [usize; 3]| DVec3::new(row[ix[0]], row[ix[1]], row[ix[2]]);
            mesh.add_vertex(v3(pos));
            if let Some(ix) = nml {
                normals.push(v3(ix));
            }
            if let Some(ix) = vel {
                velocities.push(v3(ix));
            }
            if let Some((u, v)) = uv {
                uvs.push(DVec2::new(row[u], row[v]));
            }
        }

        for _ in 0..h.face_count {
            let row = next_row("face")?;
            let n = row
                .first()
                .and_then(|&v| as_index(v))
                .ok_or_else(|| malformed(path, "bad face vertex count"))? as usize;
            if n < 3 {
                return Err(malformed(path, "face with fewer than 3 vertices"));
            }
            if n > row.len() - 1 {
                return Err(malformed(path, "short face row"));
            }
            let idx = row[1..=n]
                .iter()
                .map(|&v| {
                    as_index(v).ok_or_else(|| malformed(path, format!("bad face index {v}")))
                })
                .collect::<HikariResult<Vec<u32>>>()?;
            for k in 1..n - 1 {
                mesh.add_face([idx[0], idx[k], idx[k + 1]]);
            }
        }

        if nml.is_some() {
            mesh.set_normals(normals)?;
        }
        if vel.is_some() {
            mesh.set_velocities(velocities)?;
        }
        if uv.is_some() {
            mesh.set_uvs(uvs)?;
        }
        mesh.validate()?;
        tracing::debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "loaded ply"
        );
        Ok(mesh)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/loader.rs"]
mod tests;
