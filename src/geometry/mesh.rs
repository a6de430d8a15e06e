use crate::foundation::core::{Bounds3, DVec2, DVec3, Ray};
use crate::foundation::error::{HikariError, HikariResult};

/// Name of the shading group every face belongs to unless tagged otherwise.
pub const DEFAULT_SHADING_GROUP: &str = "";

/// Triangle mesh with optional per-vertex velocity, normals and texture coordinates.
///
/// Positions are in object space. A vertex with velocity `v` sits at `p + t * v` at shutter time `t`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<DVec3>,
    velocities: Option<Vec<DVec3>>,
    normals: Option<Vec<DVec3>>,
    uvs: Option<Vec<DVec2>>,
    faces: Vec<[u32; 3]>,
    face_groups: Vec<u32>,
    group_names: Vec<String>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Barycentric hit on one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub t: f64,
    pub face: u32,
    pub b1: f64,
    pub b2: f64,
}

/// Interpolated attributes at a hit, in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub position: DVec3,
    pub normal: DVec3,
    pub geometric_normal: DVec3,
    pub uv: DVec2,
    pub group: u32,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            velocities: None,
            normals: None,
            uvs: None,
            faces: Vec::new(),
            face_groups: Vec::new(),
            group_names: vec![DEFAULT_SHADING_GROUP.to_owned()],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> Option<&[DVec3]> {
        self.velocities.as_deref()
    }

    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    pub fn uvs(&self) -> Option<&[DVec2]> {
        self.uvs.as_deref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn add_vertex(&mut self, p: DVec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    pub fn add_face(&mut self, face: [u32; 3]) {
        self.add_face_in_group(face, 0);
    }

    pub fn add_face_in_group(&mut self, face: [u32; 3], group: u32) {
        self.faces.push(face);
        self.face_groups.push(group);
    }

    /// Registers a shading group name and returns its index. Existing names are reused.
    pub fn add_group(&mut self, name: &str) -> u32 {
        if let Some(i) = self.group_names.iter().position(|g| g == name) {
            return i as u32;
        }
        self.group_names.push(name.to_owned());
        (self.group_names.len() - 1) as u32
    }

    pub fn set_velocities(&mut self, v: Vec<DVec3>) -> HikariResult<()> {
        if v.len() != self.positions.len() {
            return Err(HikariError::validation(format!(
                "velocity count {} does not match vertex count {}",
                v.len(),
                self.positions.len()
            )));
        }
        self.velocities = Some(v);
        Ok(())
    }

    pub fn set_normals(&mut self, n: Vec<DVec3>) -> HikariResult<()> {
        if n.len() != self.positions.len() {
            return Err(HikariError::validation(format!(
                "normal count {} does not match vertex count {}",
                n.len(),
                self.positions.len()
            )));
        }
        self.normals = Some(n);
        Ok(())
    }

    pub fn set_uvs(&mut self, uv: Vec<DVec2>) -> HikariResult<()> {
        if uv.len() != self.positions.len() {
            return Err(HikariError::validation(format!(
                "uv count {} does not match vertex count {}",
                uv.len(),
                self.positions.len()
            )));
        }
        self.uvs = Some(uv);
        Ok(())
    }

    /// True when any vertex moves over the shutter interval.
    pub fn has_motion(&self) -> bool {
        self.velocities
            .as_ref()
            .is_some_and(|v| v.iter().any(|d| *d != DVec3::ZERO))
    }

    /// Checks face indices and group tags; run after a procedure writes the mesh.
    pub fn validate(&self) -> HikariResult<()> {
        let n = self.positions.len() as u32;
        for (i, f) in self.faces.iter().enumerate() {
            if f.iter().any(|&v| v >= n) {
                return Err(HikariError::validation(format!(
                    "face {i} references a vertex out of range ({n} vertices)"
                )));
            }
        }
        let groups = self.group_names.len() as u32;
        if self.face_groups.iter().any(|&g| g >= groups) {
            return Err(HikariError::validation("face references unknown shading group"));
        }
        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err(HikariError::validation("mesh has non-finite positions"));
        }
        Ok(())
    }

    /// Smooth per-vertex normals from area-weighted face normals.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![DVec3::ZERO; self.positions.len()];
        for f in &self.faces {
            let [a, b, c] = f.map(|i| self.positions[i as usize]);
            let n = (b - a).cross(c - a);
            for &i in f {
                acc[i as usize] += n;
            }
        }
        for n in &mut acc {
            *n = n.normalize_or_zero();
        }
        self.normals = Some(acc);
    }

    #[inline]
    pub fn position_at(&self, i: usize, time: f64) -> DVec3 {
        let p = self.positions[i];
        match &self.velocities {
            Some(v) => p + v[i] * time,
            None => p,
        }
    }

    pub fn triangle_at(&self, face: usize, time: f64) -> [DVec3; 3] {
        self.faces[face].map(|i| self.position_at(i as usize, time))
    }

    pub fn bounds(&self) -> Bounds3 {
        self.swept_bounds(0.0, 0.0)
    }

    /// Bounds covering every vertex position over `[t0, t1]`.
    pub fn swept_bounds(&self, t0: f64, t1: f64) -> Bounds3 {
        let mut b = Bounds3::EMPTY;
        for i in 0..self.positions.len() {
            b.add_point(self.position_at(i, t0));
            b.add_point(self.position_at(i, t1));
        }
        b
    }

    pub fn face_swept_bounds(&self, face: usize, t0: f64, t1: f64) -> Bounds3 {
        let mut b = Bounds3::EMPTY;
        for p in self.triangle_at(face, t0) {
            b.add_point(p);
        }
        for p in self.triangle_at(face, t1) {
            b.add_point(p);
        }
        b
    }

    /// Moller-Trumbore against the face as deformed to `time`. Both sides are hittable.
    pub fn intersect_face(&self, face: u32, ray: &Ray, time: f64) -> Option<TriangleHit> {
        let [p0, p1, p2] = self.triangle_at(face as usize, time);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let pvec = ray.dir.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < 1e-14 {
            return None;
        }
        let inv = 1.0 / det;
        let tvec = ray.orig - p0;
        let b1 = tvec.dot(pvec) * inv;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }
        let qvec = tvec.cross(e1);
        let b2 = ray.dir.dot(qvec) * inv;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }
        let t = e2.dot(qvec) * inv;
        if !ray.in_range(t) {
            return None;
        }
        Some(TriangleHit { t, face, b1, b2 })
    }

    /// Attributes at a hit. The shading normal falls back to the geometric one.
    pub fn surface_point(&self, hit: &TriangleHit, time: f64) -> SurfacePoint {
        let f = hit.face as usize;
        let [i0, i1, i2] = self.faces[f].map(|i| i as usize);
        let b0 = 1.0 - hit.b1 - hit.b2;
        let [p0, p1, p2] = self.triangle_at(f, time);
        let position = p0 * b0 + p1 * hit.b1 + p2 * hit.b2;
        let geometric_normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        let normal = match &self.normals {
            Some(n) => {
                let s = (n[i0] * b0 + n[i1] * hit.b1 + n[i2] * hit.b2).normalize_or_zero();
                if s == DVec3::ZERO { geometric_normal } else { s }
            }
            None => geometric_normal,
        };
        let uv = match &self.uvs {
            Some(uv) => uv[i0] * b0 + uv[i1] * hit.b1 + uv[i2] * hit.b2,
            None => DVec2::new(hit.b1, hit.b2),
        };
        SurfacePoint {
            position,
            normal,
            geometric_normal,
            uv,
            group: self.face_groups.get(f).copied().unwrap_or(0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mesh.rs"]
mod tests;
