use crate::foundation::core::{Bounds3, DVec3};
use crate::foundation::error::{HikariError, HikariResult};

/// Largest grid `resize` accepts (512^3 voxels, 512 MiB of density).
pub const MAX_VOXELS: usize = 1 << 27;

/// Dense scalar density grid over an object-space box.
///
/// Voxel `(x, y, z)` covers the cell whose center is `bounds.min + (i + 0.5) * voxel_size`.
/// Storage is x-fastest: `index = z * nx * ny + y * nx + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    bounds: Bounds3,
    resolution: [usize; 3],
    data: Vec<f32>,
}

impl Default for Volume {
    fn default() -> Self {
        Self::new()
    }
}

impl Volume {
    /// Empty volume with degenerate bounds at the origin. Sampling it always returns `None`.
    pub fn new() -> Self {
        Self {
            bounds: Bounds3::new(DVec3::ZERO, DVec3::ZERO),
            resolution: [0, 0, 0],
            data: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Corners may be set one at a time; ordering is checked by [`Volume::validate`].
    pub fn set_bounds(&mut self, bounds: Bounds3) -> HikariResult<()> {
        if !bounds.min.is_finite() || !bounds.max.is_finite() {
            return Err(HikariError::validation("volume bounds must be finite"));
        }
        self.bounds = bounds;
        Ok(())
    }

    pub fn validate(&self) -> HikariResult<()> {
        if self.bounds.min.cmpgt(self.bounds.max).any() {
            return Err(HikariError::validation(
                "volume bounds_min must not exceed bounds_max",
            ));
        }
        Ok(())
    }

    /// Reallocates the grid and clears it to zero.
    pub fn resize(&mut self, nx: usize, ny: usize, nz: usize) -> HikariResult<()> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(HikariError::validation(format!(
                "volume resolution must be at least 1 on every axis, got {nx}x{ny}x{nz}"
            )));
        }
        let len = nx
            .checked_mul(ny)
            .and_then(|v| v.checked_mul(nz))
            .filter(|&v| v <= MAX_VOXELS)
            .ok_or_else(|| {
                HikariError::validation(format!(
                    "volume resolution {nx}x{ny}x{nz} exceeds {MAX_VOXELS} voxels"
                ))
            })?;
        self.resolution = [nx, ny, nz];
        self.data = vec![0.0; len];
        Ok(())
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    #[inline]
    fn index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        let [nx, ny, nz] = self.resolution.map(|r| r as i64);
        if x < 0 || y < 0 || z < 0 || x >= nx || y >= ny || z >= nz {
            return None;
        }
        Some((z * nx * ny + y * nx + x) as usize)
    }

    /// Out-of-range writes are ignored.
    pub fn set_value(&mut self, x: usize, y: usize, z: usize, value: f32) {
        if let Some(i) = self.index(x as i64, y as i64, z as i64) {
            self.data[i] = value;
        }
    }

    /// Out-of-range reads are zero.
    pub fn value(&self, x: i64, y: i64, z: i64) -> f32 {
        self.index(x, y, z).map_or(0.0, |i| self.data[i])
    }

    pub fn voxel_size(&self) -> DVec3 {
        let [nx, ny, nz] = self.resolution;
        if nx == 0 {
            return DVec3::ZERO;
        }
        self.bounds.size() / DVec3::new(nx as f64, ny as f64, nz as f64)
    }

    pub fn voxel_center(&self, x: usize, y: usize, z: usize) -> DVec3 {
        self.bounds.min + (DVec3::new(x as f64, y as f64, z as f64) + 0.5) * self.voxel_size()
    }

    /// Continuous grid coordinates of an object-space point (voxel units, cell corners on integers).
    fn grid_point(&self, p: DVec3) -> DVec3 {
        let [nx, ny, nz] = self.resolution;
        let res = DVec3::new(nx as f64, ny as f64, nz as f64);
        (p - self.bounds.min) / self.bounds.size() * res
    }

    /// Trilinear density at an object-space point; `None` outside the bounds or when unallocated.
    ///
    /// Neighbours outside the grid contribute zero, so density fades over the outer half voxel.
    pub fn sample(&self, p: DVec3) -> Option<f32> {
        if self.data.is_empty() || !self.bounds.contains(p) {
            return None;
        }
        let size = self.bounds.size();
        if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
            return None;
        }
        let g = self.grid_point(p) - 0.5;
        let base = g.floor();
        let (bx, by, bz) = (base.x as i64, base.y as i64, base.z as i64);
        let mut value = 0.0f64;
        for k in 0..2 {
            let z = bz + k;
            let wz = 1.0 - (g.z - z as f64).abs();
            for j in 0..2 {
                let y = by + j;
                let wy = 1.0 - (g.y - y as f64).abs();
                for i in 0..2 {
                    let x = bx + i;
                    let wx = 1.0 - (g.x - x as f64).abs();
                    value += wx * wy * wz * f64::from(self.value(x, y, z));
                }
            }
        }
        Some(value as f32)
    }

    /// Inclusive voxel index range overlapping an object-space box, clamped to the grid.
    pub fn voxel_range(&self, region: &Bounds3) -> Option<([usize; 3], [usize; 3])> {
        if self.data.is_empty() {
            return None;
        }
        let lo = self.grid_point(region.min).floor();
        let hi = self.grid_point(region.max).floor();
        let mut min = [0usize; 3];
        let mut max = [0usize; 3];
        for a in 0..3 {
            let n = self.resolution[a] as f64;
            if hi[a] < 0.0 || lo[a] >= n {
                return None;
            }
            min[a] = lo[a].max(0.0) as usize;
            max[a] = hi[a].min(n - 1.0) as usize;
        }
        Some((min, max))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/volume.rs"]
mod tests;
