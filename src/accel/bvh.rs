use smallvec::SmallVec;

use crate::foundation::core::{Bounds3, Ray};

const MAX_LEAF_PRIMS: usize = 4;

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    Leaf { first: u32, count: u32 },
    /// Left child is the next node; `right` is an absolute index.
    Interior { right: u32 },
}

#[derive(Clone, Copy, Debug)]
struct Node {
    bounds: Bounds3,
    kind: NodeKind,
}

/// Flattened bounding volume hierarchy over caller-indexed primitives.
///
/// The tree only stores bounds and primitive ids; intersection of the primitives themselves is
/// supplied per query, so one structure serves mesh faces and scene instances alike.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: Vec<Node>,
    prims: Vec<u32>,
}

struct BuildPrim {
    index: u32,
    bounds: Bounds3,
    centroid: crate::foundation::core::DVec3,
}

impl Bvh {
    /// Median split on the widest centroid axis. Empty bounds are skipped.
    pub fn build(prim_bounds: &[Bounds3]) -> Self {
        let mut items: Vec<BuildPrim> = prim_bounds
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(|(i, b)| BuildPrim {
                index: i as u32,
                bounds: *b,
                centroid: b.centroid(),
            })
            .collect();
        let mut bvh = Bvh {
            nodes: Vec::with_capacity(items.len().max(1) * 2),
            prims: Vec::with_capacity(items.len()),
        };
        if !items.is_empty() {
            bvh.build_range(&mut items);
        }
        bvh
    }

    fn build_range(&mut self, items: &mut [BuildPrim]) -> u32 {
        let bounds = items
            .iter()
            .fold(Bounds3::EMPTY, |acc, p| acc.union(p.bounds));
        let at = self.nodes.len() as u32;

        if items.len() <= MAX_LEAF_PRIMS {
            let first = self.prims.len() as u32;
            self.prims.extend(items.iter().map(|p| p.index));
            self.nodes.push(Node {
                bounds,
                kind: NodeKind::Leaf {
                    first,
                    count: items.len() as u32,
                },
            });
            return at;
        }

        let centroid_bounds = items.iter().fold(Bounds3::EMPTY, |mut acc, p| {
            acc.add_point(p.centroid);
            acc
        });
        let axis = centroid_bounds.longest_axis();
        let mid = items.len() / 2;
        items.select_nth_unstable_by(mid, |a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        self.nodes.push(Node {
            bounds,
            kind: NodeKind::Interior { right: 0 },
        });
        let (left, right) = items.split_at_mut(mid);
        self.build_range(left);
        let right_at = self.build_range(right);
        self.nodes[at as usize].kind = NodeKind::Interior { right: right_at };
        at
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> Bounds3 {
        self.nodes.first().map_or(Bounds3::EMPTY, |n| n.bounds)
    }

    /// Nearest hit. `hit_prim` tests one primitive against a ray whose `tmax` already
    /// shrinks to the closest accepted hit, and returns `(t, payload)` on a hit.
    pub fn intersect<H>(
        &self,
        ray: &Ray,
        mut hit_prim: impl FnMut(u32, &Ray) -> Option<(f64, H)>,
    ) -> Option<(f64, H)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut ray = *ray;
        let mut best: Option<(f64, H)> = None;
        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        stack.push(0);

        while let Some(ix) = stack.pop() {
            let node = &self.nodes[ix as usize];
            if node.bounds.intersect_ray(&ray).is_none() {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { first, count } => {
                    for &p in &self.prims[first as usize..(first + count) as usize] {
                        if let Some((t, h)) = hit_prim(p, &ray) {
                            if ray.in_range(t) {
                                ray.tmax = t;
                                best = Some((t, h));
                            }
                        }
                    }
                }
                NodeKind::Interior { right } => {
                    stack.push(right);
                    stack.push(ix + 1);
                }
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "../../tests/unit/accel/bvh.rs"]
mod tests;
