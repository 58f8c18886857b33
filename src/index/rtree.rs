//! R-tree bulk-loaded with Sort-Tile-Recursive (STR) packing.
//!
//! # Layout
//!
//! The tree is built bottom-up in one pass and never mutated afterwards:
//!
//! 1. Point indices are sorted along axis 0 and cut into `S` slabs, each slab is
//!    sorted along axis 1 and cut again, and so on until the last axis, where runs
//!    of `capacity` indices become leaves. `S = ceil(P^(1/k))` where `P` is the
//!    number of leaves still needed and `k` the number of axes left.
//! 2. The same tiling is applied to the leaves (keyed by box centres) to form the
//!    next level, repeating until a single root remains.
//!
//! Nodes live in one `Vec`; a node's children (or, for a leaf, its point indices)
//! are a contiguous range of a second `Vec`, so queries are a plain stack walk.
//!
//! # Queries
//!
//! Subtrees whose bounding box lies farther than the linking length from the
//! query are pruned. The box test is always inclusive and computed with the same
//! arithmetic as the point distance, so it can never reject a box holding a
//! linked point. Leaf entries are then filtered with the caller's [`Linking`].
//!
//! # Complexity
//!
//! - **Build**: O(N log N) (sorting per level).
//! - **Query**: O(log N + k) for well-distributed data.

use std::ops::Range;

use super::RangeQuery;
use crate::error::{Error, Result};
use crate::metric::Linking;
use crate::points::PointSet;

/// Default maximum number of entries per node.
pub const DEFAULT_NODE_CAPACITY: usize = 16;

/// Axis-aligned bounding box.
#[derive(Debug, Clone)]
struct Aabb {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Aabb {
    fn of_point(p: &[f64]) -> Self {
        Self {
            min: p.to_vec(),
            max: p.to_vec(),
        }
    }

    fn expand_point(&mut self, p: &[f64]) {
        for (axis, &x) in p.iter().enumerate() {
            self.min[axis] = self.min[axis].min(x);
            self.max[axis] = self.max[axis].max(x);
        }
    }

    fn expand(&mut self, other: &Aabb) {
        for axis in 0..self.min.len() {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
    }

    #[inline]
    fn center(&self, axis: usize) -> f64 {
        0.5 * (self.min[axis] + self.max[axis])
    }

    /// Distance from `q` to the nearest point of the box (0 inside it).
    #[inline]
    fn min_distance(&self, q: &[f64]) -> f64 {
        q.iter()
            .enumerate()
            .map(|(axis, &x)| {
                let d = x - x.clamp(self.min[axis], self.max[axis]);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    /// Range into `entries` (leaf) or `children` (internal).
    first: usize,
    count: usize,
    leaf: bool,
}

impl Node {
    fn span(&self) -> Range<usize> {
        self.first..self.first + self.count
    }
}

/// A read-only R-tree over the points of a [`PointSet`].
#[derive(Debug, Clone)]
pub struct RTree<'a> {
    points: &'a PointSet,
    capacity: usize,
    nodes: Vec<Node>,
    entries: Vec<usize>,
    children: Vec<usize>,
    root: Option<usize>,
}

impl<'a> RTree<'a> {
    /// Bulk-load a tree with [`DEFAULT_NODE_CAPACITY`].
    pub fn bulk_load(points: &'a PointSet) -> Result<Self> {
        Self::bulk_load_with_capacity(points, DEFAULT_NODE_CAPACITY)
    }

    /// Bulk-load a tree whose nodes hold at most `capacity` entries.
    ///
    /// Fails with [`Error::IndexConstruction`] if `capacity < 2` or if the
    /// tree's storage cannot be allocated.
    pub fn bulk_load_with_capacity(points: &'a PointSet, capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(Error::IndexConstruction {
                message: format!("node capacity must be at least 2, got {capacity}"),
            });
        }

        let mut tree = Self {
            points,
            capacity,
            nodes: Vec::new(),
            entries: Vec::new(),
            children: Vec::new(),
            root: None,
        };
        let n = points.len();
        if n == 0 {
            return Ok(tree);
        }
        let dim = points.dim();

        try_reserve(&mut tree.entries, n)?;
        try_reserve(&mut tree.nodes, 2 * n.div_ceil(capacity) + 1)?;
        tree.entries.extend(0..n);

        let leaves = str_tile(&mut tree.entries, dim, capacity, &|i: usize, axis: usize| {
            points.point(i)[axis]
        });

        let mut level = Vec::with_capacity(leaves.len());
        for span in leaves {
            let members = &tree.entries[span.clone()];
            let mut bounds = Aabb::of_point(points.point(members[0]));
            for &i in &members[1..] {
                bounds.expand_point(points.point(i));
            }
            level.push(tree.nodes.len());
            tree.nodes.push(Node {
                bounds,
                first: span.start,
                count: span.len(),
                leaf: true,
            });
        }

        while level.len() > 1 {
            let nodes = &tree.nodes;
            let groups = str_tile(&mut level, dim, capacity, &|id: usize, axis: usize| {
                nodes[id].bounds.center(axis)
            });

            let mut next = Vec::with_capacity(groups.len());
            for span in groups {
                let members = &level[span];
                let mut bounds = tree.nodes[members[0]].bounds.clone();
                for &id in &members[1..] {
                    bounds.expand(&tree.nodes[id].bounds);
                }

                let first = tree.children.len();
                try_reserve(&mut tree.children, members.len())?;
                tree.children.extend_from_slice(members);
                next.push(tree.nodes.len());
                tree.nodes.push(Node {
                    bounds,
                    first,
                    count: members.len(),
                    leaf: false,
                });
            }
            level = next;
        }

        tree.root = level.first().copied();
        Ok(tree)
    }

    /// Every point within `radius` of `point` (inclusive).
    pub fn range_query(&self, point: &[f64], radius: f64) -> Vec<usize> {
        self.linked(point, &Linking::inclusive(radius))
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum entries per node.
    pub fn node_capacity(&self) -> usize {
        self.capacity
    }

    /// Number of levels, counting the leaves (0 for an empty tree).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut cur = self.root;
        while let Some(id) = cur {
            height += 1;
            let node = &self.nodes[id];
            cur = if node.leaf {
                None
            } else {
                Some(self.children[node.first])
            };
        }
        height
    }
}

impl RangeQuery for RTree<'_> {
    fn range_query_into(&self, query: &[f64], linking: &Linking, out: &mut Vec<usize>) {
        let Some(root) = self.root else {
            return;
        };
        debug_assert_eq!(query.len(), self.points.dim());

        let radius = linking.length();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.bounds.min_distance(query) > radius {
                continue;
            }
            if node.leaf {
                for &i in &self.entries[node.span()] {
                    if linking.links(query, self.points.point(i)) {
                        out.push(i);
                    }
                }
            } else {
                stack.extend_from_slice(&self.children[node.span()]);
            }
        }
    }
}

fn try_reserve<T>(v: &mut Vec<T>, additional: usize) -> Result<()> {
    v.try_reserve(additional)
        .map_err(|e| Error::IndexConstruction {
            message: e.to_string(),
        })
}

/// Partition `items` into runs of at most `capacity` spatially close items.
///
/// `key(item, axis)` is the coordinate used for sorting. Returned ranges index
/// into `items`, which is reordered in place.
fn str_tile<K>(items: &mut [usize], dim: usize, capacity: usize, key: &K) -> Vec<Range<usize>>
where
    K: Fn(usize, usize) -> f64 + Sync,
{
    let mut out = Vec::with_capacity(items.len().div_ceil(capacity));
    tile_axis(items, 0, 0, dim, capacity, key, &mut out);
    out
}

fn tile_axis<K>(
    items: &mut [usize],
    offset: usize,
    axis: usize,
    dim: usize,
    capacity: usize,
    key: &K,
    out: &mut Vec<Range<usize>>,
) where
    K: Fn(usize, usize) -> f64 + Sync,
{
    if items.len() <= capacity {
        out.push(offset..offset + items.len());
        return;
    }

    sort_along(items, axis, key);

    if axis + 1 >= dim {
        let mut start = offset;
        for chunk in items.chunks(capacity) {
            out.push(start..start + chunk.len());
            start += chunk.len();
        }
        return;
    }

    let runs = items.len().div_ceil(capacity);
    let slabs = ((runs as f64).powf(1.0 / (dim - axis) as f64).ceil() as usize).max(1);
    let slab_len = capacity * runs.div_ceil(slabs);

    let mut start = offset;
    for slab in items.chunks_mut(slab_len) {
        let len = slab.len();
        tile_axis(slab, start, axis + 1, dim, capacity, key, out);
        start += len;
    }
}

#[cfg(feature = "parallel")]
fn sort_along<K>(items: &mut [usize], axis: usize, key: &K)
where
    K: Fn(usize, usize) -> f64 + Sync,
{
    use rayon::slice::ParallelSliceMut;
    items.par_sort_unstable_by(|&a, &b| key(a, axis).total_cmp(&key(b, axis)));
}

#[cfg(not(feature = "parallel"))]
fn sort_along<K>(items: &mut [usize], axis: usize, key: &K)
where
    K: Fn(usize, usize) -> f64 + Sync,
{
    items.sort_unstable_by(|&a, &b| key(a, axis).total_cmp(&key(b, axis)));
}
