//! Neighbor discovery.
//!
//! A clustering engine only needs one question answered: "which points are
//! linked to this one?". [`RangeQuery`] is that question; the R-tree answers it
//! in `O(log N + k)`, while [`BruteScan`](crate::cluster::BruteScan) answers it
//! by checking every point.

mod rtree;

pub use rtree::{RTree, DEFAULT_NODE_CAPACITY};

use crate::metric::Linking;

/// Range queries over a fixed point set.
pub trait RangeQuery {
    /// Append to `out` the index of every point linked to `query` under `linking`.
    ///
    /// A point equal to `query` (including the query point itself, when it
    /// belongs to the set) is reported. Order is unspecified.
    fn range_query_into(&self, query: &[f64], linking: &Linking, out: &mut Vec<usize>);

    /// Allocating form of [`range_query_into`](Self::range_query_into).
    fn linked(&self, query: &[f64], linking: &Linking) -> Vec<usize> {
        let mut out = Vec::new();
        self.range_query_into(query, linking, &mut out);
        out
    }
}
