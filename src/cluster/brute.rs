use crate::index::RangeQuery;
use crate::metric::Linking;
use crate::points::PointSet;

/// Neighbor discovery by checking every point: `O(N)` per query, no setup cost.
///
/// Worth it for small inputs, and as the reference the R-tree is checked against.
#[derive(Debug, Clone, Copy)]
pub struct BruteScan<'a> {
    points: &'a PointSet,
}

impl<'a> BruteScan<'a> {
    /// Scan over `points`.
    pub fn new(points: &'a PointSet) -> Self {
        Self { points }
    }
}

impl RangeQuery for BruteScan<'_> {
    fn range_query_into(&self, query: &[f64], linking: &Linking, out: &mut Vec<usize>) {
        out.extend(
            self.points
                .iter()
                .enumerate()
                .filter(|(_, p)| linking.links(query, p))
                .map(|(i, _)| i),
        );
    }
}
