use crate::error::Result;
use crate::groups::Groups;
use crate::points::PointSet;

/// Common interface for hard clustering algorithms (one group per point).
pub trait Clustering {
    /// Partition the points into groups.
    fn fit_groups(&self, points: &PointSet) -> Result<Groups>;

    /// Fit and return one group label per input point.
    fn fit_predict(&self, points: &PointSet) -> Result<Vec<usize>> {
        Ok(self.fit_groups(points)?.labels())
    }
}
