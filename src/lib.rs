//! Friends-of-friends clustering of point clouds.
//!
//! `fof` groups `N` points in `D` dimensions into the connected components of
//! the "distance ≤ ℓ" graph, the classic friends-of-friends halo finder of
//! N-body cosmology, usable on any Euclidean point cloud.
//!
//! - [`points`]: input normalization ([`PointSet`])
//! - [`index`]: the STR bulk-loaded [`RTree`] and the [`RangeQuery`] seam
//! - [`cluster`]: the indexed and brute-force engines ([`FriendsOfFriends`])
//! - [`groups`]: the returned partition ([`Groups`])
//! - [`gadget`]: Gadget-2 snapshot positions as a point set
//!
//! ```rust
//! let groups = fof::friends_of_friends(&[[0.0, 0.0], [1.0, 0.0]], 1.001, false).unwrap();
//! assert_eq!(groups, vec![vec![0, 1]]);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod gadget;
pub mod groups;
pub mod index;
pub mod metric;
pub mod points;

pub use cluster::{Assembly, BruteScan, Clustering, Engine, FriendsOfFriends};
pub use error::{Error, ErrorKind, Result};
pub use groups::Groups;
pub use index::{RTree, RangeQuery};
pub use metric::{Linking, Threshold};
pub use points::{Coordinate, PointSet};

/// Friends-of-friends groups of `points` for linking length `linking_length`.
///
/// `points` is any sequence of equal-length numeric rows. With `use_brute` the
/// all-pairs engine is used instead of the R-tree. Each returned group lists
/// original 0-based point indices; no ordering is guaranteed.
pub fn friends_of_friends<T, R>(
    points: &[R],
    linking_length: f64,
    use_brute: bool,
) -> Result<Vec<Vec<usize>>>
where
    T: Coordinate,
    R: AsRef<[T]>,
{
    let fof = FriendsOfFriends::new(linking_length).with_brute(use_brute);
    let points = PointSet::from_rows(points)?;
    Ok(fof.fit(&points)?.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point() {
        let groups = friends_of_friends(&[vec![0, 0], vec![0, 1]], 0.5, false).unwrap();
        assert_eq!(groups.len(), 2);

        let empty: [[f64; 2]; 0] = [];
        assert!(friends_of_friends(&empty, 1.0, false).unwrap().is_empty());
    }

    #[test]
    fn test_entry_point_rejects_bad_input() {
        let err = friends_of_friends(&[vec![0.0, 0.0], vec![1.0]], 1.0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = friends_of_friends(&[[0.0]], -0.1, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
