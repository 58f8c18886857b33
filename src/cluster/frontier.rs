//! Group assembly.
//!
//! Two interchangeable ways to turn a neighbor source into a partition:
//!
//! - [`expand_groups`] walks each component from a seed with an explicit
//!   frontier. Every point moves `Unvisited -> Queued -> Assigned` exactly once,
//!   so there are exactly `N` range queries and `N` transitions to `Assigned`.
//! - [`union_groups`] issues the same `N` range queries, merges every linked pair
//!   into a disjoint-set forest, and flattens it at the end.
//!
//! Both produce the same partition for the same neighbor source.

use super::util::UnionFind;
use crate::index::RangeQuery;
use crate::metric::Linking;
use crate::points::PointSet;

/// Traversal state of one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointState {
    Unvisited,
    Queued,
    Assigned,
}

pub(crate) fn expand_groups<Q: RangeQuery + ?Sized>(
    points: &PointSet,
    query: &Q,
    linking: &Linking,
) -> Vec<Vec<usize>> {
    let n = points.len();
    let mut state = vec![PointState::Unvisited; n];
    let mut groups = Vec::new();
    let mut frontier: Vec<usize> = Vec::new();
    let mut neighbors: Vec<usize> = Vec::new();

    for seed in 0..n {
        if state[seed] != PointState::Unvisited {
            continue;
        }
        state[seed] = PointState::Queued;
        frontier.push(seed);

        let mut group = Vec::new();
        while let Some(j) = frontier.pop() {
            debug_assert_eq!(state[j], PointState::Queued);
            state[j] = PointState::Assigned;
            group.push(j);

            neighbors.clear();
            query.range_query_into(points.point(j), linking, &mut neighbors);
            for &k in &neighbors {
                if state[k] == PointState::Unvisited {
                    state[k] = PointState::Queued;
                    frontier.push(k);
                }
            }
        }
        groups.push(group);
    }

    debug_assert!(state.iter().all(|&s| s == PointState::Assigned));
    groups
}

pub(crate) fn union_groups<Q: RangeQuery + ?Sized>(
    points: &PointSet,
    query: &Q,
    linking: &Linking,
) -> Vec<Vec<usize>> {
    let n = points.len();
    let mut uf = UnionFind::new(n);
    let mut neighbors: Vec<usize> = Vec::new();

    for j in 0..n {
        neighbors.clear();
        query.range_query_into(points.point(j), linking, &mut neighbors);
        // The relation is symmetric: each pair only needs merging once.
        for &k in neighbors.iter().filter(|&&k| k > j) {
            uf.union(j, k);
        }
    }
    uf.into_groups()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::BruteScan;

    fn chain_and_singleton() -> PointSet {
        PointSet::from_rows(&[[0.0], [5.0], [0.5], [1.0], [1.5]]).unwrap()
    }

    #[test]
    fn test_expand_groups_follows_chains() {
        let points = chain_and_singleton();
        let scan = BruteScan::new(&points);
        let mut groups = expand_groups(&points, &scan, &Linking::inclusive(0.5));
        for g in &mut groups {
            g.sort_unstable();
        }
        assert_eq!(groups, vec![vec![0, 2, 3, 4], vec![1]]);
    }

    #[test]
    fn test_union_groups_matches_expand() {
        let points = chain_and_singleton();
        let scan = BruteScan::new(&points);
        let linking = Linking::inclusive(0.5);
        let mut expanded = expand_groups(&points, &scan, &linking);
        for g in &mut expanded {
            g.sort_unstable();
        }
        assert_eq!(union_groups(&points, &scan, &linking), expanded);
    }

    #[test]
    fn test_seed_order_ascending() {
        let points = PointSet::from_rows(&[[3.0], [2.0], [1.0]]).unwrap();
        let scan = BruteScan::new(&points);
        let groups = expand_groups(&points, &scan, &Linking::inclusive(0.1));
        assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_empty() {
        let points = PointSet::default();
        let scan = BruteScan::new(&points);
        assert!(expand_groups(&points, &scan, &Linking::inclusive(1.0)).is_empty());
        assert!(union_groups(&points, &scan, &Linking::inclusive(1.0)).is_empty());
    }
}
