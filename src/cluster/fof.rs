//! Friends-of-friends (FoF) clustering.
//!
//! # The Algorithm
//!
//! Two points are *friends* when they are at most the linking length `ℓ` apart.
//! A group is a maximal set of points connected by chains of friends: the
//! connected components of the graph whose edges are the friend pairs. Unlike
//! DBSCAN there is no density threshold and no noise; an isolated point is a
//! group of one.
//!
//! Historically this is the standard halo finder for N-body simulations
//! (Davis et al., 1985), usually with `ℓ` set to a fraction (≈ 0.2) of the
//! mean interparticle separation.
//!
//! ## Engines
//!
//! - [`Engine::Indexed`]: bulk-load an [`RTree`] and answer each neighbor query
//!   in `O(log N + k)`. Expected `O(N log N)` overall.
//! - [`Engine::Brute`]: check every point for every query. `O(N²)`, no setup.
//!
//! Both share one link predicate, so they return the same partition for the
//! same input, including pairs sitting exactly at `ℓ`.
//!
//! ## Boundary
//!
//! By default a pair at exactly `ℓ` is linked ([`Threshold::Inclusive`]).
//! [`Threshold::Exclusive`] reproduces the strict `d < ℓ` convention some halo
//! finders use.

use std::time::Instant;

use tracing::{debug, info_span};

use super::brute::BruteScan;
use super::frontier::{expand_groups, union_groups};
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::groups::Groups;
use crate::index::{RTree, RangeQuery, DEFAULT_NODE_CAPACITY};
use crate::metric::{Linking, Threshold};
use crate::points::PointSet;

/// Neighbor discovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// R-tree range queries.
    #[default]
    Indexed,
    /// All-pairs distance checks.
    Brute,
}

/// How linked pairs are assembled into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assembly {
    /// Grow each group from a seed with an explicit frontier.
    #[default]
    Frontier,
    /// Merge linked pairs in a disjoint-set forest, then flatten.
    UnionFind,
}

/// Friends-of-friends clustering.
#[derive(Debug, Clone)]
pub struct FriendsOfFriends {
    /// Maximum distance at which two points are directly linked.
    linking_length: f64,
    engine: Engine,
    threshold: Threshold,
    assembly: Assembly,
    /// R-tree fan-out (only used by [`Engine::Indexed`]).
    node_capacity: usize,
}

impl FriendsOfFriends {
    /// Create a new clusterer with linking length `linking_length`.
    ///
    /// Defaults: indexed engine, inclusive threshold, frontier assembly, node
    /// capacity [`DEFAULT_NODE_CAPACITY`].
    pub fn new(linking_length: f64) -> Self {
        Self {
            linking_length,
            engine: Engine::default(),
            threshold: Threshold::default(),
            assembly: Assembly::default(),
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    /// Set the linking length.
    pub fn with_linking_length(mut self, linking_length: f64) -> Self {
        self.linking_length = linking_length;
        self
    }

    /// Select the neighbor discovery engine.
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Shorthand for `with_engine(Engine::Brute)` when `use_brute` is true.
    pub fn with_brute(self, use_brute: bool) -> Self {
        self.with_engine(if use_brute {
            Engine::Brute
        } else {
            Engine::Indexed
        })
    }

    /// Set how pairs at exactly the linking length are treated.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Select the group assembly strategy.
    pub fn with_assembly(mut self, assembly: Assembly) -> Self {
        self.assembly = assembly;
        self
    }

    /// Set the R-tree node capacity (must be at least 2).
    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    /// The configured linking length.
    pub fn linking_length(&self) -> f64 {
        self.linking_length
    }

    /// The configured engine.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    fn linking(&self) -> Result<Linking> {
        if self.linking_length.is_nan() || self.linking_length < 0.0 {
            return Err(Error::InvalidParameter {
                name: "linking_length",
                message: "must be non-negative",
            });
        }
        Ok(Linking::new(self.linking_length, self.threshold))
    }

    /// Partition `points` into friends-of-friends groups.
    pub fn fit(&self, points: &PointSet) -> Result<Groups> {
        let linking = self.linking()?;
        let n = points.len();
        if n == 0 {
            return Ok(Groups::default());
        }

        let span = info_span!(
            "friends_of_friends",
            n,
            dim = points.dim(),
            linking_length = linking.length(),
            threshold = ?linking.threshold(),
            engine = ?self.engine,
        );
        let _guard = span.enter();

        let groups = match self.engine {
            Engine::Indexed => {
                let start = Instant::now();
                let tree = RTree::bulk_load_with_capacity(points, self.node_capacity)?;
                debug!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    height = tree.height(),
                    node_capacity = tree.node_capacity(),
                    "built R-tree"
                );
                self.assemble(points, &tree, &linking)
            }
            Engine::Brute => self.assemble(points, &BruteScan::new(points), &linking),
        };
        Ok(Groups::new(groups, n))
    }

    fn assemble<Q: RangeQuery>(
        &self,
        points: &PointSet,
        query: &Q,
        linking: &Linking,
    ) -> Vec<Vec<usize>> {
        let start = Instant::now();
        let groups = match self.assembly {
            Assembly::Frontier => expand_groups(points, query, linking),
            Assembly::UnionFind => union_groups(points, query, linking),
        };
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            groups = groups.len(),
            assembly = ?self.assembly,
            "built groups"
        );
        groups
    }
}

impl Clustering for FriendsOfFriends {
    fn fit_groups(&self, points: &PointSet) -> Result<Groups> {
        self.fit(points)
    }
}
