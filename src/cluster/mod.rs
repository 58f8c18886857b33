//! Friends-of-friends clustering engines.
//!
//! ## Hard partition, no noise
//!
//! Every point ends up in exactly one group. Points with no friend within the
//! linking length form singleton groups, so the output always covers `0..N`.
//!
//! ## Engines
//!
//! The engines differ only in how they find the points linked to a given
//! point:
//!
//! - [`RTree`](crate::index::RTree) range queries (default)
//! - [`BruteScan`], a linear scan over all points
//!
//! Group assembly is shared: either a frontier walk over an
//! `Unvisited -> Queued -> Assigned` state machine, or a disjoint-set forest
//! flattened at the end ([`Assembly`]).
//!
//! ## Usage
//!
//! ```rust
//! use fof::cluster::{Clustering, Engine, FriendsOfFriends};
//! use fof::PointSet;
//!
//! let points = PointSet::from_rows(&[
//!     [0.0, 0.0],
//!     [0.1, 0.1],
//!     [10.0, 10.0],
//!     [10.1, 10.1],
//! ])
//! .unwrap();
//!
//! let groups = FriendsOfFriends::new(0.5).fit(&points).unwrap();
//! assert_eq!(groups.canonical(), vec![vec![0, 1], vec![2, 3]]);
//!
//! // Same partition from the brute-force engine.
//! let labels = FriendsOfFriends::new(0.5)
//!     .with_engine(Engine::Brute)
//!     .fit_predict(&points)
//!     .unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod brute;
mod fof;
mod frontier;
mod traits;
mod util;

pub use brute::BruteScan;
pub use fof::{Assembly, Engine, FriendsOfFriends};
pub use traits::Clustering;
