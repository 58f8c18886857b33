//! Euclidean distance and the link predicate shared by every engine.
//!
//! Both neighbor sources (the R-tree and the brute-force scan) decide whether
//! two points are linked through [`Linking::links`]. Keeping a single predicate
//! is what makes the engines agree on points sitting exactly at the linking
//! length.

/// Squared Euclidean distance between two points of equal dimension.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance between two points of equal dimension.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// How a pair at exactly the linking length is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threshold {
    /// `distance <= linking_length` links.
    #[default]
    Inclusive,
    /// `distance < linking_length` links.
    Exclusive,
}

/// A validated linking length together with its boundary convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linking {
    length: f64,
    threshold: Threshold,
}

impl Linking {
    /// Create a link predicate.
    ///
    /// A negative or NaN `length` links nothing; [`FriendsOfFriends`] rejects
    /// such values before building one.
    ///
    /// [`FriendsOfFriends`]: crate::cluster::FriendsOfFriends
    pub fn new(length: f64, threshold: Threshold) -> Self {
        Self { length, threshold }
    }

    /// Inclusive predicate for `length`.
    pub fn inclusive(length: f64) -> Self {
        Self::new(length, Threshold::Inclusive)
    }

    /// The linking length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The boundary convention.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Whether a pair `distance` apart is linked.
    #[inline]
    pub fn within(&self, distance: f64) -> bool {
        match self.threshold {
            Threshold::Inclusive => distance <= self.length,
            Threshold::Exclusive => distance < self.length,
        }
    }

    /// Whether points `a` and `b` are linked.
    #[inline]
    pub fn links(&self, a: &[f64], b: &[f64]) -> bool {
        self.within(euclidean(a, b))
    }
}
