//! Result marshaling.

/// A partition of point indices `0..n_points` into friends-of-friends groups.
///
/// Neither the order of groups nor the order of indices inside a group is
/// meaningful; use [`canonical`](Self::canonical) to compare partitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Groups {
    groups: Vec<Vec<usize>>,
    n_points: usize,
}

impl Groups {
    pub(crate) fn new(groups: Vec<Vec<usize>>, n_points: usize) -> Self {
        debug_assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), n_points);
        Self { groups, n_points }
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups (only for an empty point set).
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of points partitioned.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Iterate over groups.
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<usize>> {
        self.groups.iter()
    }

    /// Groups as a slice.
    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Size of each group, in group order.
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// The largest group (first one on ties).
    pub fn largest(&self) -> Option<&[usize]> {
        self.groups
            .iter()
            .reduce(|best, g| if g.len() > best.len() { g } else { best })
            .map(Vec::as_slice)
    }

    /// Group id of every point: `labels()[i]` is the position of point `i`'s group.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.n_points];
        for (id, group) in self.groups.iter().enumerate() {
            for &i in group {
                labels[i] = id;
            }
        }
        labels
    }

    /// Each group sorted ascending, groups sorted lexicographically.
    pub fn canonical(&self) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = self
            .groups
            .iter()
            .map(|g| {
                let mut g = g.clone();
                g.sort_unstable();
                g
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Whether every index in `0..n_points` appears in exactly one group.
    pub fn is_partition(&self) -> bool {
        let mut seen = vec![false; self.n_points];
        for &i in self.groups.iter().flatten() {
            if i >= self.n_points || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        seen.into_iter().all(|s| s)
    }

    /// Unwrap into plain nested vectors.
    pub fn into_vec(self) -> Vec<Vec<usize>> {
        self.groups
    }
}

impl From<Groups> for Vec<Vec<usize>> {
    fn from(groups: Groups) -> Self {
        groups.into_vec()
    }
}

impl IntoIterator for Groups {
    type Item = Vec<usize>;
    type IntoIter = std::vec::IntoIter<Vec<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a Groups {
    type Item = &'a Vec<usize>;
    type IntoIter = std::slice::Iter<'a, Vec<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
