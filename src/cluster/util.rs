#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    pub(crate) parent: Vec<usize>,
    pub(crate) size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        // Iterative: chains can be long before the first compression.
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        // Union by size.
        let (mut big, mut small) = (ra, rb);
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }

        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }

    /// Flatten into groups, ordered by their smallest member.
    pub(crate) fn into_groups(mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot = vec![usize::MAX; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            if slot[root] == usize::MAX {
                slot[root] = groups.len();
                groups.push(Vec::with_capacity(self.size[root]));
            }
            groups[slot[root]].push(i);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find_merges() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(4, 5);
        uf.union(1, 5);
        assert_eq!(uf.find(0), uf.find(4));
        assert_ne!(uf.find(0), uf.find(2));
        let root = uf.find(5);
        assert_eq!(uf.size[root], 4);

        let groups = uf.into_groups();
        assert_eq!(groups, vec![vec![0, 1, 4, 5], vec![2], vec![3]]);
    }

    #[test]
    fn test_union_idempotent() {
        let mut uf = UnionFind::new(3);
        let r = uf.union(0, 2);
        assert_eq!(uf.union(2, 0), r);
        assert_eq!(uf.size[r], 2);
    }

    #[test]
    fn test_long_chain() {
        let n = 100_000;
        let mut uf = UnionFind::new(n);
        for i in 1..n {
            uf.union(i - 1, i);
        }
        assert_eq!(uf.into_groups().len(), 1);
    }
}
