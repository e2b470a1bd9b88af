use crate::Id;

/// A disjoint-set forest over class [`Id`]s.
///
/// Only parent pointers are stored; the e-graph chooses the merge direction
/// itself (see [`EGraph::unite`](crate::EGraph::unite)), so there is no
/// rank or size tracking here.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UnionFind {
    parents: Vec<Id>,
}

impl UnionFind {
    /// Allocates a fresh singleton set, its own root.
    pub fn make_set(&mut self) -> Id {
        let id = Id::from(self.parents.len());
        self.parents.push(id);
        id
    }

    pub fn size(&self) -> usize {
        self.parents.len()
    }

    fn parent_of(&self, id: Id) -> Id {
        self.parents[usize::from(id)]
    }

    /// Walks parent pointers to the root of `id`'s set.
    pub fn find(&self, id: Id) -> Id {
        let mut current = id;
        let mut parent = self.parent_of(current);
        while current != parent {
            current = parent;
            parent = self.parent_of(current);
        }
        current
    }

    /// Like [`find`](UnionFind::find), but shortens the traversed path by
    /// halving: every visited id is repointed to its grandparent.
    pub fn find_mut(&mut self, id: Id) -> Id {
        let mut current = id;
        loop {
            let parent = self.parent_of(current);
            if current == parent {
                return current;
            }
            let grandparent = self.parent_of(parent);
            self.parents[usize::from(current)] = grandparent;
            current = grandparent;
        }
    }

    /// Hangs `root2`'s tree under `root1`. Both arguments must already be
    /// distinct roots.
    pub fn union(&mut self, root1: Id, root2: Id) -> Id {
        debug_assert!(self.find(root1) == root1 && self.find(root2) == root2);
        debug_assert_ne!(root1, root2);
        self.parents[usize::from(root2)] = root1;
        root1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<usize>) -> Vec<Id> {
        range.map(Id::from).collect()
    }

    #[test]
    fn union_find() {
        let n = 10usize;
        let id = Id::from;

        let mut uf = UnionFind::default();
        for _ in 0..n {
            uf.make_set();
        }

        // fresh sets are their own roots
        assert_eq!(uf.parents, ids(0..n));
        for i in ids(0..n) {
            assert_eq!(uf.find(i), i);
        }

        // two groups, always uniting into the lowest root
        uf.union(id(0), id(1));
        uf.union(id(0), id(2));
        uf.union(id(0), id(3));
        uf.union(id(6), id(7));
        uf.union(id(6), id(8));
        uf.union(id(6), id(9));

        // flatten every path, then check the raw forest
        for i in 0..n {
            uf.find_mut(id(i));
        }
        let expected: Vec<usize> = vec![0, 0, 0, 0, 4, 5, 6, 6, 6, 6];
        let expected = expected.into_iter().map(id).collect::<Vec<_>>();
        assert_eq!(uf.parents, expected);

        // roots are fixed points of find
        for i in 0..n {
            let root = uf.find(id(i));
            assert_eq!(uf.find(root), root);
        }
    }

    #[test]
    fn deep_chain_compresses() {
        let id = Id::from;
        let mut uf = UnionFind::default();
        for _ in 0..5 {
            uf.make_set();
        }

        // chain 0 <- 1 <- 2 <- 3 <- 4, uniting roots pairwise
        for i in (0..4usize).rev() {
            uf.union(id(i), id(i + 1));
        }

        assert_eq!(uf.find(id(4)), id(0));

        // halving repoints every traversed node to its grandparent
        assert_eq!(uf.find_mut(id(4)), id(0));
        assert_eq!(uf.parents[4], id(2));
        assert_eq!(uf.parents[2], id(0));
        assert_eq!(uf.find_mut(id(4)), id(0));
        assert_eq!(uf.parents[4], id(0));
    }
}
