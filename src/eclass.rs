use std::iter::ExactSizeIterator;

use crate::{
    term::Term,
    unionfind::UnionFind,
    util::{concat_vecs, HashSet},
    Id,
};

/// An equivalence class of [`Term`]s.
#[derive(Debug, Clone)]
pub struct EClass {
    /// This class's id.
    pub id: Id,
    /// The equivalent terms in this class.
    pub nodes: Vec<Term>,
    /// Leaf ids of the terms that reference this class as a child.
    /// Duplicates are tolerated here and removed on rebuild.
    pub(crate) parents: Vec<Id>,
}

impl EClass {
    pub(crate) fn new(id: Id, node: Term) -> Self {
        EClass {
            id,
            nodes: vec![node],
            parents: Vec::new(),
        }
    }

    /// Returns `true` if the class is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of terms in this class.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over the terms in this class.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Term> {
        self.nodes.iter()
    }

    pub(crate) fn add_parent(&mut self, leaf_id: Id) {
        self.parents.push(leaf_id);
    }

    /// Takes over all terms and parent back-edges of an absorbed class.
    pub(crate) fn absorb(&mut self, other: EClass) {
        assert_ne!(self.id, other.id);
        concat_vecs(&mut self.nodes, other.nodes);
        concat_vecs(&mut self.parents, other.parents);
    }

    /// Rewrites every member term to canonical children, then deduplicates
    /// the term and parent lists.
    pub(crate) fn canonicalize(&mut self, unionfind: &UnionFind) {
        let nodes: HashSet<Term> = self
            .nodes
            .drain(..)
            .map(|mut node| {
                node.canonicalize(unionfind);
                node
            })
            .collect();
        self.nodes.extend(nodes);

        self.parents.sort_unstable();
        self.parents.dedup();
    }
}
