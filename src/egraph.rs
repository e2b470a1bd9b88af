use log::*;

use crate::{
    dot::Dot,
    eclass::EClass,
    term::Term,
    unionfind::UnionFind,
    util::{HashMap, IndexMap, Symbol},
    Id,
};

/// Data structure to keep track of equalities between terms.
///
/// Terms are hash-consed: the `memo` cache maps each distinct term to the
/// leaf id it was first added under, so re-adding a known term is free and
/// returns the same id. Merging two classes with [`unite`](EGraph::unite)
/// can make previously distinct terms congruent; the affected parent terms
/// are queued on a worklist and [`rebuild`](EGraph::rebuild) drains it,
/// re-canonicalizing children and collapsing the classes of terms that have
/// become equal.
///
/// Batches of `unite` calls must be followed by `rebuild` before any
/// `find`-based equality query; a dirty graph may report false inequality.
#[derive(Debug, Clone, Default)]
pub struct EGraph {
    pub(crate) unionfind: UnionFind,
    /// Every term ever added, indexed by its leaf id. The entry for a leaf
    /// id always equals the cache's current key for it, which is what lets
    /// the rebuild re-key terms without hunting for their old slots.
    pub(crate) nodes: Vec<Term>,
    pub(crate) memo: HashMap<Term, Id>,
    pub(crate) classes: IndexMap<Id, EClass>,
    /// Leaf ids whose terms may hold stale children, drained by rebuild.
    pub(crate) pending: Vec<Id>,
}

impl EGraph {
    /// Returns an iterator over the live classes in the graph.
    pub fn classes(&self) -> impl ExactSizeIterator<Item = &EClass> {
        self.classes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of distinct terms in the graph.
    ///
    /// Actually returns the size of the hash-cons cache.
    pub fn total_size(&self) -> usize {
        self.memo.len()
    }

    pub fn number_of_classes(&self) -> usize {
        self.classes.len()
    }

    /// Canonicalizes a class id: the result names the live class currently
    /// containing `id`. Leaf ids stay valid forever, so this works for ids
    /// obtained arbitrarily many merges ago.
    pub fn find(&self, id: Id) -> Id {
        self.unionfind.find(id)
    }

    pub(crate) fn find_mut(&mut self, id: Id) -> Id {
        self.unionfind.find_mut(id)
    }

    /// Returns `true` when all congruences implied by past merges have been
    /// restored, i.e. the worklist is empty.
    pub fn is_clean(&self) -> bool {
        self.pending.is_empty()
    }

    /// Adds an atom like `x` or `0`.
    pub fn add_term(&mut self, name: impl Into<Symbol>) -> Id {
        self.add(Term::leaf(name))
    }

    /// Adds an operation over existing classes.
    ///
    /// Panics if any child id does not resolve to a live class.
    pub fn add_op(&mut self, name: impl Into<Symbol>, children: impl IntoIterator<Item = Id>) -> Id {
        self.add(Term::op(name, children))
    }

    /// Hash-consing insertion: adding a term that is structurally already
    /// present returns its existing leaf id without touching the graph.
    /// Otherwise a fresh singleton class is allocated and the term is
    /// registered as a parent of each of its child classes.
    pub fn add(&mut self, term: Term) -> Id {
        if let Some(&existing) = self.memo.get(&term) {
            trace!("adding *{:4}: {}", existing, term);
            return existing;
        }

        let id = self.unionfind.make_set();
        debug_assert_eq!(usize::from(id), self.nodes.len());
        trace!("adding  {:4}: {}", id, term);

        for &child in &term.children {
            let child = self.unionfind.find_mut(child);
            let child_class = self
                .classes
                .get_mut(&child)
                .unwrap_or_else(|| panic!("invalid child class {}", child));
            child_class.add_parent(id);
        }

        self.nodes.push(term.clone());
        self.classes.insert(id, EClass::new(id, term.clone()));
        self.pending.push(id);
        self.memo.insert(term, id);
        id
    }

    /// Asserts that two classes are equal, merging them.
    ///
    /// Returns `false` if they were already the same class. The caller must
    /// eventually [`rebuild`](EGraph::rebuild) to restore congruence.
    pub fn unite(&mut self, a: Id, b: Id) -> bool {
        let mut root1 = self.find_mut(a);
        let mut root2 = self.find_mut(b);
        if root1 == root2 {
            return false;
        }

        // make sure the keeper has more parents
        let parents1 = self.classes[&root1].parents.len();
        let parents2 = self.classes[&root2].parents.len();
        if parents1 < parents2 {
            std::mem::swap(&mut root1, &mut root2);
        }

        trace!("uniting {} <- {}", root1, root2);
        self.unionfind.union(root1, root2);

        let absorbed = self.classes.swap_remove(&root2).unwrap();
        self.pending.extend_from_slice(&absorbed.parents);

        let keeper = self.classes.get_mut(&root1).unwrap();
        debug_assert_eq!(keeper.id, root1);
        keeper.absorb(absorbed);
        true
    }

    /// Restores the congruence and canonicalization invariants after a
    /// batch of merges.
    ///
    /// Phase one drains the worklist: each queued term is removed from the
    /// cache, its children are canonicalized, and it is re-inserted; a
    /// collision means two terms have become congruent and their classes
    /// are united, which may queue more work. Every such union removes a
    /// live class, so the drain terminates. Phase two canonicalizes and
    /// deduplicates the term and parent lists of every surviving class.
    pub fn rebuild(&mut self) {
        if self.pending.is_empty() {
            debug!("skipping rebuild, nothing pending");
            return;
        }

        let old_cache_size = self.memo.len();
        let old_n_classes = self.classes.len();
        let mut n_unions = 0;

        while let Some(leaf_id) = self.pending.pop() {
            // the arena holds exactly the key this term is cached under
            let mut term = self.nodes[usize::from(leaf_id)].clone();
            self.memo.remove(&term);
            term.update_children(|id| self.unionfind.find_mut(id));
            self.nodes[usize::from(leaf_id)] = term.clone();

            let congruent = self.memo.get(&term).copied();
            self.memo.insert(term, leaf_id);
            if let Some(other_id) = congruent {
                if self.unite(other_id, leaf_id) {
                    n_unions += 1;
                }
            }
        }

        for class in self.classes.values_mut() {
            class.canonicalize(&self.unionfind);
        }

        info!(
            "rebuilt: classes {} -> {}, cache {} -> {}, congruence unions {}",
            old_n_classes,
            self.classes.len(),
            old_cache_size,
            self.memo.len(),
            n_unions,
        );
    }

    /// Creates a [`Dot`] for visualizing this graph with GraphViz.
    pub fn dot(&self) -> Dot<'_> {
        Dot::new(self)
    }
}

impl std::ops::Index<Id> for EGraph {
    type Output = EClass;
    fn index(&self, id: Id) -> &Self::Output {
        let id = self.find(id);
        self.classes
            .get(&id)
            .unwrap_or_else(|| panic!("invalid class id {}", id))
    }
}
