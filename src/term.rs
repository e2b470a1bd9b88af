use std::fmt;

use smallvec::SmallVec;

use crate::{unionfind::UnionFind, util::Symbol, Id};

/// An e-node: an operator [`Symbol`] applied to zero or more child classes.
///
/// The key trick is that terms point at equivalence classes, not at other
/// terms, so a single child id stands for every equivalent operand at once.
/// Two terms are structurally equal iff their names match and their
/// children match element-wise; the e-graph keeps at most one term per
/// structure (see [`EGraph::add`](crate::EGraph::add)).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub name: Symbol,
    pub children: SmallVec<[Id; 2]>,
}

impl Term {
    /// A childless term: an atom like `x` or `0`.
    pub fn leaf(name: impl Into<Symbol>) -> Self {
        Term {
            name: name.into(),
            children: SmallVec::new(),
        }
    }

    /// An operation applied to existing classes.
    pub fn op(name: impl Into<Symbol>, children: impl IntoIterator<Item = Id>) -> Self {
        Term {
            name: name.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn update_children(&mut self, mut f: impl FnMut(Id) -> Id) {
        for id in &mut self.children {
            *id = f(*id);
        }
    }

    /// Rewrite every child id to its current root. Idempotent once the
    /// graph is quiescent.
    pub(crate) fn canonicalize(&mut self, unionfind: &UnionFind) {
        self.update_children(|id| unionfind.find(id));
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "({}", self.name)?;
            for id in &self.children {
                write!(f, " {}", id)?;
            }
            write!(f, ")")
        }
    }
}
