//! A portable binary form for e-graphs.
//!
//! The graph is projected onto plain data objects and encoded with
//! [`bincode`]. Term identity crosses the wire as leaf ids, never as
//! addresses: the term arena is listed in leaf-id order, and classes
//! reference their members and parents through those ids. The union-find
//! parent array round-trips exactly, so the restored graph answers every
//! `find` query like the original without re-canonicalizing anything.

use serde::{Deserialize, Serialize};

use crate::{
    eclass::EClass,
    egraph::EGraph,
    term::Term,
    unionfind::UnionFind,
    util::{HashMap, IndexMap, Symbol},
    Id,
};

/// Errors surfaced by [`to_bytes`] and [`from_bytes`].
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("binary encoding failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("binary decoding failed: {0}")]
    Decode(#[source] bincode::Error),
    #[error("serialized graph lists {terms} terms for {sets} union-find slots")]
    TermCountMismatch { terms: usize, sets: usize },
    #[error("serialized term id {0} is out of range")]
    TermOutOfRange(Id),
    #[error("serialized class {class} references unknown term {term}")]
    UnknownTerm { class: Id, term: Id },
}

#[derive(Debug, Serialize, Deserialize)]
struct TermData {
    leaf_id: Id,
    name: String,
    children: Vec<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassData {
    class_id: Id,
    term_ids: Vec<Id>,
    parent_ids: Vec<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphData {
    union_find: UnionFind,
    terms: Vec<TermData>,
    classes: Vec<ClassData>,
}

/// Encodes a quiescent graph.
///
/// The graph must be rebuilt first; a class member missing from the cache
/// means the congruence invariant is broken and is a fatal panic.
pub fn to_bytes(egraph: &EGraph) -> Result<Vec<u8>, SerializeError> {
    debug_assert!(egraph.is_clean(), "serializing a graph with pending work");

    let leaf_of = |term: &Term| -> Id {
        *egraph
            .memo
            .get(term)
            .unwrap_or_else(|| panic!("term {} is not in the cache", term))
    };

    let terms = egraph
        .nodes
        .iter()
        .enumerate()
        .map(|(leaf_id, term)| TermData {
            leaf_id: Id::from(leaf_id),
            name: term.name.as_str().to_owned(),
            children: term.children.to_vec(),
        })
        .collect();

    let classes = egraph
        .classes
        .values()
        .map(|class| ClassData {
            class_id: class.id,
            term_ids: class.nodes.iter().map(leaf_of).collect(),
            parent_ids: class.parents.clone(),
        })
        .collect();

    let data = GraphData {
        union_find: egraph.unionfind.clone(),
        terms,
        classes,
    };
    bincode::serialize(&data).map_err(SerializeError::Encode)
}

/// Decodes a graph previously produced by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<EGraph, SerializeError> {
    let data: GraphData = bincode::deserialize(bytes).map_err(SerializeError::Decode)?;

    if data.terms.len() != data.union_find.size() {
        return Err(SerializeError::TermCountMismatch {
            terms: data.terms.len(),
            sets: data.union_find.size(),
        });
    }

    let mut nodes = vec![Term::leaf(""); data.terms.len()];
    let mut memo: HashMap<Term, Id> = HashMap::default();
    for term_data in data.terms {
        let index = usize::from(term_data.leaf_id);
        if index >= nodes.len() {
            return Err(SerializeError::TermOutOfRange(term_data.leaf_id));
        }
        let term = Term::op(Symbol::from(term_data.name.as_str()), term_data.children);
        memo.insert(term.clone(), term_data.leaf_id);
        nodes[index] = term;
    }

    let mut classes: IndexMap<Id, EClass> = IndexMap::default();
    for class_data in data.classes {
        let lookup = |leaf_id: &Id| -> Result<Term, SerializeError> {
            nodes
                .get(usize::from(*leaf_id))
                .cloned()
                .ok_or(SerializeError::UnknownTerm {
                    class: class_data.class_id,
                    term: *leaf_id,
                })
        };

        let members = class_data
            .term_ids
            .iter()
            .map(lookup)
            .collect::<Result<Vec<Term>, SerializeError>>()?;

        for parent_id in &class_data.parent_ids {
            if usize::from(*parent_id) >= nodes.len() {
                return Err(SerializeError::UnknownTerm {
                    class: class_data.class_id,
                    term: *parent_id,
                });
            }
        }

        classes.insert(
            class_data.class_id,
            EClass {
                id: class_data.class_id,
                nodes: members,
                parents: class_data.parent_ids,
            },
        );
    }

    Ok(EGraph {
        unionfind: data.union_find,
        nodes,
        memo,
        classes,
        pending: Vec::new(),
    })
}
