use log::*;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{
    egraph::EGraph,
    term::Term,
    util::{HashSet, Symbol},
    Id,
};

/// A pattern over terms.
///
/// A wildcard stands for any class; an occurrence of the same wildcard
/// elsewhere in the pattern must resolve to the same class, compared
/// through [`EGraph::find`]. A pattern term matches any class containing a
/// term with the same name whose children match the argument patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Wildcard(Symbol),
    Term(Symbol, Vec<Pattern>),
}

impl Pattern {
    pub fn wildcard(name: impl Into<Symbol>) -> Self {
        Pattern::Wildcard(name.into())
    }

    pub fn term(name: impl Into<Symbol>, args: Vec<Pattern>) -> Self {
        Pattern::Term(name.into(), args)
    }

    /// An argument-less pattern term, matching an atom by name.
    pub fn atom(name: impl Into<Symbol>) -> Self {
        Pattern::Term(name.into(), vec![])
    }

    fn insert_wildcards(&self, set: &mut HashSet<Symbol>) {
        match self {
            Pattern::Wildcard(v) => {
                set.insert(*v);
            }
            Pattern::Term(_, args) => {
                for arg in args {
                    arg.insert_wildcards(set);
                }
            }
        }
    }

    fn is_bound(&self, set: &HashSet<Symbol>) -> bool {
        match self {
            Pattern::Wildcard(v) => set.contains(v),
            Pattern::Term(_, args) => args.iter().all(|arg| arg.is_bound(set)),
        }
    }
}

/// A substitution mapping pattern variables to canonical class [`Id`]s.
///
/// Substitutions are value types: the matcher clones instead of sharing, so
/// bindings from one alternative never leak into another.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Subst {
    vec: SmallVec<[(Symbol, Id); 3]>,
}

impl Subst {
    /// Binds `var` to `id`, returning the binding this replaces, if any.
    pub fn insert(&mut self, var: Symbol, id: Id) -> Option<Id> {
        match self.vec.iter_mut().find(|pair| pair.0 == var) {
            Some(pair) => Some(std::mem::replace(&mut pair.1, id)),
            None => {
                self.vec.push((var, id));
                None
            }
        }
    }

    /// Looks up the class bound to `var`.
    pub fn get(&self, var: Symbol) -> Option<Id> {
        let pair = self.vec.iter().find(|pair| pair.0 == var)?;
        Some(pair.1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Id)> + '_ {
        self.vec.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
}

impl Pattern {
    /// E-matching of this pattern against one class.
    ///
    /// Returns every consistent extension of `subst`; an empty vector means
    /// the class does not match. A wildcard that is already bound only
    /// matches the class it was bound to; a fresh wildcard binds to the
    /// canonical id of the candidate class. A pattern term is tried against
    /// every equally-named term of the class, and the argument sub-matches
    /// are combined with a Cartesian product, dropping combinations that
    /// disagree on a shared wildcard.
    pub fn matches(&self, egraph: &EGraph, class: Id, subst: &Subst) -> Vec<Subst> {
        match self {
            Pattern::Wildcard(var) => match subst.get(*var) {
                Some(bound) => {
                    if egraph.find(bound) == egraph.find(class) {
                        vec![subst.clone()]
                    } else {
                        vec![]
                    }
                }
                None => {
                    let mut extended = subst.clone();
                    extended.insert(*var, egraph.find(class));
                    vec![extended]
                }
            },
            Pattern::Term(name, args) => {
                let root = egraph.find(class);
                let mut out = Vec::new();
                for node in egraph[root].iter() {
                    if node.name != *name || node.children.len() != args.len() {
                        continue;
                    }
                    if args.is_empty() {
                        out.push(subst.clone());
                        continue;
                    }

                    let arg_matches: Vec<Vec<Subst>> = args
                        .iter()
                        .zip(&node.children)
                        .map(|(arg, &child)| arg.matches(egraph, child, subst))
                        .collect();

                    'combos: for combo in arg_matches.iter().multi_cartesian_product() {
                        let mut merged = combo[0].clone();
                        for sub in &combo[1..] {
                            for (var, id) in sub.iter() {
                                match merged.get(var) {
                                    Some(old) if egraph.find(old) != egraph.find(id) => {
                                        continue 'combos;
                                    }
                                    Some(_) => {}
                                    None => {
                                        merged.insert(var, id);
                                    }
                                }
                            }
                        }
                        out.push(merged);
                    }
                }
                out
            }
        }
    }

    /// Runs [`matches`](Pattern::matches) against every class, returning
    /// the classes that matched along with their substitutions.
    pub fn search(&self, egraph: &EGraph) -> Vec<(Id, Vec<Subst>)> {
        egraph
            .classes()
            .filter_map(|class| {
                let substs = self.matches(egraph, class.id, &Subst::default());
                if substs.is_empty() {
                    None
                } else {
                    Some((class.id, substs))
                }
            })
            .collect()
    }

    /// Materializes this pattern under `subst`, returning its class id.
    ///
    /// Adding is hash-consing, so instantiating over existing terms is free
    /// and pins down the class they already live in.
    ///
    /// Panics if the pattern uses a variable `subst` does not bind.
    pub fn instantiate(&self, egraph: &mut EGraph, subst: &Subst) -> Id {
        match self {
            Pattern::Wildcard(var) => subst
                .get(*var)
                .unwrap_or_else(|| panic!("pattern variable ${} is not bound", var)),
            Pattern::Term(name, args) => {
                let children: Vec<Id> = args
                    .iter()
                    .map(|arg| arg.instantiate(egraph, subst))
                    .collect();
                egraph.add(Term::op(*name, children))
            }
        }
    }
}

/// An equational rewrite rule: wherever `lhs` matches, the instantiated
/// `rhs` is asserted equal to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub name: String,
    pub lhs: Pattern,
    pub rhs: Pattern,
}

impl RewriteRule {
    /// Panics if the right-hand side uses a wildcard the left-hand side
    /// does not bind.
    pub fn new(name: impl Into<String>, lhs: Pattern, rhs: Pattern) -> Self {
        let name = name.into();
        let mut bound = HashSet::default();
        lhs.insert_wildcards(&mut bound);
        assert!(
            rhs.is_bound(&bound),
            "rewrite '{}': right-hand side uses unbound wildcards",
            name
        );
        RewriteRule { name, lhs, rhs }
    }
}

impl EGraph {
    /// Applies `rule` across the whole graph, then rebuilds.
    ///
    /// Runs in two phases so that matching never observes its own effects:
    /// first every match over a snapshot of the current classes is
    /// collected and both rule sides are instantiated, then all recorded
    /// pairs are united. Returns the number of classes merged by the
    /// application itself; callers loop until the class count and cache
    /// size stop changing to reach saturation.
    pub fn rewrite(&mut self, rule: &RewriteRule) -> usize {
        debug!("running rewrite '{}'", rule.name);

        let class_ids: Vec<Id> = self.classes.keys().copied().collect();
        let mut to_unite = Vec::new();
        for id in class_ids {
            let substs = rule.lhs.matches(self, id, &Subst::default());
            for subst in &substs {
                let lhs_id = rule.lhs.instantiate(self, subst);
                let rhs_id = rule.rhs.instantiate(self, subst);
                to_unite.push((lhs_id, rhs_id));
            }
        }
        debug!("rewrite '{}' found {} matches", rule.name, to_unite.len());

        let mut n_unions = 0;
        for (a, b) in to_unite {
            if self.unite(a, b) {
                n_unions += 1;
            }
        }
        debug!("rewrite '{}' performed {} unions", rule.name, n_unions);

        self.rebuild();
        n_unions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_match() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut egraph = EGraph::default();

        let x = egraph.add_term("x");
        let y = egraph.add_term("y");
        let plus = egraph.add_op("+", [x, y]);

        let z = egraph.add_term("z");
        let w = egraph.add_term("w");
        let plus2 = egraph.add_op("+", [z, w]);

        egraph.unite(plus, plus2);
        egraph.rebuild();

        let a = Symbol::from("a");
        let b = Symbol::from("b");
        let commute = Pattern::term(
            "+",
            vec![Pattern::Wildcard(a), Pattern::Wildcard(b)],
        );

        let matches = commute.search(&egraph);
        assert_eq!(matches.len(), 1);

        let (matched_class, substs) = &matches[0];
        assert_eq!(egraph.find(*matched_class), egraph.find(plus));
        assert_eq!(substs.len(), 2);

        let mut bindings: Vec<(Id, Id)> = substs
            .iter()
            .map(|s| (s.get(a).unwrap(), s.get(b).unwrap()))
            .collect();
        bindings.sort();
        let mut expected = vec![(x, y), (z, w)];
        expected.sort();
        assert_eq!(bindings, expected);
    }

    #[test]
    fn bound_wildcard_must_agree() {
        let mut egraph = EGraph::default();

        let a = egraph.add_term("a");
        let b = egraph.add_term("b");
        let aa = egraph.add_op("+", [a, a]);
        let ab = egraph.add_op("+", [a, b]);
        egraph.rebuild();

        let x = Symbol::from("x");
        let doubled = Pattern::term("+", vec![Pattern::Wildcard(x), Pattern::Wildcard(x)]);

        assert_eq!(doubled.matches(&egraph, aa, &Subst::default()).len(), 1);
        assert_eq!(doubled.matches(&egraph, ab, &Subst::default()).len(), 0);
    }

    #[test]
    fn atoms_match_by_name() {
        let mut egraph = EGraph::default();

        let one = egraph.add_term("1");
        let x = egraph.add_term("x");
        let prod = egraph.add_op("*", [x, one]);
        egraph.rebuild();

        let identity = Pattern::term(
            "*",
            vec![Pattern::wildcard("a"), Pattern::atom("1")],
        );
        assert_eq!(identity.matches(&egraph, prod, &Subst::default()).len(), 1);
        assert_eq!(identity.matches(&egraph, one, &Subst::default()).len(), 0);
    }

    #[test]
    #[should_panic(expected = "is not bound")]
    fn instantiating_unbound_wildcard_panics() {
        let mut egraph = EGraph::default();
        Pattern::wildcard("x").instantiate(&mut egraph, &Subst::default());
    }
}
