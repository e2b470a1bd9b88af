/*!

`eqsat` is a small e-graph library for equality saturation.

An [`EGraph`] compactly represents a large set of equivalent expressions:
terms are hash-consed into equivalence classes, and asserting one equality
can imply many more through congruence. Instead of destructively applying
rewrites, clients accumulate equalities with [`RewriteRule`]s and query the
graph afterwards with [`EGraph::find`].

```
use eqsat::{parse_expr, parse_rule, EGraph};

let mut egraph = EGraph::default();
let a = parse_expr(&mut egraph, "(x * 2) * 3").unwrap();
let b = parse_expr(&mut egraph, "x * (2 * 3)").unwrap();

let assoc = parse_rule("($a * $b) * $c => $a * ($b * $c)").unwrap();
egraph.rewrite(&assoc);

assert_eq!(egraph.find(a), egraph.find(b));
```

## Logging

Many parts of `eqsat` dump useful logging info using the
[`log`](https://docs.rs/log/) crate. The easiest way to see this info is to
use the [`env_logger`](https://docs.rs/env_logger/) crate in your binary or
test, and set the environment variable `RUST_LOG=eqsat=info` (or `debug` or
`trace` for more).

*/

mod dot;
mod eclass;
mod egraph;
mod parse;
mod pattern;
mod serialize;
mod term;
mod unionfind;
mod util;

/// A key to identify [`EClass`]es within an [`EGraph`].
///
/// An `Id` handed out by [`EGraph::add`] is a *leaf* id: it stays valid for
/// the lifetime of the graph, but after merges it may no longer name a live
/// class. [`EGraph::find`] maps any id to the *canonical* id of the class
/// currently containing it; always compare ids through `find`.
#[derive(Clone, Copy, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Id(u32);

impl From<usize> for Id {
    fn from(n: usize) -> Id {
        Id(n as u32)
    }
}

impl From<Id> for usize {
    fn from(id: Id) -> usize {
        id.0 as usize
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub use {
    dot::Dot,
    eclass::EClass,
    egraph::EGraph,
    parse::{parse_expr, parse_pattern, parse_rule, ParseError},
    pattern::{Pattern, RewriteRule, Subst},
    serialize::{from_bytes, to_bytes, SerializeError},
    term::Term,
    util::Symbol,
};
