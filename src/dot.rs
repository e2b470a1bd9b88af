//! GraphViz rendering for e-graphs.
//!
//! [`Dot`] implements [`Display`], so formatting it (or writing it straight
//! to a file) yields a `.dot` document: one dashed box per class, one record
//! per term, and every operand slot wired to the class it references.
//!
//! ```
//! use eqsat::EGraph;
//!
//! let mut egraph = EGraph::default();
//! let zero = egraph.add_term("0");
//! egraph.add_op("+", [zero, zero]);
//!
//! let rendered = egraph.dot().to_string();
//! assert!(rendered.contains("subgraph cluster_"));
//! ```

use std::fmt::{self, Display, Formatter, Write as _};

use crate::{egraph::EGraph, term::Term};

/// A [`Display`] wrapper that renders an [`EGraph`] as a GraphViz document.
pub struct Dot<'a> {
    egraph: &'a EGraph,
}

impl<'a> Dot<'a> {
    pub fn new(egraph: &'a EGraph) -> Dot<'_> {
        Dot { egraph }
    }
}

impl<'a> Display for Dot<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph egraph {{")?;
        // lhead only clips edges to clusters when compound is on
        writeln!(f, "  compound=true")?;
        writeln!(f, "  node [shape=record]")?;

        for class in self.egraph.classes() {
            writeln!(f, "  subgraph cluster_{} {{", class.id)?;
            writeln!(f, "    style=dashed")?;
            writeln!(f, "    label=\"{}\"", class.id)?;
            for (row, term) in class.iter().enumerate() {
                writeln!(
                    f,
                    "    n{}_{} [label=\"{}\"]",
                    class.id,
                    row,
                    record_label(term)
                )?;
            }
            writeln!(f, "  }}")?;
        }

        for class in self.egraph.classes() {
            for (row, term) in class.iter().enumerate() {
                for (slot, &child) in term.children.iter().enumerate() {
                    let target = self.egraph.find(child);
                    writeln!(
                        f,
                        "  n{}_{}:s{} -> n{}_0 [lhead=cluster_{}]",
                        class.id, row, slot, target, target
                    )?;
                }
            }
        }

        write!(f, "}}")
    }
}

/// Lays a term out as a record: the operator first, then one named port per
/// operand, so each child edge leaves from the argument position it belongs
/// to. Atoms are a record of one plain field.
fn record_label(term: &Term) -> String {
    let mut label = escape(term.name.as_str());
    for slot in 0..term.children.len() {
        let _ = write!(label, "|<s{}> #{}", slot, slot);
    }
    label
}

/// Operator names may use characters that are structural in record labels.
fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if matches!(ch, '"' | '\\' | '|' | '{' | '}' | '<' | '>') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
