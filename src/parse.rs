use pest::{iterators::Pair, Parser};

use crate::{
    egraph::EGraph,
    pattern::{Pattern, RewriteRule},
    term::Term,
    util::Symbol,
    Id,
};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct ExprParser;

/// Errors from the test-language parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed expression: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("wildcard ${0} is not allowed in a plain expression")]
    WildcardInExpression(Symbol),
}

fn build_pattern(pair: Pair<Rule>) -> Pattern {
    match pair.as_rule() {
        // the leading "$" is grammar, not part of the wildcard's name
        Rule::variable => Pattern::Wildcard(Symbol::from(&pair.as_str()[1..])),
        Rule::atom => Pattern::Term(Symbol::from(pair.as_str()), vec![]),
        Rule::expr => {
            let mut inner = pair.into_inner();
            let mut lhs = build_pattern(inner.next().unwrap());
            while let Some(op) = inner.next() {
                debug_assert_eq!(op.as_rule(), Rule::operation);
                let rhs = build_pattern(inner.next().unwrap());
                lhs = Pattern::Term(Symbol::from(op.as_str()), vec![lhs, rhs]);
            }
            lhs
        }
        rule => unreachable!("unexpected rule {:?}", rule),
    }
}

/// Parses a pattern like `$x * ($y + 1)`.
pub fn parse_pattern(input: &str) -> Result<Pattern, ParseError> {
    let mut pairs = ExprParser::parse(Rule::expr_input, input).map_err(Box::new)?;
    let expr = pairs.next().unwrap().into_inner().next().unwrap();
    Ok(build_pattern(expr))
}

/// Parses an expression like `(a + b) * c` and materializes it in `egraph`,
/// returning the class id of the root.
///
/// Wildcards are rejected: an expression must denote concrete terms.
pub fn parse_expr(egraph: &mut EGraph, input: &str) -> Result<Id, ParseError> {
    let pattern = parse_pattern(input)?;
    add_pattern(egraph, &pattern)
}

fn add_pattern(egraph: &mut EGraph, pattern: &Pattern) -> Result<Id, ParseError> {
    match pattern {
        Pattern::Wildcard(var) => Err(ParseError::WildcardInExpression(*var)),
        Pattern::Term(name, args) => {
            let children = args
                .iter()
                .map(|arg| add_pattern(egraph, arg))
                .collect::<Result<Vec<Id>, ParseError>>()?;
            Ok(egraph.add(Term::op(*name, children)))
        }
    }
}

/// Parses a rewrite rule like `$x * 0 => 0`.
///
/// Panics if the right-hand side uses a wildcard the left-hand side does
/// not bind; that is a malformed rule, not a recoverable parse failure.
pub fn parse_rule(input: &str) -> Result<RewriteRule, ParseError> {
    let mut pairs = ExprParser::parse(Rule::rule_input, input).map_err(Box::new)?;
    let rewrite = pairs.next().unwrap().into_inner().next().unwrap();
    let mut sides = rewrite.into_inner();
    let lhs = build_pattern(sides.next().unwrap());
    let rhs = build_pattern(sides.next().unwrap());
    Ok(RewriteRule::new(input.trim(), lhs, rhs))
}
