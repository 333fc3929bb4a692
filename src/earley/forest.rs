//! Builds a [`Node`] CST from an accepted [`Chart`], per SPEC_FULL.md
//! §4.3.7. Grounded directly on the reference Earley forest builder
//! (`other_examples/8a0fdaca_Hasenn-dokearley__src-forest.rs.rs`): like
//! that module's `from_chart`/`build_node`, this walks completed items
//! keyed by `(rule, alt, origin, end)` and recurses into their
//! right-hand-side symbols, using a `thiserror`-derived error enum for the
//! handful of ways a chart can fail to yield a tree.
//!
//! The one addition needed here that the reference lacks is synthetic
//! production splicing: `Option`/`Repetition`/nested-`Alternative` never
//! get their own node (SPEC_FULL.md's "Group is transparent" rule, extended
//! to every compound operator introduced by [`lower`](super::lower)) — their
//! matched children are spliced directly into the parent, and their empty
//! branch contributes nothing.

use super::item::Chart;
use super::lower::{is_synthetic, LoweredGrammar, Sym};
use super::cst::Node;
use crate::grammar::is_terminal_name;
use crate::lexer::Token;
use crate::position::{Position, Span};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForestError {
    #[error("no completed item for start production {0:?} spanning the whole input")]
    NoCompletedStartItem(String),

    #[error("chart invariant violated: no split point found for {rule:?} alt {alt} ending at {end}")]
    MissingSplit {
        rule: String,
        alt: usize,
        end: usize,
    },
}

fn is_complete(lowered: &LoweredGrammar, rule: &str, alt: usize, dot: usize) -> bool {
    dot >= lowered.rhs(rule, alt).len()
}

fn find_alt(chart: &Chart, lowered: &LoweredGrammar, name: &str, origin: usize, end: usize) -> Option<usize> {
    chart.set(end).items().iter().find_map(|item| {
        if &*item.rule == name
            && item.origin == origin
            && is_complete(lowered, &item.rule, item.alt, item.dot)
        {
            Some(item.alt)
        } else {
            None
        }
    })
}

fn position_at(tokens: &[Token], idx: usize) -> Position {
    if idx < tokens.len() {
        tokens[idx].position().clone()
    } else if let Some(last) = tokens.last() {
        last.span.end.clone()
    } else {
        Position::start(std::rc::Rc::from("<input>"))
    }
}

fn span_for(tokens: &[Token], origin: usize, end: usize) -> Span {
    Span::new(position_at(tokens, origin), position_at(tokens, end))
}

/// Build the CST rooted at `start`, given a chart already known to accept
/// (i.e. `start` completes with origin 0 at the final position).
pub fn build(
    chart: &Chart,
    lowered: &LoweredGrammar,
    tokens: &[Token],
    start: &str,
) -> Result<Node, ForestError> {
    let end = tokens.len();
    let alt = find_alt(chart, lowered, start, 0, end)
        .ok_or_else(|| ForestError::NoCompletedStartItem(start.to_string()))?;
    build_named(chart, lowered, tokens, start, alt, 0, end)
}

fn build_named(
    chart: &Chart,
    lowered: &LoweredGrammar,
    tokens: &[Token],
    name: &str,
    alt: usize,
    origin: usize,
    end: usize,
) -> Result<Node, ForestError> {
    let children = build_rhs_children(chart, lowered, tokens, name, alt, origin, end)?;
    Ok(Node::non_terminal(name, children, span_for(tokens, origin, end)))
}

/// The left-to-right list of CST children contributed by `(rule, alt)`
/// spanning `[origin, end)`: terminals become leaves, references to real
/// productions become child nodes, and references to synthetic productions
/// are spliced in transparently (recursing into their own right-hand
/// side), per SPEC_FULL.md's "Group is transparent" / "Option produces
/// either the matched subtree or nothing" / "Repetition produces a flat
/// list" rules.
fn build_rhs_children(
    chart: &Chart,
    lowered: &LoweredGrammar,
    tokens: &[Token],
    rule: &str,
    alt: usize,
    origin: usize,
    end: usize,
) -> Result<Vec<Node>, ForestError> {
    let rhs = lowered.rhs(rule, alt);
    if rhs.is_empty() {
        return Ok(Vec::new());
    }

    // Accumulated in reverse (we walk the right-hand side from its last
    // symbol back to its first); reversed once at the end.
    let mut reversed = Vec::new();
    let mut cur_end = end;

    for k in (0..rhs.len()).rev() {
        match &rhs[k] {
            Sym::Literal(_) | Sym::Range(_, _) => {
                let s = cur_end - 1;
                reversed.push(Node::terminal(tokens[s].clone()));
                cur_end = s;
            }
            // A reference to an uppercase lexer production is matched by
            // the engine's scan step, never predicted into, so no chart
            // item for `name` itself exists to search for — it behaves
            // exactly like a literal: one token, ending at `cur_end`.
            Sym::NonTerminal(name) if is_terminal_name(name) => {
                let s = cur_end - 1;
                reversed.push(Node::terminal(tokens[s].clone()));
                cur_end = s;
            }
            Sym::NonTerminal(name) => {
                let (s, sub_alt) = find_split(chart, lowered, rule, alt, k, origin, name, cur_end)
                    .ok_or_else(|| ForestError::MissingSplit {
                        rule: rule.to_string(),
                        alt,
                        end: cur_end,
                    })?;

                if is_synthetic(name) {
                    let spliced = build_rhs_children(chart, lowered, tokens, name, sub_alt, s, cur_end)?;
                    reversed.extend(spliced.into_iter().rev());
                } else {
                    reversed.push(build_named(chart, lowered, tokens, name, sub_alt, s, cur_end)?);
                }
                cur_end = s;
            }
        }
    }

    reversed.reverse();
    Ok(reversed)
}

/// Find where symbol `k` of `(rule, alt)` (itself known to hold originally
/// at `origin`) must have started, by locating a predecessor item
/// `(rule, alt, dot=k, origin)` in `chart[s]` together with a completed
/// `name` spanning `[s, end)`. Ties are broken by the smallest `s`, then by
/// `find_alt`'s first-found order — SPEC_FULL.md §4.3.7's determinism rule.
fn find_split(
    chart: &Chart,
    lowered: &LoweredGrammar,
    rule: &str,
    alt: usize,
    k: usize,
    origin: usize,
    name: &str,
    end: usize,
) -> Option<(usize, usize)> {
    use super::item::Item;
    let predecessor = Item::new(std::rc::Rc::from(rule), alt, k, origin);
    for s in origin..=end {
        if chart.set(s).contains(&predecessor) {
            if let Some(sub_alt) = find_alt(chart, lowered, name, s, end) {
                return Some((s, sub_alt));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earley::engine::recognize;
    use crate::earley::lower::lower;
    use crate::earley::trace::NullTracer;
    use crate::grammar::parser;

    fn run(grammar_src: &str, input: &str, start: &str) -> Node {
        let grammar = parser::parse("<test>", grammar_src.as_bytes()).unwrap().grammar;
        let lowered = lower(&grammar);
        let tokens: Vec<Token> = crate::lexer::Lexer::new(&grammar, input.as_bytes(), "<test>")
            .tokenize()
            .into_iter()
            .filter(|t| t.kind != "WhiteSpace" && t.kind != "EOF")
            .collect();
        let mut tracer = NullTracer;
        let chart = recognize(&grammar, &lowered, &tokens, start, &mut tracer).unwrap();
        build(&chart, &lowered, &tokens, start).unwrap()
    }

    #[test]
    fn repetition_is_flattened() {
        let node = run(r#"s = { "a" } ."#, "aaa", "s");
        assert_eq!(node.children().len(), 3);
        assert!(node.children().iter().all(|c| c.is_terminal() && c.text() == "a"));
    }

    #[test]
    fn zero_repetitions_yields_no_children() {
        let node = run(r#"s = { "a" } ."#, "", "s");
        assert!(node.children().is_empty());
    }

    #[test]
    fn option_elides_when_absent() {
        let node = run(r#"s = "x" [ "y" ] "z" ."#, "xz", "s");
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].text(), "x");
        assert_eq!(node.children()[1].text(), "z");
    }

    #[test]
    fn option_includes_when_present() {
        let node = run(r#"s = "x" [ "y" ] "z" ."#, "xyz", "s");
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children()[1].text(), "y");
    }

    #[test]
    fn s1_arithmetic_scenario() {
        let node = run(
            r#"
            expr   = term { ("+" | "-") term } .
            term   = factor { ("*" | "/") factor } .
            factor = Number | "(" expr ")" .
            Number = "0" … "9" { "0" … "9" } .
        "#,
            "1+2*3",
            "expr",
        );
        assert_eq!(node.kind, "expr");
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children()[1].text(), "+");
        assert_eq!(node.children()[0].kind, "term");
        assert_eq!(node.children()[2].kind, "term");
        assert_eq!(node.children()[2].children().len(), 3);
    }
}
