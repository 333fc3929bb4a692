//! Longest-match of a grammar [`Expression`] against input bytes at a fixed
//! starting offset, per SPEC_FULL.md §4.2. This is the direct replacement
//! for the teacher's regex-backed `lexeme::Pattern`: instead of compiling a
//! regular expression, terminal productions are matched by walking their
//! own `Expression` tree.

use crate::grammar::{Expression, Grammar};
use std::collections::HashSet;

/// Returns the number of bytes of `input[start..]` that `expr` matches, or
/// `None` if it does not match at all. Always returns the *longest*
/// possible match for the given expression.
pub fn match_expression(grammar: &Grammar, expr: &Expression, input: &[u8], start: usize) -> Option<usize> {
    let mut visiting = HashSet::new();
    match_expression_inner(grammar, expr, input, start, &mut visiting)
}

/// `visiting` holds the names of productions currently being resolved via
/// `Name` dereference on the path from the outer call to here. A `Name`
/// that reappears while still on that path would re-enter with zero bytes
/// consumed — left (or mutual) recursion in a production that the lexer
/// mistakes for a self-contained terminal — so it is treated as a
/// non-match there rather than recursing forever.
fn match_expression_inner(
    grammar: &Grammar,
    expr: &Expression,
    input: &[u8],
    start: usize,
    visiting: &mut HashSet<String>,
) -> Option<usize> {
    match expr {
        Expression::TokenLiteral(s) => {
            let bytes = s.as_bytes();
            if input[start..].starts_with(bytes) {
                Some(bytes.len())
            } else {
                None
            }
        }
        Expression::Range(lo, hi) => {
            let b = *input.get(start)?;
            let lo = *lo as u32;
            let hi = *hi as u32;
            if lo <= 0x7f && hi <= 0x7f && (lo as u8..=hi as u8).contains(&b) {
                Some(1)
            } else {
                None
            }
        }
        Expression::Name(n) => {
            if !visiting.insert(n.clone()) {
                return None;
            }
            let production = grammar.get(n);
            let result = match production {
                Some(production) => match_expression_inner(grammar, &production.expr, input, start, visiting),
                None => None,
            };
            visiting.remove(n);
            result
        }
        Expression::Sequence(items) => {
            let mut total = 0usize;
            for item in items {
                let len = match_expression_inner(grammar, item, input, start + total, visiting)?;
                total += len;
            }
            Some(total)
        }
        Expression::Alternative(items) => {
            let mut best: Option<usize> = None;
            for item in items {
                if let Some(len) = match_expression_inner(grammar, item, input, start, visiting) {
                    let is_longer = match best {
                        Some(b) => len > b,
                        None => true,
                    };
                    if is_longer {
                        best = Some(len);
                    }
                }
            }
            best
        }
        Expression::Option(inner) => {
            Some(match_expression_inner(grammar, inner, input, start, visiting).unwrap_or(0))
        }
        Expression::Repetition(inner) => {
            let mut total = 0usize;
            loop {
                match match_expression_inner(grammar, inner, input, start + total, visiting) {
                    Some(0) | None => break,
                    Some(len) => total += len,
                }
            }
            Some(total)
        }
        Expression::Group(inner) => match_expression_inner(grammar, inner, input, start, visiting),
    }
}
