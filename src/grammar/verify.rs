//! Soundness checks for a loaded [`Grammar`](super::Grammar): every
//! referenced name must be defined (`UndefinedName`), every production must
//! be reachable from the start production if one is given (`Unreachable`),
//! and every production must be able to derive a finite terminal string
//! (`NonProductive`). When `start` is empty, only name resolution is
//! checked.

use super::{Expression, Grammar};
use crate::error::ValidateError;
use std::collections::{HashSet, VecDeque};

pub fn verify(grammar: &Grammar, start: &str) -> Result<(), Vec<ValidateError>> {
    let mut errors = Vec::new();

    errors.extend(check_undefined_names(grammar));
    if !errors.is_empty() {
        // Reachability/productivity over dangling references would just
        // produce noise; stop here.
        return Err(errors);
    }

    errors.extend(check_non_productive(grammar));

    if !start.is_empty() {
        errors.extend(check_reachable(grammar, start));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn for_each_name(expr: &Expression, f: &mut impl FnMut(&str)) {
    match expr {
        Expression::Name(n) => f(n),
        Expression::TokenLiteral(_) | Expression::Range(_, _) => {}
        Expression::Sequence(items) | Expression::Alternative(items) => {
            for e in items {
                for_each_name(e, f);
            }
        }
        Expression::Option(e) | Expression::Repetition(e) | Expression::Group(e) => {
            for_each_name(e, f)
        }
    }
}

fn check_undefined_names(grammar: &Grammar) -> Vec<ValidateError> {
    let mut errors = Vec::new();
    for production in grammar.iter() {
        for_each_name(&production.expr, &mut |name| {
            if !grammar.has(name) {
                errors.push(ValidateError::UndefinedName {
                    name: name.to_string(),
                    position: production.defined_at.clone(),
                });
            }
        });
    }
    errors
}

fn check_reachable(grammar: &Grammar, start: &str) -> Vec<ValidateError> {
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    if grammar.has(start) {
        reachable.insert(start);
        queue.push_back(start.to_string());
    }
    while let Some(name) = queue.pop_front() {
        let Some(production) = grammar.get(&name) else {
            continue;
        };
        for_each_name(&production.expr, &mut |referenced| {
            if reachable.insert(referenced) {
                queue.push_back(referenced.to_string());
            }
        });
    }

    grammar
        .iter()
        .filter(|p| !reachable.contains(p.name.as_str()))
        .map(|p| ValidateError::Unreachable {
            name: p.name.clone(),
        })
        .collect()
}

/// Whether `expr` can derive a finite terminal string, given the current
/// fixpoint approximation of which production names are already known to
/// be productive.
fn is_productive(expr: &Expression, known: &HashSet<&str>) -> bool {
    match expr {
        Expression::TokenLiteral(_) | Expression::Range(_, _) => true,
        // Option/Repetition can always choose the empty derivation.
        Expression::Option(_) | Expression::Repetition(_) => true,
        Expression::Group(e) => is_productive(e, known),
        Expression::Name(n) => known.contains(n.as_str()),
        Expression::Sequence(items) => items.iter().all(|e| is_productive(e, known)),
        Expression::Alternative(items) => items.iter().any(|e| is_productive(e, known)),
    }
}

fn check_non_productive(grammar: &Grammar) -> Vec<ValidateError> {
    let mut known: HashSet<&str> = HashSet::new();
    loop {
        let mut changed = false;
        for production in grammar.iter() {
            if known.contains(production.name.as_str()) {
                continue;
            }
            if is_productive(&production.expr, &known) {
                known.insert(&production.name);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    grammar
        .iter()
        .filter(|p| !known.contains(p.name.as_str()))
        .map(|p| ValidateError::NonProductive {
            name: p.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parser;

    fn load(src: &str) -> Grammar {
        parser::parse("<test>", src.as_bytes()).unwrap().grammar
    }

    #[test]
    fn detects_undefined_name() {
        let g = load(r#"S = Missing ."#);
        let errs = verify(&g, "S").unwrap_err();
        assert!(matches!(errs[0], ValidateError::UndefinedName { .. }));
    }

    #[test]
    fn detects_unreachable() {
        let g = load(
            r#"
            S = "a" .
            Dead = "b" .
        "#,
        );
        let errs = verify(&g, "S").unwrap_err();
        assert!(errs
            .iter()
            .any(|e| matches!(e, ValidateError::Unreachable { name } if name == "Dead")));
    }

    #[test]
    fn detects_non_productive_left_recursion_without_base_case() {
        let g = load(
            r#"
            S = Loop .
            Loop = Loop "a" .
        "#,
        );
        let errs = verify(&g, "S").unwrap_err();
        assert!(errs
            .iter()
            .any(|e| matches!(e, ValidateError::NonProductive { name } if name == "Loop")));
    }

    #[test]
    fn accepts_well_formed_grammar() {
        let g = load(
            r#"
            Expr = Term { ("+" | "-") Term } .
            Term = "0" … "9" .
        "#,
        );
        assert!(verify(&g, "Expr").is_ok());
    }

    #[test]
    fn empty_start_only_checks_names() {
        let g = load(
            r#"
            S = "a" .
            Dead = "b" .
        "#,
        );
        assert!(verify(&g, "").is_ok());
    }
}
