//! Chart construction: predict/scan/complete to a fixpoint at each
//! position, per SPEC_FULL.md §4.3.2–§4.3.6.

use super::item::{Chart, Item};
use super::lower::{LoweredGrammar, Sym};
use super::trace::{AddReason, Tracer};
use crate::error::ParseFailure;
use crate::grammar::Grammar;
use crate::lexer::Token;
use std::rc::Rc;

fn is_terminal_symbol(grammar: &Grammar, name: &str) -> bool {
    grammar.get(name).is_some_and(|p| p.is_terminal())
}

fn symbol_at<'a>(lowered: &'a LoweredGrammar, item: &Item) -> Option<&'a Sym> {
    let rhs = lowered.rhs(&item.rule, item.alt);
    rhs.get(item.dot)
}

fn is_complete(lowered: &LoweredGrammar, item: &Item) -> bool {
    item.dot >= lowered.rhs(&item.rule, item.alt).len()
}

pub fn recognize(
    grammar: &Grammar,
    lowered: &LoweredGrammar,
    tokens: &[Token],
    start: &str,
    tracer: &mut dyn Tracer,
) -> Result<Chart, ParseFailure> {
    if !grammar.has(start) {
        return Err(ParseFailure::ProductionNotFound(start.to_string()));
    }

    let n = tokens.len();
    let mut chart = Chart::new(n + 1);

    let start_rc: Rc<str> = Rc::from(start);
    for alt in 0..lowered.alts(start).len() {
        let item = Item::new(start_rc.clone(), alt, 0, 0);
        if chart.set_mut(0).insert(item.clone()) {
            tracer.on_item_add(0, &item, AddReason::Predict);
        }
    }

    for i in 0..=n {
        let mut idx = 0;
        while idx < chart.set(i).len() {
            let item = chart.set(i).items()[idx].clone();
            idx += 1;

            if is_complete(lowered, &item) {
                complete(&mut chart, i, &item, lowered, tracer);
                continue;
            }

            match symbol_at(lowered, &item) {
                Some(Sym::Literal(_)) | Some(Sym::Range(_, _)) => {
                    scan(&mut chart, i, &item, lowered, tokens, tracer)
                }
                Some(Sym::NonTerminal(name)) if is_terminal_symbol(grammar, name) => {
                    scan(&mut chart, i, &item, lowered, tokens, tracer)
                }
                Some(Sym::NonTerminal(name)) => {
                    predict(&mut chart, i, &item, name, lowered, tracer)
                }
                None => unreachable!("is_complete already handled dot at end"),
            }
        }
    }

    if chart
        .set(n)
        .items()
        .iter()
        .any(|it| it.origin == 0 && &*it.rule == start && is_complete(lowered, it))
    {
        return Ok(chart);
    }

    let furthest = chart.furthest_nonempty();
    if furthest < n {
        Err(ParseFailure::UnexpectedToken {
            position: tokens[furthest].position().clone(),
            literal: tokens[furthest].literal.clone(),
        })
    } else {
        Err(ParseFailure::IncompleteParse)
    }
}

fn predict(
    chart: &mut Chart,
    i: usize,
    item: &Item,
    name: &str,
    lowered: &LoweredGrammar,
    tracer: &mut dyn Tracer,
) {
    tracer.on_predict(i, item, name);
    let name_rc: Rc<str> = Rc::from(name);
    for alt in 0..lowered.alts(name).len() {
        let new_item = Item::new(name_rc.clone(), alt, 0, i);
        if chart.set_mut(i).insert(new_item.clone()) {
            tracer.on_item_add(i, &new_item, AddReason::Predict);
        }
    }
}

fn scan(
    chart: &mut Chart,
    i: usize,
    item: &Item,
    lowered: &LoweredGrammar,
    tokens: &[Token],
    tracer: &mut dyn Tracer,
) {
    let Some(token) = tokens.get(i) else {
        return;
    };
    let sym = symbol_at(lowered, item).expect("scan called on a non-complete item");
    let matched = match sym {
        Sym::Literal(s) => &token.literal == s,
        Sym::Range(lo, hi) => {
            let mut chars = token.literal.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => *lo <= c && c <= *hi,
                _ => false,
            }
        }
        Sym::NonTerminal(name) => &token.kind == name || &token.literal == name,
    };
    tracer.on_scan(i, item, token, matched);
    if matched {
        let advanced = item.advanced();
        if chart.set_mut(i + 1).insert(advanced.clone()) {
            tracer.on_item_add(i + 1, &advanced, AddReason::Scan);
        }
    }
}

fn complete(chart: &mut Chart, i: usize, item: &Item, lowered: &LoweredGrammar, tracer: &mut dyn Tracer) {
    tracer.on_complete(i, item);
    let origin_items: Vec<Rc<Item>> = chart.set(item.origin).items().to_vec();
    for candidate in origin_items {
        if is_complete(lowered, &candidate) {
            continue;
        }
        if let Some(Sym::NonTerminal(name)) = symbol_at(lowered, &candidate) {
            if name.as_str() == &*item.rule {
                let advanced = candidate.advanced();
                if chart.set_mut(i).insert(advanced.clone()) {
                    tracer.on_item_add(i, &advanced, AddReason::Complete);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earley::lower::lower;
    use crate::earley::trace::NullTracer;
    use crate::grammar::parser;
    use crate::lexer::Lexer;

    fn setup(grammar_src: &str, input: &[u8]) -> (Grammar, LoweredGrammar, Vec<Token>) {
        let grammar = parser::parse("<test>", grammar_src.as_bytes()).unwrap().grammar;
        let lowered = lower(&grammar);
        let tokens: Vec<Token> = Lexer::new(&grammar, input, "<test>")
            .tokenize()
            .into_iter()
            .filter(|t| t.kind != "WhiteSpace" && t.kind != "EOF")
            .collect();
        (grammar, lowered, tokens)
    }

    #[test]
    fn accepts_simple_left_recursion() {
        let (grammar, lowered, tokens) = setup(r#"s = s "a" | "a" ."#, b"aaa");
        let mut tracer = NullTracer;
        let chart = recognize(&grammar, &lowered, &tokens, "s", &mut tracer).unwrap();
        assert!(chart
            .set(3)
            .items()
            .iter()
            .any(|it| &*it.rule == "s" && it.origin == 0));
    }

    #[test]
    fn rejects_unexpected_token() {
        let (grammar, lowered, tokens) = setup(r#"s = "a" "b" ."#, b"ac");
        let mut tracer = NullTracer;
        let err = recognize(&grammar, &lowered, &tokens, "s", &mut tracer).unwrap_err();
        assert!(matches!(err, ParseFailure::UnexpectedToken { .. }));
    }

    #[test]
    fn reports_incomplete_parse() {
        let (grammar, lowered, tokens) = setup(r#"s = "a" "b" ."#, b"a");
        let mut tracer = NullTracer;
        let err = recognize(&grammar, &lowered, &tokens, "s", &mut tracer).unwrap_err();
        assert!(matches!(err, ParseFailure::IncompleteParse));
    }

    #[test]
    fn unknown_start_production_is_reported() {
        let (grammar, lowered, tokens) = setup(r#"s = "a" ."#, b"a");
        let mut tracer = NullTracer;
        let err = recognize(&grammar, &lowered, &tokens, "Nope", &mut tracer).unwrap_err();
        assert!(matches!(err, ParseFailure::ProductionNotFound(_)));
    }
}
