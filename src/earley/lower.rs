//! Flattens an EBNF [`Grammar`] into an ordinary context-free grammar the
//! chart engine can run unmodified Earley over.
//!
//! `Group` is stripped transparently (it never changes meaning). `Option`,
//! `Repetition`, and a nested (non-top-level) `Alternative` each get a
//! memoized synthetic production:
//!
//! ```text
//! [body]  ⇒  $optK  = body | (empty)
//! {body}  ⇒  $repK  = body $repK | (empty)
//! (a|b)   ⇒  $altK  = a | b            (only when not already a production's own top-level shape)
//! ```
//!
//! This is the standard technique for running Earley over EBNF without
//! special-casing every compound operator inside the chart loop: the loop
//! only ever needs to know "terminal" vs "reference to another rule".
//! `forest` undoes this transparently when building the CST: synthetic
//! productions never get their own node, their matched children are
//! spliced into the parent instead, and the `(empty)` branch contributes
//! nothing.

use crate::grammar::{Expression, Grammar};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sym {
    Literal(String),
    Range(char, char),
    /// Reference to another rule by name. May name a real grammar
    /// production (upper- or lowercase) or a synthetic one (`$opt0`, …).
    NonTerminal(String),
}

pub const SYNTHETIC_PREFIX: char = '$';

pub fn is_synthetic(name: &str) -> bool {
    name.starts_with(SYNTHETIC_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    Option,
    Repetition,
    Alternative,
}

pub fn synthetic_kind(name: &str) -> Option<SyntheticKind> {
    if name.starts_with("$opt") {
        Some(SyntheticKind::Option)
    } else if name.starts_with("$rep") {
        Some(SyntheticKind::Repetition)
    } else if name.starts_with("$alt") || name.starts_with("$seq") {
        Some(SyntheticKind::Alternative)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct LoweredGrammar {
    rules: IndexMap<String, Vec<Vec<Sym>>>,
}

impl LoweredGrammar {
    pub fn alts(&self, name: &str) -> &[Vec<Sym>] {
        self.rules.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn rhs<'a>(&'a self, name: &str, alt: usize) -> &'a [Sym] {
        &self.rules[name][alt]
    }
}

struct LowerCtx {
    rules: IndexMap<String, Vec<Vec<Sym>>>,
    memo: IndexMap<String, String>,
    counter: usize,
}

pub fn lower(grammar: &Grammar) -> LoweredGrammar {
    let mut ctx = LowerCtx {
        rules: IndexMap::new(),
        memo: IndexMap::new(),
        counter: 0,
    };

    for production in grammar.iter() {
        let arms = top_level_arms(&production.expr);
        let mut lowered_alts = Vec::with_capacity(arms.len());
        for arm in arms {
            lowered_alts.push(lower_arm(arm, &mut ctx));
        }
        ctx.rules.insert(production.name.clone(), lowered_alts);
    }

    LoweredGrammar { rules: ctx.rules }
}

fn top_level_arms(expr: &Expression) -> Vec<&Expression> {
    match expr {
        Expression::Alternative(arms) => arms.iter().collect(),
        other => vec![other],
    }
}

fn unwrap_group(mut expr: &Expression) -> &Expression {
    while let Expression::Group(inner) = expr {
        expr = inner;
    }
    expr
}

fn lower_arm(arm: &Expression, ctx: &mut LowerCtx) -> Vec<Sym> {
    match unwrap_group(arm) {
        Expression::Sequence(items) => items.iter().map(|it| lower_factor(it, ctx)).collect(),
        other => vec![lower_factor(other, ctx)],
    }
}

fn lower_factor(expr: &Expression, ctx: &mut LowerCtx) -> Sym {
    match unwrap_group(expr) {
        Expression::Name(n) => Sym::NonTerminal(n.clone()),
        Expression::TokenLiteral(s) => Sym::Literal(s.clone()),
        Expression::Range(lo, hi) => Sym::Range(*lo, *hi),
        Expression::Option(body) => Sym::NonTerminal(synth_option(body, ctx)),
        Expression::Repetition(body) => Sym::NonTerminal(synth_repetition(body, ctx)),
        Expression::Alternative(arms) => Sym::NonTerminal(synth_alternative(arms, ctx)),
        Expression::Sequence(items) => Sym::NonTerminal(synth_sequence(items, ctx)),
        Expression::Group(_) => unreachable!("unwrap_group strips all Group layers"),
    }
}

fn synth_option(body: &Expression, ctx: &mut LowerCtx) -> String {
    let key = format!("opt:{}", body.structural_key());
    if let Some(name) = ctx.memo.get(&key) {
        return name.clone();
    }
    let name = format!("$opt{}", ctx.counter);
    ctx.counter += 1;
    ctx.memo.insert(key, name.clone());
    let body_symbols = lower_arm(body, ctx);
    ctx.rules
        .insert(name.clone(), vec![body_symbols, Vec::new()]);
    name
}

fn synth_repetition(body: &Expression, ctx: &mut LowerCtx) -> String {
    let key = format!("rep:{}", body.structural_key());
    if let Some(name) = ctx.memo.get(&key) {
        return name.clone();
    }
    let name = format!("$rep{}", ctx.counter);
    ctx.counter += 1;
    ctx.memo.insert(key, name.clone());
    let mut body_symbols = lower_arm(body, ctx);
    body_symbols.push(Sym::NonTerminal(name.clone()));
    ctx.rules
        .insert(name.clone(), vec![body_symbols, Vec::new()]);
    name
}

fn synth_alternative(arms: &[Expression], ctx: &mut LowerCtx) -> String {
    let key = format!("alt:{}", Expression::Alternative(arms.to_vec()).structural_key());
    if let Some(name) = ctx.memo.get(&key) {
        return name.clone();
    }
    let name = format!("$alt{}", ctx.counter);
    ctx.counter += 1;
    ctx.memo.insert(key, name.clone());
    let lowered_arms: Vec<Vec<Sym>> = arms.iter().map(|a| lower_arm(a, ctx)).collect();
    ctx.rules.insert(name.clone(), lowered_arms);
    name
}

fn synth_sequence(items: &[Expression], ctx: &mut LowerCtx) -> String {
    let key = format!("seq:{}", Expression::Sequence(items.to_vec()).structural_key());
    if let Some(name) = ctx.memo.get(&key) {
        return name.clone();
    }
    let name = format!("$seq{}", ctx.counter);
    ctx.counter += 1;
    ctx.memo.insert(key, name.clone());
    let symbols: Vec<Sym> = items.iter().map(|it| lower_factor(it, ctx)).collect();
    ctx.rules.insert(name.clone(), vec![symbols]);
    name
}
