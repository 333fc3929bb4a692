//! The grammar data model: `Expression`, `Production`, and `Grammar`.
//!
//! A `Grammar` is a name-indexed collection of `Production`s, built either by
//! [`parser::parse`] from EBNF source or directly by a caller. It is treated
//! as immutable read-only data once constructed: the lexer and the Earley
//! engine both borrow it for the lifetime of a run.

pub mod parser;
pub mod verify;

use crate::position::Position;
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::fmt::Write as _;
use std::rc::Rc;

/// One node of a grammar expression tree. Expressions are shared structure:
/// a `Production`'s `expr` may itself contain `Name` references resolved
/// later against the owning `Grammar`, never inline-expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Reference to another production by name.
    Name(String),
    /// A literal terminal string, e.g. `"+"`.
    TokenLiteral(String),
    /// An inclusive single-character range, e.g. `"0"…"9"`.
    Range(char, char),
    Sequence(Vec<Expression>),
    Alternative(Vec<Expression>),
    Option(Box<Expression>),
    Repetition(Box<Expression>),
    Group(Box<Expression>),
}

impl Expression {
    /// A canonical string rendering used to deduplicate Earley items that
    /// share a production name and dot but were predicted from differently
    /// shaped right-hand sides (e.g. two arms of an `Alternative`).
    pub fn structural_key(&self) -> String {
        let mut out = String::new();
        self.write_key(&mut out);
        out
    }

    fn write_key(&self, out: &mut String) {
        match self {
            Expression::Name(n) => {
                out.push('N');
                out.push('(');
                out.push_str(n);
                out.push(')');
            }
            Expression::TokenLiteral(s) => {
                out.push('L');
                out.push('(');
                out.push_str(s);
                out.push(')');
            }
            Expression::Range(lo, hi) => {
                let _ = write!(out, "R({lo}..{hi})");
            }
            Expression::Sequence(items) => {
                out.push_str("S[");
                for (i, e) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    e.write_key(out);
                }
                out.push(']');
            }
            Expression::Alternative(items) => {
                out.push_str("A[");
                for (i, e) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    e.write_key(out);
                }
                out.push(']');
            }
            Expression::Option(e) => {
                out.push_str("O(");
                e.write_key(out);
                out.push(')');
            }
            Expression::Repetition(e) => {
                out.push_str("P(");
                e.write_key(out);
                out.push(')');
            }
            Expression::Group(e) => {
                out.push_str("G(");
                e.write_key(out);
                out.push(')');
            }
        }
    }

    /// Number of top-level slots a dotted `Item` can advance through:
    /// `|seq|` for a `Sequence`, 1 for anything else.
    pub fn slot_count(&self) -> usize {
        match self {
            Expression::Sequence(items) => items.len().max(1),
            _ => 1,
        }
    }

    /// The expression at top-level slot `i`, per `slot_count`.
    pub fn slot(&self, i: usize) -> &Expression {
        match self {
            Expression::Sequence(items) if !items.is_empty() => &items[i],
            other => {
                debug_assert_eq!(i, 0);
                other
            }
        }
    }
}

/// A named grammar rule: `name = expr .`
#[derive(Debug, Clone)]
pub struct Production {
    pub name: String,
    pub expr: Expression,
    pub defined_at: Position,
    key: OnceCell<String>,
}

impl Production {
    pub fn new(name: String, expr: Expression, defined_at: Position) -> Self {
        Self {
            name,
            expr,
            defined_at,
            key: OnceCell::new(),
        }
    }

    /// A production is a lexer terminal iff its name begins with an
    /// uppercase ASCII letter (SPEC_FULL.md §4.2's naming convention).
    pub fn is_terminal(&self) -> bool {
        is_terminal_name(&self.name)
    }

    pub fn structural_key(&self) -> &str {
        self.key.get_or_init(|| self.expr.structural_key())
    }
}

pub fn is_terminal_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// A parsed and (optionally) verified grammar: an ordered, name-indexed map
/// of productions. Order is definition order and is load-bearing: the lexer
/// breaks longest-match ties by earlier definition, and the Earley engine
/// breaks derivation ambiguity by earlier definition.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    productions: IndexMap<String, Rc<Production>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            productions: IndexMap::new(),
        }
    }

    /// Insert or replace a production. Returns the replaced production, if
    /// any (used by the loader to detect and report `DuplicateName`).
    pub fn define(&mut self, production: Production) -> Option<Rc<Production>> {
        self.productions
            .insert(production.name.clone(), Rc::new(production))
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Production>> {
        self.productions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    /// Position of `name` in definition order, used to break lexer and
    /// parser ties deterministically.
    pub fn def_index(&self, name: &str) -> Option<usize> {
        self.productions.get_index_of(name)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Productions in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Production>> {
        self.productions.values()
    }

    /// Terminal (uppercase-named) productions in definition order, the set
    /// the lexer matches against.
    pub fn terminals(&self) -> impl Iterator<Item = &Rc<Production>> {
        self.productions.values().filter(|p| p.is_terminal())
    }
}
