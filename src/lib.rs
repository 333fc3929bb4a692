//! A grammar-driven lexer and Earley parsing engine for EBNF grammars.
//!
//! # Overview
//!
//! Most parsing libraries ask you to encode your grammar as Rust: nested
//! combinators, a hand-built token enum, recursive-descent functions wired
//! together by hand. This crate instead takes an EBNF grammar as *data* —
//! loaded from text at runtime — and derives both a lexer and a parser from
//! it directly, so a new grammar is a new string, not a new binary.
//!
//! The three phases are exposed as separate modules so each can be used (or
//! tested) independently:
//!
//! - [`grammar`]: parse EBNF source into a [`grammar::Grammar`], then
//!   [`grammar::verify::verify`] it for undefined names, unreachable
//!   productions, and non-productive cycles.
//! - [`lexer`]: split input bytes into [`lexer::Token`]s by longest-match
//!   against the grammar's uppercase-named ("terminal") productions.
//! - [`earley`]: recognize a token stream against a lowercase-named
//!   ("non-terminal") start production and reconstruct a concrete syntax
//!   tree ([`earley::Node`]) from the resulting chart.
//!
//! [`earley::parse`] drives all three phases in one call.
//!
//! # Example
//!
//! ```
//! use ebnf_earley::earley::{self, options::EarleyOptions};
//! use ebnf_earley::grammar::{parser, verify};
//!
//! let source = br#"
//!     expr   = term { ("+" | "-") term } .
//!     term   = factor { ("*" | "/") factor } .
//!     factor = Number | "(" expr ")" .
//!     Number = "0" … "9" { "0" … "9" } .
//! "#;
//!
//! let outcome = parser::parse("<example>", source).expect("grammar should be well-formed");
//! verify::verify(&outcome.grammar, "expr").expect("grammar should verify");
//!
//! let options = EarleyOptions::new("expr");
//! let result = earley::parse(&outcome.grammar, b"1 + 2 * 3", "<input>", options)
//!     .expect("input should parse");
//! assert_eq!(result.cst.kind, "expr");
//! ```
//!
//! # License
//! Provided under the MIT OR Apache-2.0 license.

pub mod earley;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod position;

pub use error::{ParseFailure, SyntaxError, ValidateError};
pub use grammar::Grammar;
pub use lexer::{Lexer, Token};
pub use position::{Position, Span};
