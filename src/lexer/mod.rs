//! The grammar-driven lexer: turns input bytes into [`Token`]s by matching
//! the grammar's uppercase-named ("terminal") productions, per
//! SPEC_FULL.md §4.2. This replaces the teacher's `Tokenizer`/
//! `CombinedTokenizer` state machine (`lexeme/mod.rs`), which drove a fixed
//! set of regex-backed `Pattern`s; here the "patterns" are the grammar
//! itself, resolved at runtime.

pub mod matcher;

use crate::grammar::Grammar;
use crate::position::{Position, Span};
use std::rc::Rc;

pub const EOF_KIND: &str = "EOF";
pub const ERROR_KIND: &str = "ERROR";
pub const WHITESPACE_KIND: &str = "WhiteSpace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn position(&self) -> &Position {
        &self.span.start
    }

    pub fn is_eof(&self) -> bool {
        self.kind == EOF_KIND
    }
}

pub struct Lexer<'g, 'i> {
    grammar: &'g Grammar,
    input: &'i [u8],
    position: Position,
    eof_emitted: bool,
}

impl<'g, 'i> Lexer<'g, 'i> {
    pub fn new(grammar: &'g Grammar, input: &'i [u8], filename: &str) -> Self {
        Self {
            grammar,
            input,
            position: Position::start(Rc::from(filename)),
            eof_emitted: false,
        }
    }

    fn advance_position(&mut self, consumed: &[u8]) {
        let mut prev_was_cr = false;
        for b in consumed {
            self.position.advance(*b, prev_was_cr);
            prev_was_cr = *b == b'\r';
        }
    }

    /// Produce the next token, or `None` once the synthetic `EOF` token has
    /// already been returned by a previous call.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.position.offset >= self.input.len() {
            if self.eof_emitted {
                return None;
            }
            self.eof_emitted = true;
            return Some(Token {
                kind: EOF_KIND.to_string(),
                literal: String::new(),
                span: Span::new(self.position.clone(), self.position.clone()),
            });
        }

        let start_pos = self.position.clone();
        let start_offset = self.position.offset;

        let mut best: Option<(usize, &str)> = None;
        for production in self.grammar.terminals() {
            if let Some(len) =
                matcher::match_expression(self.grammar, &production.expr, self.input, start_offset)
            {
                let is_longer = match best {
                    Some((b, _)) => len > b,
                    None => true,
                };
                if is_longer {
                    best = Some((len, production.name.as_str()));
                }
            }
        }

        if let Some((len, kind)) = best {
            let consumed = &self.input[start_offset..start_offset + len];
            let literal = String::from_utf8_lossy(consumed).into_owned();
            self.advance_position(consumed);
            return Some(Token {
                kind: kind.to_string(),
                literal,
                span: Span::new(start_pos, self.position.clone()),
            });
        }

        let b = self.input[start_offset];
        if b.is_ascii_whitespace() {
            self.advance_position(&self.input[start_offset..start_offset + 1]);
            return Some(Token {
                kind: WHITESPACE_KIND.to_string(),
                literal: (b as char).to_string(),
                span: Span::new(start_pos, self.position.clone()),
            });
        }

        self.advance_position(&self.input[start_offset..start_offset + 1]);
        Some(Token {
            kind: ERROR_KIND.to_string(),
            literal: String::from_utf8_lossy(&[b]).into_owned(),
            span: Span::new(start_pos, self.position.clone()),
        })
    }

    /// Drive `next_token` to end of input, returning every token including
    /// the final `EOF`.
    ///
    /// ```
    /// use ebnf_earley::grammar::parser;
    /// use ebnf_earley::Lexer;
    ///
    /// let grammar = parser::parse("<example>", br#"Digit = "0" … "9" ."#).unwrap().grammar;
    /// let tokens = Lexer::new(&grammar, b"7", "<input>").tokenize();
    /// assert_eq!(tokens[0].kind, "Digit");
    /// ```
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}
