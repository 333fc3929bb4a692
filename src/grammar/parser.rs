//! EBNF text → [`Grammar`](super::Grammar), per the dialect in
//! SPEC_FULL.md §4.1/§6.1:
//!
//! ```text
//! Production  = Name "=" Expression "." .
//! Expression  = Alternative .
//! Alternative = Term { "|" Term } .
//! Term        = Factor { Factor } .
//! Factor      = Name | Literal | Literal "…" Literal
//!             | "(" Expression ")" | "[" Expression "]" | "{" Expression "}" .
//! ```
//!
//! `//` starts a line comment; comments and whitespace are insignificant.
//! Every syntax error encountered is collected rather than aborting on the
//! first one, so callers see the whole list at once.

use super::{Expression, Grammar, Production};
use crate::error::{SyntaxError, ValidateError};
use crate::position::Position;
use std::rc::Rc;

/// The result of a successful parse: the grammar plus any `DuplicateName`
/// diagnostics noticed along the way (only the parse phase can see an
/// overwritten definition's original position; by the time `verify` runs,
/// the `Grammar` only remembers the last one).
pub struct ParseOutcome {
    pub grammar: Grammar,
    pub duplicates: Vec<ValidateError>,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    position: Position,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8], filename: Rc<str>) -> Self {
        Self {
            bytes,
            pos: 0,
            position: Position::start(filename),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        let prev_was_cr = self.pos > 0 && self.bytes[self.pos - 1] == b'\r';
        self.position.advance(b, prev_was_cr);
        self.pos += 1;
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// The ellipsis marker is the three-byte UTF-8 sequence for U+2026, or
    /// the ASCII fallback `..`.
    fn eat_ellipsis(&mut self) -> bool {
        if self.bytes[self.pos..].starts_with("…".as_bytes()) {
            for _ in 0..3 {
                self.advance();
            }
            true
        } else if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.advance();
            true
        } else {
            false
        }
    }
}

/// Parse EBNF source into a `Grammar`. On success every referenced name may
/// still be undefined or unreachable; run `grammar::verify::verify` to
/// check that.
///
/// ```
/// use ebnf_earley::grammar::parser;
///
/// let outcome = parser::parse("<example>", br#"Digit = "0" … "9" ."#).unwrap();
/// assert!(outcome.grammar.has("Digit"));
/// ```
pub fn parse(filename: &str, source: &[u8]) -> Result<ParseOutcome, Vec<SyntaxError>> {
    let mut scanner = Scanner::new(source, Rc::from(filename));
    let mut grammar = Grammar::new();
    let mut errors = Vec::new();
    let mut duplicates = Vec::new();

    loop {
        scanner.skip_trivia();
        if scanner.at_end() {
            break;
        }
        match parse_production(&mut scanner) {
            Ok((name, expr, defined_at)) => {
                let production = Production::new(name.clone(), expr, defined_at.clone());
                if grammar.define(production).is_some() {
                    duplicates.push(ValidateError::DuplicateName {
                        name,
                        position: defined_at,
                    });
                }
            }
            Err(e) => {
                errors.push(e);
                recover_to_next_production(&mut scanner);
            }
        }
    }

    if errors.is_empty() {
        Ok(ParseOutcome {
            grammar,
            duplicates,
        })
    } else {
        Err(errors)
    }
}

/// Skip forward to just past the next `.` terminator so one bad production
/// doesn't cascade into spurious errors for the rest of the file.
fn recover_to_next_production(scanner: &mut Scanner) {
    while let Some(b) = scanner.peek() {
        scanner.advance();
        if b == b'.' {
            break;
        }
    }
}

fn parse_production(
    scanner: &mut Scanner,
) -> Result<(String, Expression, Position), SyntaxError> {
    let defined_at = scanner.position.clone();
    let name = parse_name(scanner)?;
    scanner.skip_trivia();
    if !scanner.eat(b'=') {
        return Err(SyntaxError::UnexpectedToken {
            position: scanner.position.clone(),
        });
    }
    scanner.skip_trivia();
    let expr = parse_alternative(scanner)?;
    scanner.skip_trivia();
    if !scanner.eat(b'.') {
        return Err(SyntaxError::MissingTerminator {
            position: scanner.position.clone(),
        });
    }
    Ok((name, expr, defined_at))
}

fn parse_name(scanner: &mut Scanner) -> Result<String, SyntaxError> {
    scanner.skip_trivia();
    let start = scanner.pos;
    match scanner.peek() {
        Some(b) if b.is_ascii_alphabetic() => {
            scanner.advance();
        }
        _ => {
            return Err(SyntaxError::UnexpectedToken {
                position: scanner.position.clone(),
            })
        }
    }
    while let Some(b) = scanner.peek() {
        if b.is_ascii_alphanumeric() {
            scanner.advance();
        } else {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&scanner.bytes[start..scanner.pos]).into_owned())
}

fn parse_literal(scanner: &mut Scanner) -> Result<String, SyntaxError> {
    let open_pos = scanner.position.clone();
    if !scanner.eat(b'"') {
        return Err(SyntaxError::UnexpectedToken { position: open_pos });
    }
    let start = scanner.pos;
    loop {
        match scanner.peek() {
            None | Some(b'\n') => {
                return Err(SyntaxError::BadLiteral { position: open_pos })
            }
            Some(b'"') => break,
            _ => {
                scanner.advance();
            }
        }
    }
    let text = String::from_utf8_lossy(&scanner.bytes[start..scanner.pos]).into_owned();
    scanner.advance(); // closing quote
    Ok(text)
}

fn parse_alternative(scanner: &mut Scanner) -> Result<Expression, SyntaxError> {
    let mut arms = vec![parse_term(scanner)?];
    loop {
        scanner.skip_trivia();
        if scanner.peek() == Some(b'|') {
            scanner.advance();
            scanner.skip_trivia();
            arms.push(parse_term(scanner)?);
        } else {
            break;
        }
    }
    if arms.len() == 1 {
        Ok(arms.pop().unwrap())
    } else {
        Ok(Expression::Alternative(arms))
    }
}

fn parse_term(scanner: &mut Scanner) -> Result<Expression, SyntaxError> {
    let mut factors = Vec::new();
    loop {
        scanner.skip_trivia();
        match scanner.peek() {
            Some(b) if is_factor_start(b, scanner) => {
                factors.push(parse_factor(scanner)?);
            }
            _ => break,
        }
    }
    if factors.is_empty() {
        return Err(SyntaxError::EmptySequence {
            position: scanner.position.clone(),
        });
    }
    if factors.len() == 1 {
        Ok(factors.pop().unwrap())
    } else {
        Ok(Expression::Sequence(factors))
    }
}

fn is_factor_start(b: u8, _scanner: &Scanner) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'"' | b'(' | b'[' | b'{')
}

fn parse_factor(scanner: &mut Scanner) -> Result<Expression, SyntaxError> {
    scanner.skip_trivia();
    match scanner.peek() {
        Some(b'"') => {
            let first = parse_literal(scanner)?;
            scanner.skip_trivia();
            let save_pos = scanner.pos;
            let save_position = scanner.position.clone();
            if scanner.eat_ellipsis() {
                scanner.skip_trivia();
                if scanner.peek() == Some(b'"') {
                    let second = parse_literal(scanner)?;
                    let lo = single_char(&first, &save_position)?;
                    let hi = single_char(&second, &save_position)?;
                    if lo > hi {
                        return Err(SyntaxError::InvalidRange {
                            position: save_position,
                        });
                    }
                    return Ok(Expression::Range(lo, hi));
                }
                // Not actually a range; rewind (rare: grammar with a
                // literal immediately followed by two dots with no
                // closing literal is a syntax error anyway).
                scanner.pos = save_pos;
                scanner.position = save_position;
            }
            Ok(Expression::TokenLiteral(first))
        }
        Some(b) if b.is_ascii_alphabetic() => Ok(Expression::Name(parse_name(scanner)?)),
        Some(b'(') => {
            scanner.advance();
            scanner.skip_trivia();
            let inner = parse_alternative(scanner)?;
            scanner.skip_trivia();
            if !scanner.eat(b')') {
                return Err(SyntaxError::UnclosedGroup {
                    position: scanner.position.clone(),
                });
            }
            Ok(Expression::Group(Box::new(inner)))
        }
        Some(b'[') => {
            scanner.advance();
            scanner.skip_trivia();
            let inner = parse_alternative(scanner)?;
            scanner.skip_trivia();
            if !scanner.eat(b']') {
                return Err(SyntaxError::UnclosedGroup {
                    position: scanner.position.clone(),
                });
            }
            Ok(Expression::Option(Box::new(inner)))
        }
        Some(b'{') => {
            scanner.advance();
            scanner.skip_trivia();
            let inner = parse_alternative(scanner)?;
            scanner.skip_trivia();
            if !scanner.eat(b'}') {
                return Err(SyntaxError::UnclosedGroup {
                    position: scanner.position.clone(),
                });
            }
            Ok(Expression::Repetition(Box::new(inner)))
        }
        _ => Err(SyntaxError::UnexpectedToken {
            position: scanner.position.clone(),
        }),
    }
}

fn single_char(s: &str, position: &Position) -> Result<char, SyntaxError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SyntaxError::BadLiteral {
            position: position.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_grammar() {
        let src = br#"
            Expr = Term { ("+" | "-") Term } .
            Term = "0" … "9" .
        "#;
        let grammar = parse("<test>", src).expect("should parse").grammar;
        assert!(grammar.has("Expr"));
        assert!(grammar.has("Term"));
        match &grammar.get("Term").unwrap().expr {
            Expression::Range('0', '9') => {}
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_alternative() {
        let src = b"S = \"a\" | .";
        assert!(parse("<test>", src).is_err());
    }

    #[test]
    fn rejects_missing_terminator() {
        let src = b"S = \"a\"";
        assert!(parse("<test>", src).is_err());
    }

    #[test]
    fn reports_duplicate_definitions_and_keeps_last() {
        let src = br#"S = "a" . S = "b" ."#;
        let outcome = parse("<test>", src).expect("should parse");
        assert_eq!(outcome.duplicates.len(), 1);
        match &outcome.grammar.get("S").unwrap().expr {
            Expression::TokenLiteral(s) => assert_eq!(s, "b"),
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn collects_multiple_errors() {
        let src = b"S = | .\nT = | .";
        let errs = parse("<test>", src).unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}
