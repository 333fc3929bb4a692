//! The Earley recognizer and CST builder (SPEC_FULL.md §4.3): flattens the
//! grammar once ([`lower`]), builds a chart ([`engine`]), and reconstructs a
//! [`cst::Node`] tree from it ([`forest`]).

pub mod cst;
pub mod dump;
pub mod engine;
pub mod forest;
pub mod item;
pub mod lower;
pub mod options;
pub mod trace;

use crate::error::ParseFailure;
use crate::grammar::Grammar;
use crate::lexer::{Lexer, Token};
use options::EarleyOptions;
use trace::Tracer;

pub use cst::Node;
pub use item::Chart;
pub use lower::LoweredGrammar;

/// Drop the synthetic `EOF` token and any token whose kind is in the
/// trivia set, per SPEC_FULL.md §4.3.8.
pub fn filter_trivia(tokens: Vec<Token>, trivia: &std::collections::HashSet<String>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !t.is_eof() && !trivia.contains(&t.kind))
        .collect()
}

pub struct ParseOutput {
    pub cst: Node,
    pub chart: Chart,
    pub lowered: LoweredGrammar,
    pub tokens: Vec<Token>,
}

/// Lex, filter trivia, recognize, and reconstruct a CST in one call — the
/// crate's main entry point.
pub fn parse<T: Tracer>(
    grammar: &Grammar,
    input: &[u8],
    filename: &str,
    mut options: EarleyOptions<T>,
) -> Result<ParseOutput, ParseFailure> {
    let raw_tokens = Lexer::new(grammar, input, filename).tokenize();
    let tokens = filter_trivia(raw_tokens, &options.trivia);
    let lowered = lower::lower(grammar);
    let chart = engine::recognize(grammar, &lowered, &tokens, &options.start, &mut options.tracer)?;
    let cst = forest::build(&chart, &lowered, &tokens, &options.start)
        .expect("chart accepted but forest reconstruction failed: chart invariant violated");
    Ok(ParseOutput {
        cst,
        chart,
        lowered,
        tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parser;

    #[test]
    fn end_to_end_s1_with_whitespace() {
        let grammar = parser::parse(
            "<test>",
            br#"
            expr   = term { ("+" | "-") term } .
            term   = factor { ("*" | "/") factor } .
            factor = Number | "(" expr ")" .
            Number = "0" … "9" { "0" … "9" } .
        "#,
        )
        .unwrap()
        .grammar;

        let options = EarleyOptions::new("expr");
        let output = parse(&grammar, b"1 + 2 * 3", "<test>", options).expect("should parse");
        assert_eq!(output.cst.kind, "expr");
        assert_eq!(output.cst.children().len(), 3);
    }

    #[test]
    fn reports_unexpected_token_position() {
        let grammar = parser::parse("<test>", br#"s = "a" "b" ."#).unwrap().grammar;
        let options = EarleyOptions::new("s");
        let err = parse(&grammar, b"ac", "<test>", options).unwrap_err();
        match err {
            ParseFailure::UnexpectedToken { literal, .. } => assert_eq!(literal, "c"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
