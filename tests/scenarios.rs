//! End-to-end scenarios exercising the grammar loader, lexer, and Earley
//! engine together through the crate's public API.

use ebnf_earley::earley::options::EarleyOptions;
use ebnf_earley::earley::{self, trace::CollectingTracer};
use ebnf_earley::error::{ParseFailure, SyntaxError, ValidateError};
use ebnf_earley::grammar::{parser, verify};
use ebnf_earley::Grammar;

fn load(src: &str) -> Grammar {
    parser::parse("<test>", src.as_bytes()).expect("should parse").grammar
}

/// S1: a classic arithmetic expression grammar with operator precedence
/// encoded through production nesting.
#[test]
fn s1_arithmetic_with_precedence() {
    let grammar = load(
        r#"
        expr   = term { ("+" | "-") term } .
        term   = factor { ("*" | "/") factor } .
        factor = Number | "(" expr ")" .
        Number = "0" … "9" { "0" … "9" } .
    "#,
    );
    verify::verify(&grammar, "expr").expect("grammar should verify");

    let options = EarleyOptions::new("expr");
    let output = earley::parse(&grammar, b"1 + 2 * (3 - 4)", "<input>", options)
        .expect("should parse");

    assert_eq!(output.cst.kind, "expr");
    let top = output.cst.children();
    assert_eq!(top.len(), 3);
    assert_eq!(top[1].text(), "+");
    // The right operand is a term whose factor is a parenthesized expr.
    let rhs_term = &top[2];
    assert_eq!(rhs_term.kind, "term");
    let factor = &rhs_term.children()[0];
    assert_eq!(factor.kind, "factor");
    assert_eq!(factor.children()[0].text(), "(");
}

/// S2: a keyword must win over a same-spelling identifier because it is
/// declared earlier in the grammar (lexer tie-break by definition order).
#[test]
fn s2_keyword_precedes_identifier() {
    let grammar = load(
        r#"
        stmt       = Return | Identifier .
        Return     = "return" .
        Identifier = "a" … "z" { "a" … "z" } .
    "#,
    );
    verify::verify(&grammar, "stmt").unwrap();

    let options = EarleyOptions::new("stmt");
    let output = earley::parse(&grammar, b"return", "<input>", options).unwrap();
    let leaf = &output.cst.children()[0];
    assert_eq!(leaf.kind, "Return");

    let options = EarleyOptions::new("stmt");
    let output = earley::parse(&grammar, b"returning", "<input>", options).unwrap();
    let leaf = &output.cst.children()[0];
    assert_eq!(leaf.kind, "Identifier");
}

/// S4: nested repetition and grouping, where the inner repeated unit is
/// itself an alternative spelled out with a literal.
#[test]
fn s4_nested_repetition_of_grouped_alternative() {
    let grammar = load(
        r#"
        list  = "[" [ Item { "," Item } ] "]" .
        Item  = "x" | "y" .
    "#,
    );
    verify::verify(&grammar, "list").unwrap();

    let options = EarleyOptions::new("list");
    let output = earley::parse(&grammar, b"[x,y,x]", "<input>", options).unwrap();
    // "[", Item, ",", Item, ",", Item, "]"
    assert_eq!(output.cst.children().len(), 7);

    let options = EarleyOptions::new("list");
    let output = earley::parse(&grammar, b"[]", "<input>", options).unwrap();
    assert_eq!(output.cst.children().len(), 2);
}

/// S5: an ambiguous grammar (two distinct non-terminal derivations of the
/// same string) resolves deterministically to the earlier-defined
/// alternative, rather than to whichever the lexer happens to prefer.
#[test]
fn s5_ambiguity_resolves_to_first_defined_alternative() {
    let grammar = load(
        r#"
        s = one | two .
        one = "x" .
        two = "x" .
    "#,
    );
    verify::verify(&grammar, "s").unwrap();

    let options = EarleyOptions::new("s");
    let output = earley::parse(&grammar, b"x", "<input>", options).unwrap();
    assert_eq!(output.cst.children()[0].kind, "one");
}

/// S6: whitespace and comments are tokenized but filtered out of the chart
/// input by default, so they never appear in the resulting CST.
#[test]
fn s6_trivia_is_filtered_before_recognition() {
    let grammar = load(
        r#"
        sum = Number { "+" Number } .
        Number = "0" … "9" { "0" … "9" } .
    "#,
    );
    let options = EarleyOptions::new("sum");
    let output = earley::parse(&grammar, b"1  +   22 +3", "<input>", options).unwrap();
    assert!(output
        .tokens
        .iter()
        .all(|t| t.kind != "WhiteSpace" && t.kind != "EOF"));
    assert_eq!(output.cst.children().len(), 5);
}

#[test]
fn undefined_reference_is_rejected_before_parsing() {
    let grammar = load(r#"S = Ghost ."#);
    let errs = verify::verify(&grammar, "S").unwrap_err();
    assert!(matches!(errs[0], ValidateError::UndefinedName { .. }));
}

#[test]
fn malformed_grammar_source_reports_syntax_errors() {
    let err = parser::parse("<test>", b"S = ").unwrap_err();
    assert!(matches!(err[0], SyntaxError::EmptySequence { .. }));
}

/// S3: a left-recursive rule (`s = s "a" | "a" .`) is accepted through
/// ordinary chart completion, with no recursive descent into `s` itself.
#[test]
fn s3_left_recursion_via_completion() {
    let grammar = load(r#"s = s "a" | "a" ."#);
    verify::verify(&grammar, "s").unwrap();

    let options = EarleyOptions::new("s");
    let output = earley::parse(&grammar, b"aaa", "<input>", options).expect("should parse");
    assert_eq!(output.cst.kind, "s");
    assert_eq!(output.cst.children().len(), 2);
    assert_eq!(output.cst.children()[0].kind, "s");
    assert_eq!(output.cst.children()[1].text(), "a");
}

#[test]
fn unexpected_token_reports_position_of_furthest_progress() {
    let grammar = load(r#"s = "a" "b" "c" ."#);
    let options = EarleyOptions::new("s");
    let err = earley::parse(&grammar, b"abx", "<input>", options).unwrap_err();
    match err {
        ParseFailure::UnexpectedToken { literal, position } => {
            assert_eq!(literal, "x");
            assert_eq!(position.offset, 2);
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn incomplete_input_is_distinguished_from_unexpected_token() {
    let grammar = load(r#"s = "a" "b" ."#);
    let options = EarleyOptions::new("s");
    let err = earley::parse(&grammar, b"a", "<input>", options).unwrap_err();
    assert!(matches!(err, ParseFailure::IncompleteParse));
}

#[test]
fn collecting_tracer_observes_a_real_parse() {
    let grammar = load(r#"s = "a" { "a" } ."#);
    let options = EarleyOptions::new("s").with_tracer(CollectingTracer::new());
    let output = earley::parse(&grammar, b"aaa", "<input>", options).unwrap();
    assert_eq!(output.cst.children().len(), 3);
}

#[test]
fn empty_repetition_round_trips_through_the_chart_dump() {
    let grammar = load(r#"s = { "a" } ."#);
    let lowered = ebnf_earley::earley::lower::lower(&grammar);
    let tokens: Vec<_> = ebnf_earley::Lexer::new(&grammar, b"", "<input>")
        .tokenize()
        .into_iter()
        .filter(|t| !t.is_eof())
        .collect();
    let mut tracer = ebnf_earley::earley::trace::NullTracer;
    let chart = ebnf_earley::earley::engine::recognize(&grammar, &lowered, &tokens, "s", &mut tracer)
        .unwrap();
    let dump = ebnf_earley::earley::dump::dump_chart(&chart, &lowered, &tokens);
    assert!(dump.contains("Position 0"));
    assert!(dump.contains("\u{2713}"));
}
