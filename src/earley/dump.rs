//! Chart dump format, per SPEC_FULL.md §6.3: one header per chart position
//! followed by its items, `[NAME → •dot, origin]` with a trailing `✓` for
//! complete items.

use super::item::Chart;
use super::lower::LoweredGrammar;
use crate::lexer::Token;
use std::fmt::Write as _;

pub fn dump_chart(chart: &Chart, lowered: &LoweredGrammar, tokens: &[Token]) -> String {
    let mut out = String::new();
    for i in 0..chart.len() {
        let heading = match tokens.get(i) {
            Some(t) => format!("before {} {:?}", t.kind, t.literal),
            None => "end of input".to_string(),
        };
        let _ = writeln!(out, "--- Position {i} ({heading}) ---");
        for item in chart.set(i).items() {
            let rhs = lowered.rhs(&item.rule, item.alt);
            let complete = item.dot >= rhs.len();
            let mark = if complete { " \u{2713}" } else { "" };
            let _ = writeln!(
                out,
                "[{} \u{2192} \u{2022}{}, {}]{}",
                item.rule, item.dot, item.origin, mark
            );
        }
    }
    out
}
