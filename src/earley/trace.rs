//! Optional parse-event observer, per SPEC_FULL.md §4.3.9/§10.1.
//!
//! This is the structured descendant of the teacher's `Log<T>` verbosity
//! enum and its `#[cfg(debug_assertions)]`-gated `println!` calls
//! (`util/logger.rs`): instead of a hardcoded println sprinkled through the
//! parser, every predict/scan/complete/add event goes through one trait,
//! and [`NullTracer`] makes the no-tracer case free — its methods are
//! empty and `#[inline]`, so the optimizer drops the call sites (and any
//! argument formatting a caller's own tracer impl does) entirely.

use crate::earley::item::Item;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddReason {
    Predict,
    Scan,
    Complete,
}

impl AddReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddReason::Predict => "predict",
            AddReason::Scan => "scan",
            AddReason::Complete => "complete",
        }
    }
}

pub trait Tracer {
    fn on_predict(&mut self, _pos: usize, _item: &Item, _production: &str) {}
    fn on_scan(&mut self, _pos: usize, _item: &Item, _token: &Token, _matched: bool) {}
    fn on_complete(&mut self, _pos: usize, _item: &Item) {}
    fn on_item_add(&mut self, _pos: usize, _item: &Item, _reason: AddReason) {}
}

/// The zero-cost default: no tracer installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    #[inline]
    fn on_predict(&mut self, _pos: usize, _item: &Item, _production: &str) {}
    #[inline]
    fn on_scan(&mut self, _pos: usize, _item: &Item, _token: &Token, _matched: bool) {}
    #[inline]
    fn on_complete(&mut self, _pos: usize, _item: &Item) {}
    #[inline]
    fn on_item_add(&mut self, _pos: usize, _item: &Item, _reason: AddReason) {}
}

/// Renders events as the lines described in SPEC_FULL.md §6.3, collecting
/// them for later inspection instead of printing immediately.
#[derive(Debug, Default)]
pub struct CollectingTracer {
    pub lines: Vec<String>,
}

impl CollectingTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracer for CollectingTracer {
    fn on_predict(&mut self, pos: usize, item: &Item, production: &str) {
        self.lines
            .push(format!("[{pos}] PREDICT {production} from {item:?}"));
    }

    fn on_scan(&mut self, pos: usize, item: &Item, token: &Token, matched: bool) {
        let verdict = if matched { "HIT" } else { "MISS" };
        self.lines.push(format!(
            "[{pos}] SCAN {item:?}: {} \"{}\" \u{2192} {verdict}",
            token.kind, token.literal
        ));
    }

    fn on_complete(&mut self, pos: usize, item: &Item) {
        self.lines.push(format!("[{pos}] COMPLETE {item:?}"));
    }

    fn on_item_add(&mut self, pos: usize, item: &Item, reason: AddReason) {
        self.lines
            .push(format!("[{pos}] ADD ({}) {item:?}", reason.as_str()));
    }
}

/// Prints events to stdout as they happen; only compiled to do real work in
/// debug builds, matching the teacher's `#[cfg(debug_assertions)]` idiom
/// for its own diagnostic output.
#[derive(Debug, Default)]
pub struct PrintTracer {
    /// Only events whose rendering contains this substring are printed.
    /// Empty means print everything.
    pub filter: String,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }

    #[cfg(debug_assertions)]
    fn emit(&self, line: String) {
        if self.filter.is_empty() || line.contains(&self.filter) {
            println!("{line}");
        }
    }

    #[cfg(not(debug_assertions))]
    fn emit(&self, _line: String) {}
}

impl Tracer for PrintTracer {
    fn on_predict(&mut self, pos: usize, item: &Item, production: &str) {
        self.emit(format!("[{pos}] PREDICT {production} from {item:?}"));
    }

    fn on_scan(&mut self, pos: usize, item: &Item, token: &Token, matched: bool) {
        let verdict = if matched { "HIT" } else { "MISS" };
        self.emit(format!(
            "[{pos}] SCAN {item:?}: {} \"{}\" \u{2192} {verdict}",
            token.kind, token.literal
        ));
    }

    fn on_complete(&mut self, pos: usize, item: &Item) {
        self.emit(format!("[{pos}] COMPLETE {item:?}"));
    }

    fn on_item_add(&mut self, pos: usize, item: &Item, reason: AddReason) {
        self.emit(format!("[{pos}] ADD ({}) {item:?}", reason.as_str()));
    }
}
