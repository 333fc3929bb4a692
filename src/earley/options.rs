//! The recognized configuration surface (SPEC_FULL.md §6.4), expressed as a
//! small builder in the spirit of the teacher's `DefaultParser::new`
//! constructor (`lib.rs`).

use super::trace::{NullTracer, Tracer};
use std::collections::HashSet;

/// Default trivia kinds filtered out before chart construction.
pub fn default_trivia() -> HashSet<String> {
    ["WhiteSpace", "Comment", "LineTerminator"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub struct EarleyOptions<T: Tracer = NullTracer> {
    pub start: String,
    pub trivia: HashSet<String>,
    pub tracer: T,
}

impl Default for EarleyOptions<NullTracer> {
    fn default() -> Self {
        Self {
            start: String::new(),
            trivia: default_trivia(),
            tracer: NullTracer,
        }
    }
}

impl EarleyOptions<NullTracer> {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Default::default()
        }
    }
}

impl<T: Tracer> EarleyOptions<T> {
    pub fn with_trivia(mut self, trivia: HashSet<String>) -> Self {
        self.trivia = trivia;
        self
    }

    pub fn with_tracer<U: Tracer>(self, tracer: U) -> EarleyOptions<U> {
        EarleyOptions {
            start: self.start,
            trivia: self.trivia,
            tracer,
        }
    }
}
