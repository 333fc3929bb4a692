//! Error taxonomy for the three phases of the engine: grammar syntax,
//! grammar validation, and parse failure. Each phase fails in its own way
//! (see the module docs of `grammar` and `earley`); these enums are the
//! shared vocabulary callers match on.

use crate::position::Position;
use thiserror::Error;

/// A malformed EBNF grammar source. The loader collects every syntax error
/// it finds rather than stopping at the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("{position}: unclosed group")]
    UnclosedGroup { position: Position },

    #[error("{position}: missing '.' terminator after production")]
    MissingTerminator { position: Position },

    #[error("{position}: bad literal")]
    BadLiteral { position: Position },

    #[error("{position}: empty alternative")]
    EmptyAlternative { position: Position },

    #[error("{position}: empty sequence")]
    EmptySequence { position: Position },

    #[error("{position}: expected a name, literal, or group")]
    UnexpectedToken { position: Position },

    #[error("{position}: range start must not be greater than range end")]
    InvalidRange { position: Position },
}

/// A structurally well-formed grammar that fails one of the soundness
/// checks in `grammar::verify`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidateError {
    #[error("{position}: undefined production {name:?}")]
    UndefinedName { name: String, position: Position },

    #[error("production {name:?} is unreachable from the start production")]
    Unreachable { name: String },

    #[error("production {name:?} cannot derive any finite terminal string")]
    NonProductive { name: String },

    #[error("production {name:?} is defined more than once; keeping the last definition")]
    DuplicateName { name: String, position: Position },
}

/// Failure of the recognizer to accept a token stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no production named {0:?}")]
    ProductionNotFound(String),

    #[error("{position}: unexpected {literal:?}")]
    UnexpectedToken { position: Position, literal: String },

    #[error("incomplete parse: input ended before the start production could complete")]
    IncompleteParse,
}
