use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A single location in a source buffer: a 0-based byte offset plus the
/// 1-based line/column it corresponds to.
///
/// Column counting is byte-based, not rune-based: a multi-byte UTF-8
/// character advances `column` by its byte length, not by one. This mirrors
/// the lexer's own byte-oriented scanning and is a deliberate, if easy to
/// trip over, choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: Rc<str>,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start(filename: Rc<str>) -> Self {
        Self {
            filename,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance this position past `byte`, updating line/column per the
    /// `\n` and `\r\n` conventions described in the lexer's position
    /// tracking rules.
    pub fn advance(&mut self, byte: u8, prev_was_cr: bool) {
        self.offset += 1;
        if byte == b'\n' {
            if prev_was_cr {
                // \r\n counts as a single line terminator; \r already
                // advanced the line, so just reset the column.
                self.column = 1;
            } else {
                self.line += 1;
                self.column = 1;
            }
        } else if byte == b'\r' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A half-open byte range `[start, end)` in one source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The span covering both `self` and `other`, in source order.
    pub fn union(&self, other: &Span) -> Span {
        let start = if self.start.offset <= other.start.offset {
            self.start.clone()
        } else {
            other.start.clone()
        };
        let end = if self.end.offset >= other.end.offset {
            self.end.clone()
        } else {
            other.end.clone()
        };
        Span::new(start, end)
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}
