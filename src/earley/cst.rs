//! The concrete syntax tree produced by [`forest`](super::forest), and its
//! two textual renderings: an interactive `ptree` view (same idiom as the
//! teacher's `impl TreeItem for ASTNode` in `ast_node.rs`) and the
//! diagnostic dump format from SPEC_FULL.md §6.3.

use crate::lexer::Token;
use crate::position::Span;
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::io::Write;

/// A node is a *terminal* when `token` is set, an *error* node when
/// `error` is set, otherwise a non-terminal with zero or more children.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: String,
    pub children: Vec<Node>,
    pub token: Option<Token>,
    pub span: Span,
    pub error: Option<String>,
}

impl Node {
    pub fn terminal(token: Token) -> Self {
        let span = token.span.clone();
        Self {
            kind: token.kind.clone(),
            children: Vec::new(),
            token: Some(token),
            span,
            error: None,
        }
    }

    pub fn non_terminal(kind: impl Into<String>, children: Vec<Node>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            children,
            token: None,
            span,
            error: None,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            token: None,
            span,
            error: Some(message.into()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn text(&self) -> &str {
        self.token.as_ref().map(|t| t.literal.as_str()).unwrap_or("")
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Indented-lines dump per SPEC_FULL.md §6.3:
    /// `KIND "literal" [position]` for terminals, `NAME [start-end]` for
    /// non-terminals.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        if self.is_terminal() {
            out.push_str(&format!(
                "{} {:?} [{}]\n",
                self.kind,
                self.text(),
                self.span.start
            ));
        } else {
            out.push_str(&format!("{} [{}]\n", self.kind, self.span));
        }
        for child in &self.children {
            child.write_pretty(out, depth + 1);
        }
    }

    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_print())
    }
}

impl TreeItem for Node {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        if self.is_terminal() {
            write!(f, "{} {:?} [{}]", self.kind, self.text(), self.span.start)
        } else {
            write!(f, "{} [{}]", self.kind, self.span)
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn pos() -> crate::position::Position {
        crate::position::Position::start(Rc::from("<test>"))
    }

    #[test]
    fn pretty_print_formats_terminal_and_nonterminal() {
        let token = Token {
            kind: "Number".into(),
            literal: "1".into(),
            span: Span::new(pos(), pos()),
        };
        let leaf = Node::terminal(token);
        let root = Node::non_terminal("Expr", vec![leaf], Span::new(pos(), pos()));
        let out = root.pretty_print();
        assert!(out.starts_with("Expr ["));
        assert!(out.contains("Number \"1\""));
    }
}
