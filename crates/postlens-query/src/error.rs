use serde::Serialize;
use thiserror::Error;

/// What went wrong while parsing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// A `(` without its closing `)`.
    UnbalancedParen,
    /// A `)` with no open group.
    UnexpectedCloseParen,
    /// A `"` without its closing quote.
    UnclosedQuote,
    EmptyPhrase,
    EmptyGroup,
    /// An operator with a missing operand.
    DanglingOperator,
    /// Groups or negations nested past the supported depth.
    TooDeep,
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            SyntaxErrorKind::UnbalancedParen => "unbalanced opening parenthesis",
            SyntaxErrorKind::UnexpectedCloseParen => "unexpected closing parenthesis",
            SyntaxErrorKind::UnclosedQuote => "unclosed quote",
            SyntaxErrorKind::EmptyPhrase => "empty quoted phrase",
            SyntaxErrorKind::EmptyGroup => "empty parentheses",
            SyntaxErrorKind::DanglingOperator => "operator is missing an operand",
            SyntaxErrorKind::TooDeep => "query is nested too deeply",
        };
        f.write_str(msg)
    }
}

/// A malformed query, with the input echoed back and the 0-based character
/// position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at position {position} in query \"{query}\"")]
pub struct QuerySyntaxError {
    pub query: String,
    pub position: usize,
    pub kind: SyntaxErrorKind,
}

impl QuerySyntaxError {
    pub(crate) fn new(query: &str, position: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            query: query.to_string(),
            position,
            kind,
        }
    }

    /// The query on one line and a caret under the offending character.
    #[must_use]
    pub fn pointer(&self) -> String {
        format!("{}\n{}^", self.query, " ".repeat(self.position))
    }
}
