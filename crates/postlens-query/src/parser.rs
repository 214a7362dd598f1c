//! Recursive-descent parser.
//!
//! ```text
//! query    := or_expr?
//! or_expr  := and_expr (("OR" | "|") and_expr)*
//! and_expr := not_expr (("AND" | "&")? not_expr)*
//! not_expr := ("NOT" | "!") not_expr | primary
//! primary  := WORD | PHRASE | "(" or_expr ")"
//! ```

use crate::error::{QuerySyntaxError, SyntaxErrorKind};
use crate::expression::Expression;
use crate::lexer::{lex, Token, TokenKind};

/// Deepest nesting of groups and negations a query may use.
pub const MAX_NESTING: usize = 256;

/// Compile a query string into an [`Expression`].
///
/// A blank query compiles to the match-all expression.
///
/// # Errors
///
/// Returns [`QuerySyntaxError`] for unbalanced parentheses or quotes, empty
/// groups or phrases, operators without an operand, and nesting deeper than
/// [`MAX_NESTING`].
pub fn compile(query: &str) -> Result<Expression, QuerySyntaxError> {
    let tokens = lex(query)?;
    if tokens.is_empty() {
        return Ok(Expression::And(Vec::new()));
    }

    let mut parser = Parser {
        query,
        tokens: &tokens,
        idx: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        // Only a stray `)` can stop `parse_or` early.
        return Err(parser.error(token.pos, SyntaxErrorKind::UnexpectedCloseParen));
    }
    Ok(expr)
}

struct Parser<'a> {
    query: &'a str,
    tokens: &'a [Token],
    idx: usize,
    /// Open groups and negations around the current token.
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.idx)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.idx);
        if token.is_some() {
            self.idx += 1;
        }
        token
    }

    fn error(&self, position: usize, kind: SyntaxErrorKind) -> QuerySyntaxError {
        QuerySyntaxError::new(self.query, position, kind)
    }

    fn enter(&mut self, pos: usize) -> Result<(), QuerySyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(pos, SyntaxErrorKind::TooDeep));
        }
        self.depth += 1;
        Ok(())
    }

    /// Fail unless the next token can start an operand of the operator at `op_pos`.
    fn expect_operand(&self, op_pos: usize) -> Result<(), QuerySyntaxError> {
        match self.peek() {
            Some(token) if token.kind.starts_operand() => Ok(()),
            _ => Err(self.error(op_pos, SyntaxErrorKind::DanglingOperator)),
        }
    }

    fn parse_or(&mut self) -> Result<Expression, QuerySyntaxError> {
        let mut children = vec![self.parse_and()?];
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Or {
                break;
            }
            let op_pos = token.pos;
            self.idx += 1;
            self.expect_operand(op_pos)?;
            children.push(self.parse_and()?);
        }
        Ok(Expression::or(children))
    }

    fn parse_and(&mut self) -> Result<Expression, QuerySyntaxError> {
        let mut children = vec![self.parse_not()?];
        while let Some(token) = self.peek() {
            let op_pos = token.pos;
            if token.kind == TokenKind::And {
                self.idx += 1;
                self.expect_operand(op_pos)?;
            } else if !token.kind.starts_operand() {
                break;
            }
            // Adjacent operands without an operator are an implicit AND.
            children.push(self.parse_not()?);
        }
        Ok(Expression::and(children))
    }

    fn parse_not(&mut self) -> Result<Expression, QuerySyntaxError> {
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Not {
                let op_pos = token.pos;
                self.idx += 1;
                self.expect_operand(op_pos)?;
                self.enter(op_pos)?;
                let child = self.parse_not()?;
                self.depth -= 1;
                return Ok(Expression::not(child));
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, QuerySyntaxError> {
        let query_len = self.query.chars().count();
        let Some(token) = self.advance().cloned() else {
            return Err(self.error(query_len, SyntaxErrorKind::DanglingOperator));
        };

        match token.kind {
            TokenKind::Word(word) => Ok(Expression::Term(word)),
            TokenKind::Phrase(phrase) => Ok(Expression::Phrase(phrase)),
            TokenKind::LParen => {
                if matches!(self.peek(), Some(t) if t.kind == TokenKind::RParen) {
                    return Err(self.error(token.pos, SyntaxErrorKind::EmptyGroup));
                }
                self.enter(token.pos)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(t) if t.kind == TokenKind::RParen => Ok(inner),
                    _ => Err(self.error(token.pos, SyntaxErrorKind::UnbalancedParen)),
                }
            }
            TokenKind::RParen => Err(self.error(token.pos, SyntaxErrorKind::UnexpectedCloseParen)),
            TokenKind::And | TokenKind::Or | TokenKind::Not => {
                Err(self.error(token.pos, SyntaxErrorKind::DanglingOperator))
            }
        }
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
