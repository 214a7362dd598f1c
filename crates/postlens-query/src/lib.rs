//! Boolean keyword search over free text.
//!
//! A query string such as `macron AND NOT "réforme des retraites"` is compiled
//! once into an [`Expression`], bound to a set of [`MatchOptions`] as a
//! [`Matcher`], and then evaluated against any number of texts.

pub mod error;
pub mod expression;
mod lexer;
pub mod matcher;
pub mod normalize;
mod parser;

pub use error::{QuerySyntaxError, SyntaxErrorKind};
pub use expression::Expression;
pub use matcher::{evaluate, MatchOptions, Matcher};
pub use normalize::{normalize, tokenize};
pub use parser::{compile, MAX_NESTING};
