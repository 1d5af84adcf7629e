//! Lenient parser for "web search" style queries: bare words, quoted phrases,
//! `-exclusions` and `or` alternatives.

pub mod ast;
pub mod fts5;
pub mod lexer;
pub mod parser;

pub use ast::{Group, Query, Term};
pub use parser::parse;

/// Parse `input` and compile it straight to an FTS5 match expression.
pub fn compile(input: &str) -> Option<String> {
    fts5::to_match_expr(&parse(input))
}
