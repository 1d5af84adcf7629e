use std::fmt;

use serde::{Deserialize, Serialize};

/// Token types produced by the web search lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A bare word.
    Word(String),
    /// The contents of a double-quoted phrase.
    Phrase(String),
    /// A leading `-` that negates the next term.
    Minus,
    /// The `or` keyword.
    Or,

    /// The end of the input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{w}"),
            Token::Phrase(p) => write!(f, "\"{p}\""),
            Token::Minus => write!(f, "-"),
            Token::Or => write!(f, "or"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Position in the query string, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize a free-text search query.
///
/// Never fails: an unterminated quote runs to the end of the input and runs of
/// punctuation without any letter or digit are treated as separators.
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        let token = match ch {
            '"' => {
                pos += 1;
                let phrase_start = pos;
                while pos < chars.len() && chars[pos] != '"' {
                    pos += 1;
                }
                let phrase: String = chars[phrase_start..pos].iter().collect();
                if pos < chars.len() {
                    pos += 1; // closing quote
                }
                Token::Phrase(phrase)
            }
            '-' if pos + 1 < chars.len() && !chars[pos + 1].is_whitespace() && chars[pos + 1] != '-' => {
                pos += 1;
                Token::Minus
            }
            _ => {
                while pos < chars.len() && !chars[pos].is_whitespace() && chars[pos] != '"' {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                if !word.chars().any(char::is_alphanumeric) {
                    continue;
                }
                if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else {
                    Token::Word(word)
                }
            }
        };

        tokens.push(SpannedToken {
            token,
            span: Span { start, end: pos },
        });
    }

    tokens.push(SpannedToken {
        token: Token::Eof,
        span: Span {
            start: pos,
            end: pos,
        },
    });

    tokens
}
