use crate::ast::{Group, Query, Term};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Parse a web search query into groups of included and excluded terms.
///
/// `a b or c -d` reads as `(a AND b) OR (c AND NOT d)`. Stray operators are
/// dropped rather than reported.
pub fn parse(input: &str) -> Query {
    let tokens = tokenize(input);
    let mut parser = Parser::new(tokens);
    parser.parse_query()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn parse_query(&mut self) -> Query {
        let mut groups = Vec::new();
        loop {
            let group = self.parse_group();
            if !group.is_empty() {
                groups.push(group);
            }
            match self.advance() {
                Token::Or => continue,
                _ => break,
            }
        }
        Query { groups }
    }

    fn parse_group(&mut self) -> Group {
        let mut group = Group::default();
        loop {
            match self.peek().clone() {
                Token::Word(w) => {
                    self.advance();
                    group.include.push(Term::Word(w));
                }
                Token::Phrase(p) => {
                    self.advance();
                    if let Some(term) = phrase(p) {
                        group.include.push(term);
                    }
                }
                Token::Minus => {
                    self.advance();
                    match self.peek().clone() {
                        Token::Word(w) => {
                            self.advance();
                            group.exclude.push(Term::Word(w));
                        }
                        Token::Phrase(p) => {
                            self.advance();
                            if let Some(term) = phrase(p) {
                                group.exclude.push(term);
                            }
                        }
                        // `-or` and a trailing `-` negate nothing.
                        _ => {}
                    }
                }
                Token::Or | Token::Eof => return group,
            }
        }
    }
}

fn phrase(text: String) -> Option<Term> {
    let text = text.trim();
    if text.chars().any(char::is_alphanumeric) {
        Some(Term::Phrase(text.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str) -> Term {
        Term::Word(w.to_string())
    }

    #[test]
    fn parse_words_phrase_and_exclusion() {
        let query = parse("django \"release notes\" -packaging");
        assert_eq!(query.groups.len(), 1);
        let group = &query.groups[0];
        assert_eq!(
            group.include,
            vec![word("django"), Term::Phrase("release notes".into())]
        );
        assert_eq!(group.exclude, vec![word("packaging")]);
    }

    #[test]
    fn parse_or_splits_groups() {
        let query = parse("forms or models -admin");
        assert_eq!(query.groups.len(), 2);
        assert_eq!(query.groups[0].include, vec![word("forms")]);
        assert_eq!(query.groups[1].include, vec![word("models")]);
        assert_eq!(query.groups[1].exclude, vec![word("admin")]);
    }

    #[test]
    fn stray_operators_are_dropped() {
        let query = parse("or or forms or -");
        assert_eq!(query.groups.len(), 1);
        assert_eq!(query.groups[0].include, vec![word("forms")]);
        assert!(query.groups[0].exclude.is_empty());
    }

    #[test]
    fn negated_phrase() {
        let query = parse("views -\"class based\"");
        assert_eq!(
            query.groups[0].exclude,
            vec![Term::Phrase("class based".into())]
        );
    }

    #[test]
    fn empty_and_punctuation_only_queries_are_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("\"\" ?!").is_empty());
    }

    #[test]
    fn exclusion_only_query_is_empty() {
        let query = parse("-packaging");
        assert_eq!(query.groups.len(), 1);
        assert!(query.is_empty());
    }
}
