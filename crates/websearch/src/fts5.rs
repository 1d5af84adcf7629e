//! Compile a parsed query into an SQLite FTS5 match expression.

use crate::ast::{Group, Query, Term};

/// Render `query` as an FTS5 `MATCH` expression.
///
/// Every term is emitted as a quoted FTS5 string so user input can never
/// produce a syntax error. Returns `None` when nothing selectable is left,
/// for instance a query made only of exclusions.
pub fn to_match_expr(query: &Query) -> Option<String> {
    let groups: Vec<String> = query.groups.iter().filter_map(group_expr).collect();
    let expr = match groups.len() {
        0 => return None,
        1 => groups.into_iter().next()?,
        _ => groups
            .iter()
            .map(|g| format!("({g})"))
            .collect::<Vec<_>>()
            .join(" OR "),
    };
    tracing::trace!(%expr, "compiled web search query");
    Some(expr)
}

fn group_expr(group: &Group) -> Option<String> {
    if group.include.is_empty() {
        return None;
    }
    let include = join(&group.include, " AND ");
    if group.exclude.is_empty() {
        return Some(include);
    }
    let exclude = join(&group.exclude, " OR ");
    Some(format!("({include}) NOT ({exclude})"))
}

fn join(terms: &[Term], op: &str) -> String {
    terms.iter().map(quote).collect::<Vec<_>>().join(op)
}

/// Quote a term as an FTS5 string literal.
pub fn quote(term: &Term) -> String {
    format!("\"{}\"", term.text().replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compile(input: &str) -> Option<String> {
        to_match_expr(&parse(input))
    }

    #[test]
    fn single_word() {
        assert_eq!(compile("django").as_deref(), Some("\"django\""));
    }

    #[test]
    fn phrase_and_exclusion() {
        assert_eq!(
            compile("django \"release notes\" -packaging").as_deref(),
            Some("(\"django\" AND \"release notes\") NOT (\"packaging\")")
        );
    }

    #[test]
    fn alternatives() {
        assert_eq!(
            compile("forms or models").as_deref(),
            Some("(\"forms\") OR (\"models\")")
        );
    }

    #[test]
    fn fts5_operators_in_input_stay_literal() {
        assert_eq!(
            compile("NEAR(a b) AND title:x*").as_deref(),
            Some("\"NEAR(a\" AND \"b)\" AND \"AND\" AND \"title:x*\"")
        );
    }

    #[test]
    fn exclusion_only_compiles_to_nothing() {
        assert_eq!(compile("-packaging"), None);
        assert_eq!(compile(""), None);
    }

    #[test]
    fn group_without_inclusions_is_dropped() {
        assert_eq!(
            compile("-admin or forms").as_deref(),
            Some("\"forms\"")
        );
    }
}
