use serde::{Deserialize, Serialize};

/// A single search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    Word(String),
    Phrase(String),
}

impl Term {
    /// The raw text of the term.
    pub fn text(&self) -> &str {
        match self {
            Term::Word(w) => w,
            Term::Phrase(p) => p,
        }
    }
}

/// Terms that must all match, minus the terms that must not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub include: Vec<Term>,
    pub exclude: Vec<Term>,
}

impl Group {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// A parsed query: any of its groups may match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub groups: Vec<Group>,
}

impl Query {
    /// True when no group can select anything.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.include.is_empty())
    }
}
