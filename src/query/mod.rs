//! Composable record queries
//!
//! A query is a tree of boolean predicates over [`Record`]s: text search,
//! regex search over title and body, regex over the URL, exact metadata
//! equality, and the `And`/`Or`/`Not` combinators. Evaluation is pure and
//! total; a malformed regex is rejected when the query is built, never at
//! match time.

use crate::record::Record;
use regex::Regex;
use thiserror::Error;

/// Errors raised while constructing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// A boolean predicate tree over records.
#[derive(Debug, Clone)]
pub enum Query {
    /// Substring search over `title + " " + text_content`.
    Text { term: String, case_sensitive: bool },

    /// Regex search over title or text content.
    Regex(Regex),

    /// Regex search over the record URL.
    UrlRegex(Regex),

    /// Exact, case-sensitive metadata equality.
    Metadata { key: String, value: String },

    /// Matches when every child matches; empty means true.
    And(Vec<Query>),

    /// Matches when any child matches; empty means false.
    Or(Vec<Query>),

    /// Matches when the child does not.
    Not(Box<Query>),
}

impl Query {
    /// Builds a text-search leaf.
    pub fn text(term: impl Into<String>, case_sensitive: bool) -> Self {
        Query::Text {
            term: term.into(),
            case_sensitive,
        }
    }

    /// Builds a regex leaf over title and text content.
    ///
    /// Fails on a malformed pattern.
    pub fn regex(pattern: &str) -> Result<Self, QueryError> {
        Ok(Query::Regex(Regex::new(pattern)?))
    }

    /// Builds a regex leaf over the record URL.
    pub fn url_regex(pattern: &str) -> Result<Self, QueryError> {
        Ok(Query::UrlRegex(Regex::new(pattern)?))
    }

    /// Builds a metadata-equality leaf.
    pub fn metadata(key: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Metadata {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Conjunction of child queries.
    pub fn and(children: Vec<Query>) -> Self {
        Query::And(children)
    }

    /// Disjunction of child queries.
    pub fn or(children: Vec<Query>) -> Self {
        Query::Or(children)
    }

    /// Negation of a child query.
    pub fn not(child: Query) -> Self {
        Query::Not(Box::new(child))
    }

    /// Evaluates the query against a record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Query::Text {
                term,
                case_sensitive,
            } => {
                let haystack = format!("{} {}", record.title, record.text_content);
                if *case_sensitive {
                    haystack.contains(term.as_str())
                } else {
                    haystack.to_lowercase().contains(&term.to_lowercase())
                }
            }
            Query::Regex(pattern) => {
                pattern.is_match(&record.title) || pattern.is_match(&record.text_content)
            }
            Query::UrlRegex(pattern) => pattern.is_match(&record.url),
            Query::Metadata { key, value } => {
                record.metadata.get(key).is_some_and(|v| v == value)
            }
            Query::And(children) => children.iter().all(|child| child.matches(record)),
            Query::Or(children) => children.iter().any(|child| child.matches(record)),
            Query::Not(child) => !child.matches(record),
        }
    }
}
