//! Query predicates and orderings in the Prismic query language

use chrono::{DateTime, Utc};
use std::fmt;

/// A single query predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `[at(path, "value")]`
    At { path: String, value: String },
    /// `[date.after(path, millis)]`, strictly after
    DateAfter { path: String, date: DateTime<Utc> },
    /// `[date.before(path, millis)]`, strictly before
    DateBefore { path: String, date: DateTime<Utc> },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    pub fn date_after(path: &str, date: DateTime<Utc>) -> Self {
        Predicate::DateAfter {
            path: path.to_string(),
            date,
        }
    }

    pub fn date_before(path: &str, date: DateTime<Utc>) -> Self {
        Predicate::DateBefore {
            path: path.to_string(),
            date,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, {})]", path, quote(value))
            }
            Predicate::DateAfter { path, date } => {
                write!(f, "[date.after({}, {})]", path, date.timestamp_millis())
            }
            Predicate::DateBefore { path, date } => {
                write!(f, "[date.before({}, {})]", path, date.timestamp_millis())
            }
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render a predicate list as the `q` query parameter
pub fn to_query(predicates: &[Predicate]) -> String {
    let mut q = String::from("[");
    for p in predicates {
        q.push_str(&p.to_string());
    }
    q.push(']');
    q
}

/// Sort order for search results
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "[{} desc]", self.field)
        } else {
            write!(f, "[{}]", self.field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_at_predicate() {
        let p = Predicate::at("document.type", "posts");
        assert_eq!(p.to_string(), r#"[at(document.type, "posts")]"#);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let p = Predicate::at("my.posts.uid", r#"a"b"#);
        assert_eq!(p.to_string(), r#"[at(my.posts.uid, "a\"b")]"#);
    }

    #[test]
    fn test_query_joins_predicates() {
        let date = Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap();
        let q = to_query(&[
            Predicate::at("document.type", "posts"),
            Predicate::date_after("document.first_publication_date", date),
        ]);
        assert_eq!(
            q,
            r#"[[at(document.type, "posts")][date.after(document.first_publication_date, 1612137600000)]]"#
        );
    }

    #[test]
    fn test_ordering() {
        let field = "document.first_publication_date";
        assert_eq!(Ordering::asc(field).to_string(), "[document.first_publication_date]");
        assert_eq!(
            Ordering::desc(field).to_string(),
            "[document.first_publication_date desc]"
        );
    }
}
