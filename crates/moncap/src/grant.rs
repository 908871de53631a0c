//! Match constraints and grants.

use crate::Perm;
use serde::Serialize;
use std::fmt;

/// Which requests a grant applies to.
///
/// An empty field matches any value; a non-empty field must equal the
/// request's value exactly. The default (all empty) matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    pub service: String,
    pub pool: String,
    pub command: String,
}

impl Match {
    pub fn new(
        service: impl Into<String>,
        pool: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            pool: pool.into(),
            command: command.into(),
        }
    }

    /// True if no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.service.is_empty() && self.pool.is_empty() && self.command.is_empty()
    }

    /// Check the request parameters against this constraint.
    pub fn is_match(&self, service: &str, pool: &str, command: &str) -> bool {
        field_matches(&self.service, service)
            && field_matches(&self.pool, pool)
            && field_matches(&self.command, command)
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("service", &self.service),
            ("pool", &self.pool),
            ("command", &self.command),
        ]
    }
}

fn field_matches(constraint: &str, value: &str) -> bool {
    constraint.is_empty() || constraint == value
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.fields() {
            if !value.is_empty() {
                write!(f, "{key} {value} ")?;
            }
        }
        Ok(())
    }
}

/// A match constraint paired with the permissions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grant {
    #[serde(rename = "match")]
    pub matcher: Match,
    pub perm: Perm,
}

impl Grant {
    pub fn new(matcher: Match, perm: Perm) -> Self {
        Self { matcher, perm }
    }

    /// Render as a clause the parser accepts back.
    pub(crate) fn write_canonical(&self, out: &mut impl fmt::Write) -> fmt::Result {
        out.write_str("allow")?;
        for (key, value) in self.matcher.fields() {
            if !value.is_empty() {
                write!(out, " {key}=")?;
                write_value(out, value)?;
            }
        }
        write!(out, " {}", self.perm)
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grant({}{})", self.matcher, self.perm)
    }
}

pub(crate) fn is_bareword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

// Values built outside the parser may hold both quote kinds; those cannot be
// rendered losslessly and fall back to double quotes.
fn write_value(out: &mut impl fmt::Write, value: &str) -> fmt::Result {
    if value.chars().all(is_bareword_char) {
        out.write_str(value)
    } else if value.contains('"') {
        write!(out, "'{value}'")
    } else {
        write!(out, "\"{value}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_match_matches_everything() {
        let m = Match::default();
        assert!(m.is_unconstrained());
        assert!(m.is_match("mon", "foo", "status"));
        assert!(m.is_match("", "", ""));
    }

    #[test]
    fn test_match_is_exact_and_case_sensitive() {
        let m = Match::new("mon", "", "");
        assert!(m.is_match("mon", "any", "thing"));
        assert!(!m.is_match("Mon", "", ""));
        assert!(!m.is_match("mo", "", ""));
        assert!(!m.is_match("", "", ""));
    }

    #[test]
    fn test_all_fields_must_match() {
        let m = Match::new("mon", "foo", "status");
        assert!(m.is_match("mon", "foo", "status"));
        assert!(!m.is_match("mon", "foo", "health"));
        assert!(!m.is_match("osd", "foo", "status"));
    }

    #[test]
    fn test_grant_display() {
        let g = Grant::new(Match::new("mon", "foo", ""), Perm::R | Perm::W);
        assert_eq!(g.to_string(), "grant(service mon pool foo rw)");
        let g = Grant::new(Match::default(), Perm::ANY);
        assert_eq!(g.to_string(), "grant(*)");
    }

    #[test]
    fn test_canonical_quotes_odd_values() {
        let mut out = String::new();
        let g = Grant::new(Match::new("", "my pool", "say \"hi\""), Perm::X);
        g.write_canonical(&mut out).unwrap();
        assert_eq!(out, "allow pool=\"my pool\" command='say \"hi\"' x");
    }
}
