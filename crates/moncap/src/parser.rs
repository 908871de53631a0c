//! Recursive-descent parser for capability strings.
//!
//! ```text
//! moncap  := grant (sep grant)*
//! sep     := ws* ("," | ";") ws*
//! grant   := ws* "allow" (perm clauses | clauses perm) ws*
//! clauses := (ws+ clause)*
//! clause  := ("service" | "pool" | "command") (ws* "=" ws* | ws+) value
//! perm    := ws+ ("*" | [rwx]+)
//! value   := '"' [^"]+ '"' | "'" [^']+ "'" | [A-Za-z0-9_-]+
//! ```
//!
//! Clauses may come in any order but each keyword at most once per grant.
//! A failed alternative rewinds to where it started, so the reported offset
//! is always the end of the last complete grant.

use crate::grant::is_bareword_char;
use crate::{Grant, Match, ParseError, Perm};

/// Parse `text` into its grants, in source order.
pub(crate) fn parse(text: &str) -> Result<Vec<Grant>, ParseError> {
    Parser::new(text).capability()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    furthest: usize,
    expected: &'static str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            furthest: 0,
            expected: "grant",
        }
    }

    fn capability(mut self) -> Result<Vec<Grant>, ParseError> {
        let Some(first) = self.grant() else {
            return Err(self.error(0));
        };
        let mut grants = vec![first];

        loop {
            let committed = self.pos;
            if self.separator() {
                if let Some(grant) = self.grant() {
                    grants.push(grant);
                    continue;
                }
            }
            self.pos = committed;
            break;
        }

        if self.pos < self.input.len() {
            self.miss::<()>("';', ',' or end of input");
            return Err(self.error(self.pos));
        }
        Ok(grants)
    }

    fn grant(&mut self) -> Option<Grant> {
        self.attempt(|p| {
            p.skip_ws();
            if !p.eat_str("allow") {
                return p.miss("\"allow\"");
            }
            let grant = match p.attempt(Self::perm_then_clauses) {
                Some(grant) => grant,
                None => p.attempt(Self::clauses_then_perm)?,
            };
            p.skip_ws();
            Some(grant)
        })
    }

    fn perm_then_clauses(&mut self) -> Option<Grant> {
        let perm = self.perm()?;
        let matcher = self.clauses();
        Some(Grant::new(matcher, perm))
    }

    fn clauses_then_perm(&mut self) -> Option<Grant> {
        let matcher = self.clauses();
        let perm = self.perm()?;
        Some(Grant::new(matcher, perm))
    }

    fn perm(&mut self) -> Option<Perm> {
        self.attempt(|p| {
            if p.skip_ws() == 0 {
                return p.miss("permission set");
            }
            if p.eat('*') {
                return Some(Perm::ANY);
            }
            let mut perm = Perm::empty();
            while let Some(flag) = p.peek().and_then(perm_letter) {
                perm |= flag;
                p.pos += 1;
            }
            if perm.is_empty() {
                return p.miss("permission set");
            }
            Some(perm)
        })
    }

    fn clauses(&mut self) -> Match {
        let mut matcher = Match::default();
        while self.attempt(|p| p.clause(&mut matcher)).is_some() {}
        matcher
    }

    // Clauses are optional, so running out of them records nothing.
    fn clause(&mut self, matcher: &mut Match) -> Option<()> {
        if self.skip_ws() == 0 {
            return None;
        }
        let slot = if self.eat_str("service") {
            &mut matcher.service
        } else if self.eat_str("pool") {
            &mut matcher.pool
        } else if self.eat_str("command") {
            &mut matcher.command
        } else {
            return None;
        };
        if !slot.is_empty() {
            return self.miss("each constraint at most once per grant");
        }
        self.assign()?;
        *slot = self.value()?;
        Some(())
    }

    fn assign(&mut self) -> Option<()> {
        let spaced = self.skip_ws() > 0;
        if self.eat('=') {
            self.skip_ws();
            return Some(());
        }
        if spaced { Some(()) } else { self.miss("'=' or whitespace") }
    }

    fn value(&mut self) -> Option<String> {
        let rest = self.rest();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                match body.find(quote) {
                    Some(0) => self.miss("non-empty value"),
                    Some(end) => {
                        self.pos += end + 2;
                        Some(body[..end].to_string())
                    }
                    None => self.miss("closing quote"),
                }
            }
            _ => {
                let len = rest.find(|c: char| !is_bareword_char(c)).unwrap_or(rest.len());
                if len == 0 {
                    return self.miss("value");
                }
                self.pos += len;
                Some(rest[..len].to_string())
            }
        }
    }

    fn separator(&mut self) -> bool {
        self.skip_ws();
        if self.eat(';') || self.eat(',') {
            self.skip_ws();
            true
        } else {
            self.miss::<()>("';' or ','");
            false
        }
    }

    /// Run `f`, rewinding to the current position if it does not match.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = f(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    /// Record what was wanted here, keeping the deepest expectation.
    fn miss<T>(&mut self, expected: &'static str) -> Option<T> {
        if self.pos >= self.furthest {
            self.furthest = self.pos;
            self.expected = expected;
        }
        None
    }

    fn error(&self, offset: usize) -> ParseError {
        ParseError::new(self.input, offset, self.expected)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> usize {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        self.pos += len;
        len
    }
}

fn perm_letter(c: char) -> Option<Perm> {
    match c {
        'r' => Some(Perm::R),
        'w' => Some(Perm::W),
        'x' => Some(Perm::X),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(service: &str, pool: &str, command: &str, perm: Perm) -> Grant {
        Grant::new(Match::new(service, pool, command), perm)
    }

    #[test]
    fn test_allow_star() {
        assert_eq!(parse("allow *").unwrap(), vec![grant("", "", "", Perm::ANY)]);
    }

    #[test]
    fn test_perm_before_and_after_match() {
        let expected = vec![grant("mon", "", "", Perm::R)];
        assert_eq!(parse("allow r service=mon").unwrap(), expected);
        assert_eq!(parse("allow service=mon r").unwrap(), expected);
        assert_eq!(parse("allow service mon r").unwrap(), expected);
        assert_eq!(parse("allow r service = mon").unwrap(), expected);
    }

    #[test]
    fn test_multiple_grants_keep_order() {
        let grants = parse("allow rwx pool=foo; allow r pool=bar").unwrap();
        assert_eq!(
            grants,
            vec![
                grant("", "foo", "", Perm::R | Perm::W | Perm::X),
                grant("", "bar", "", Perm::R),
            ]
        );
        assert_eq!(parse("allow r , allow w").unwrap().len(), 2);
    }

    #[test]
    fn test_clauses_in_any_order() {
        let grants = parse("allow command=status pool=foo service=mon rw").unwrap();
        assert_eq!(grants, vec![grant("mon", "foo", "status", Perm::R | Perm::W)]);
    }

    #[test]
    fn test_perm_letters_any_order() {
        assert_eq!(parse("allow xr").unwrap()[0].perm, Perm::R | Perm::X);
        assert_eq!(parse("allow rr").unwrap()[0].perm, Perm::R);
        assert_ne!(parse("allow rwx").unwrap()[0].perm, Perm::ANY);
    }

    #[test]
    fn test_quoted_values() {
        let grants = parse(r#"allow r pool="my pool" command='say "hi"'"#).unwrap();
        assert_eq!(grants, vec![grant("", "my pool", "say \"hi\"", Perm::R)]);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(parse("  \tallow r pool=foo \n").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = parse("").unwrap_err();
        assert_eq!(err.offset(), 0);
        assert_eq!(err.expected(), "\"allow\"");
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_missing_perm_is_rejected() {
        let err = parse("allow service=mon").unwrap_err();
        assert_eq!(err.offset(), 0);
        assert_eq!(err.expected(), "permission set");
    }

    #[test]
    fn test_trailing_garbage_reports_remainder() {
        let err = parse("allow r; allow q").unwrap_err();
        assert_eq!(err.remainder(), "; allow q");
        assert_eq!(err.expected(), "permission set");

        let err = parse("allow rwxy").unwrap_err();
        assert_eq!(err.remainder(), "y");
    }

    #[test]
    fn test_trailing_separator_is_rejected() {
        let err = parse("allow r;").unwrap_err();
        assert_eq!(err.remainder(), ";");
    }

    #[test]
    fn test_repeated_keyword_is_rejected() {
        let err = parse("allow r pool=a pool=b").unwrap_err();
        assert_eq!(err.remainder(), "pool=b");
        assert_eq!(err.expected(), "each constraint at most once per grant");
        assert!(parse("allow pool=a pool=b r").is_err());
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(parse("allow r pool").unwrap_err().remainder(), "pool");
        assert_eq!(
            parse("allow r pool=\"\"").unwrap_err().expected(),
            "non-empty value"
        );
        assert_eq!(
            parse("allow r pool='foo").unwrap_err().expected(),
            "closing quote"
        );
        assert!(parse("allow r pool=foo*").is_err());
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(parse("Allow r").is_err());
        assert!(parse("allow R").is_err());
        assert!(parse("allow r Pool=foo").is_err());
    }

    #[test]
    fn test_allow_needs_whitespace() {
        assert!(parse("allow*").is_err());
        assert!(parse("allowr").is_err());
    }
}
