//! Parsed capabilities and their evaluation.

use crate::parser;
use crate::{Grant, Match, ParseError, Perm};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

/// An ordered list of grants.
///
/// Grants are only ever replaced as a whole: by a successful parse, by a
/// failed parse (which leaves no grants at all), or by [`MonCap::set_allow_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonCap {
    grants: Vec<Grant>,
}

impl MonCap {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self { grants }
    }

    /// Parse a capability string such as `allow r service=mon; allow rwx pool=foo`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        match parser::parse(text) {
            Ok(grants) => {
                debug!(grants = grants.len(), "parsed capability");
                Ok(Self { grants })
            }
            Err(e) => {
                warn!(offset = e.offset(), expected = e.expected(), "{e}");
                Err(e)
            }
        }
    }

    /// Re-parse in place. On failure every grant is dropped, never kept.
    pub fn update(&mut self, text: &str) -> Result<(), ParseError> {
        match Self::parse(text) {
            Ok(parsed) => {
                *self = parsed;
                Ok(())
            }
            Err(e) => {
                self.grants.clear();
                Err(e)
            }
        }
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// A capability holding the single unconstrained `*` grant.
    pub fn allow_all_cap() -> Self {
        Self {
            grants: vec![Grant::new(Match::default(), Perm::ANY)],
        }
    }

    /// True if some grant is unconstrained and allows `*`.
    pub fn allow_all(&self) -> bool {
        self.grants
            .iter()
            .any(|g| g.matcher.is_unconstrained() && g.perm.is_any())
    }

    /// Replace every grant with the universal one. For trusted callers only.
    pub fn set_allow_all(&mut self) {
        info!(dropped = self.grants.len(), "capability set to allow all");
        *self = Self::allow_all_cap();
    }

    /// Check whether the matching grants, taken in order, cover the request.
    ///
    /// Permissions of matching grants accumulate; the scan stops at the first
    /// grant after which every requested mode is covered. A request for no
    /// modes at all succeeds on the first matching grant.
    pub fn is_capable(
        &self,
        service: &str,
        pool: &str,
        command: &str,
        may_read: bool,
        may_write: bool,
        may_exec: bool,
    ) -> bool {
        let wanted = Perm::from_flags(may_read, may_write, may_exec);
        let mut allow = Perm::empty();

        for (index, grant) in self.grants.iter().enumerate() {
            if !grant.matcher.is_match(service, pool, command) {
                continue;
            }
            allow |= grant.perm;
            trace!(index, %grant, accumulated = %allow, "grant matched");
            if allow.covers(wanted) {
                debug!(service, pool, command, %wanted, index, "capability allowed");
                return true;
            }
        }

        debug!(service, pool, command, %wanted, "capability denied");
        false
    }

    /// Render as capability text that parses back to the same grants.
    pub fn to_canonical(&self) -> String {
        let mut out = String::new();
        for (i, grant) in self.grants.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            // Writing into a String cannot fail.
            let _ = grant.write_canonical(&mut out);
        }
        out
    }
}

impl FromStr for MonCap {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MonCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("moncap[")?;
        for (i, grant) in self.grants.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{grant}")?;
        }
        f.write_str("]")
    }
}
