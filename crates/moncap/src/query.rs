//! Authorization requests and decisions.

use crate::{Error, MonCap, Perm, Result};
use std::fmt;

/// What an operation touches and which modes it needs.
///
/// Empty names mean "unspecified"; they only satisfy unconstrained fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub service: String,
    pub pool: String,
    pub command: String,
    pub wanted: Perm,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = pool.into();
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn read(mut self) -> Self {
        self.wanted |= Perm::R;
        self
    }

    pub fn write(mut self) -> Self {
        self.wanted |= Perm::W;
        self
    }

    pub fn exec(mut self) -> Self {
        self.wanted |= Perm::X;
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' on service '{}' pool '{}' command '{}'",
            self.wanted, self.service, self.pool, self.command
        )
    }
}

/// Result of a capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl MonCap {
    /// Evaluate a [`Query`] against the grants.
    pub fn check(&self, query: &Query) -> Decision {
        let allowed = self.is_capable(
            &query.service,
            &query.pool,
            &query.command,
            query.wanted.contains(Perm::R),
            query.wanted.contains(Perm::W),
            query.wanted.contains(Perm::X),
        );
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny {
                reason: format!("no grant covers {query}"),
            }
        }
    }

    /// Check a query, returning an error if it is denied.
    ///
    /// Services call this before performing a privileged operation.
    pub fn require(&self, query: &Query) -> Result<()> {
        match self.check(query) {
            Decision::Allow => Ok(()),
            Decision::Deny { reason } => Err(Error::Denied(reason)),
        }
    }
}
