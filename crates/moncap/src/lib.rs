//! Monitor capability language: parsing and authorization checks.
//!
//! A credential carries a capability string such as
//! `allow r service=mon; allow rwx pool=foo`. This crate turns that string
//! into an ordered list of grants and decides, per request, whether a
//! (service, pool, command) tuple may be read, written or executed.
//!
//! # Core Concepts
//!
//! - [`Perm`]: read/write/execute bits, plus the `*` sentinel [`Perm::ANY`].
//! - [`Match`]: optional service/pool/command equality filter. Empty fields
//!   match anything.
//! - [`Grant`]: a [`Match`] paired with the [`Perm`] it grants.
//! - [`MonCap`]: the grants of one credential, in source order.
//!
//! Parsing is fail-closed: [`MonCap::update`] leaves no grants behind when the
//! new text is rejected, and [`SharedCap::replace`] swaps in an empty
//! capability. Evaluation accumulates the permissions of matching grants in
//! order and succeeds as soon as the request is covered.
//!
//! # Example
//!
//! ```
//! use moncap::{MonCap, Query};
//!
//! let cap = MonCap::parse("allow r service=mon; allow rwx pool=foo")?;
//!
//! assert!(cap.is_capable("mon", "", "", true, false, false));
//! assert!(!cap.is_capable("osd", "", "", true, false, false));
//! assert!(cap.check(&Query::new().pool("foo").write()).is_allowed());
//!
//! println!("{cap}"); // moncap[grant(service mon r),grant(pool foo rwx)]
//! # Ok::<(), moncap::ParseError>(())
//! ```

mod capability;
mod error;
mod grant;
mod parser;
mod perm;
mod query;
mod shared;

pub use capability::MonCap;
pub use error::{Error, ParseError, Result};
pub use grant::{Grant, Match};
pub use perm::Perm;
pub use query::{Decision, Query};
pub use shared::SharedCap;
