//! Copy-on-write capability handle for concurrent readers.

use crate::{MonCap, ParseError};
use parking_lot::RwLock;
use std::sync::Arc;

/// The current capability of one credential, shared across threads.
///
/// Readers take an immutable [`snapshot`](SharedCap::snapshot) and evaluate
/// against it without holding the lock. Writers build a whole new [`MonCap`]
/// and swap it in, so a snapshot never changes underneath its reader.
#[derive(Debug, Default)]
pub struct SharedCap {
    current: RwLock<Arc<MonCap>>,
}

impl SharedCap {
    pub fn new(cap: MonCap) -> Self {
        Self {
            current: RwLock::new(Arc::new(cap)),
        }
    }

    /// Parse `text` into a new shared capability.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        MonCap::parse(text).map(Self::new)
    }

    /// The capability as of now.
    pub fn snapshot(&self) -> Arc<MonCap> {
        Arc::clone(&self.current.read())
    }

    /// Swap in the capability parsed from `text`.
    ///
    /// On a parse error an empty capability is swapped in instead.
    pub fn replace(&self, text: &str) -> Result<(), ParseError> {
        let (next, result) = match MonCap::parse(text) {
            Ok(cap) => (cap, Ok(())),
            Err(e) => (MonCap::default(), Err(e)),
        };
        *self.current.write() = Arc::new(next);
        result
    }

    /// Swap in the universal grant. For trusted callers only.
    pub fn set_allow_all(&self) {
        let mut cap = MonCap::default();
        cap.set_allow_all();
        *self.current.write() = Arc::new(cap);
    }
}
