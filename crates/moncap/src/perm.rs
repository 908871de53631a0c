//! Read/write/execute permission bits.

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Access modes granted by a grant or requested by a query.
    ///
    /// `ANY` is the `*` sentinel. It covers every mode, but it is a distinct
    /// value: `R | W | X` is not `ANY`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Perm: u8 {
        const R = 1 << 1;
        const W = 1 << 2;
        const X = 1 << 3;
        const ANY = 0xff;
    }
}

impl Perm {
    /// Build a request mask from the three access flags.
    pub fn from_flags(read: bool, write: bool, exec: bool) -> Self {
        let mut perm = Perm::empty();
        perm.set(Perm::R, read);
        perm.set(Perm::W, write);
        perm.set(Perm::X, exec);
        perm
    }

    /// True for the `*` sentinel only.
    pub fn is_any(self) -> bool {
        self == Perm::ANY
    }

    /// True if every mode in `wanted` is granted by `self`.
    pub fn covers(self, wanted: Perm) -> bool {
        self.contains(wanted & (Perm::R | Perm::W | Perm::X))
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str("*");
        }
        for (flag, letter) in [(Perm::R, "r"), (Perm::W, "w"), (Perm::X, "x")] {
            if self.contains(flag) {
                f.write_str(letter)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Perm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_letters_in_fixed_order() {
        assert_eq!((Perm::X | Perm::R).to_string(), "rx");
        assert_eq!((Perm::R | Perm::W | Perm::X).to_string(), "rwx");
        assert_eq!(Perm::empty().to_string(), "");
    }

    #[test]
    fn test_any_is_a_sentinel() {
        assert_eq!(Perm::ANY.to_string(), "*");
        assert!(!(Perm::R | Perm::W | Perm::X).is_any());
        assert!(Perm::ANY.covers(Perm::R | Perm::W | Perm::X));
    }

    #[test]
    fn test_covers() {
        let rw = Perm::R | Perm::W;
        assert!(rw.covers(Perm::R));
        assert!(rw.covers(Perm::empty()));
        assert!(!rw.covers(Perm::X));
        assert!(Perm::empty().covers(Perm::empty()));
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(Perm::from_flags(true, false, true), Perm::R | Perm::X);
        assert_eq!(Perm::from_flags(false, false, false), Perm::empty());
    }

    #[test]
    fn test_serializes_as_text() {
        assert_eq!(serde_json::to_string(&Perm::ANY).unwrap(), "\"*\"");
        assert_eq!(serde_json::to_string(&(Perm::R | Perm::W)).unwrap(), "\"rw\"");
    }
}
