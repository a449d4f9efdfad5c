//! Resolution strategy flags.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask controlling how a single resolution walks injector scopes.
///
/// Flags combine with `|`. The scope bits ([`HOST`](Self::HOST),
/// [`SELF`](Self::SELF), [`SKIP_SELF`](Self::SKIP_SELF)) are consumed by
/// injector implementations; the resolution layer itself only interprets
/// [`OPTIONAL`](Self::OPTIONAL), which turns a missed lookup into an empty
/// result instead of a failure.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InjectFlags(u8);

impl InjectFlags {
    /// Consult both the requesting scope and its ancestors.
    pub const DEFAULT: Self = Self(0);
    /// Stop walking at the nearest host boundary.
    pub const HOST: Self = Self(1);
    /// Consult only the requesting scope.
    pub const SELF: Self = Self(1 << 1);
    /// Skip the requesting scope and start at its parent.
    pub const SKIP_SELF: Self = Self(1 << 2);
    /// Yield an empty result instead of failing when nothing provides the
    /// token.
    pub const OPTIONAL: Self = Self(1 << 3);
    /// Normalized "consult own scope" bit, the internal form injector
    /// implementations reduce the scope bits to. Never set by callers.
    pub const CHECK_SELF: Self = Self(1 << 4);
    /// Normalized "consult ancestor scopes" bit. Never set by callers.
    pub const CHECK_PARENT: Self = Self(1 << 5);

    /// Returns `true` if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `self` with every bit of `other` cleared.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns `true` if no bits are set.
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }

    /// The raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for InjectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InjectFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for InjectFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for InjectFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return f.write_str("DEFAULT");
        }
        let mut first = true;
        for (bit, name) in [
            (Self::HOST, "HOST"),
            (Self::SELF, "SELF"),
            (Self::SKIP_SELF, "SKIP_SELF"),
            (Self::OPTIONAL, "OPTIONAL"),
            (Self::CHECK_SELF, "CHECK_SELF"),
            (Self::CHECK_PARENT, "CHECK_PARENT"),
        ] {
            if self.contains(bit) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
