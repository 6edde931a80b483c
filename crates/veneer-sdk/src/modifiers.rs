//! Member modifier flags
//!
//! Modifiers are compared as whole masks during ordinal resolution, so a
//! field declared `PRIVATE | READONLY` does not match a `PRIVATE` filter.

use std::fmt;
use std::str::FromStr;

/// Modifier flags for declared fields and methods (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers (package/default visibility)
    pub const NONE: Self = Self(0x0000);
    /// Public visibility
    pub const PUBLIC: Self = Self(0x0001);
    /// Private visibility
    pub const PRIVATE: Self = Self(0x0002);
    /// Protected visibility
    pub const PROTECTED: Self = Self(0x0004);
    /// Class-level member
    pub const STATIC: Self = Self(0x0008);
    /// Assign-once field
    pub const READONLY: Self = Self(0x0010);
    /// Volatile field
    pub const VOLATILE: Self = Self(0x0040);
    /// Transient field
    pub const TRANSIENT: Self = Self(0x0080);
    /// Compiler-generated member
    pub const SYNTHETIC: Self = Self(0x1000);

    const NAMES: [(&'static str, Self); 8] = [
        ("PUBLIC", Self::PUBLIC),
        ("PRIVATE", Self::PRIVATE),
        ("PROTECTED", Self::PROTECTED),
        ("STATIC", Self::STATIC),
        ("READONLY", Self::READONLY),
        ("VOLATILE", Self::VOLATILE),
        ("TRANSIENT", Self::TRANSIENT),
        ("SYNTHETIC", Self::SYNTHETIC),
    ];

    /// Create from raw bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of flags
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove flags
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Class-level member
    pub const fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Assign-once field
    pub const fn is_readonly(&self) -> bool {
        self.contains(Self::READONLY)
    }
}

/// A modifier list named an unknown flag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown modifier: {0}")]
pub struct ParseModifiersError(pub String);

impl FromStr for Modifiers {
    type Err = ParseModifiersError;

    /// Parse a `|`-separated list of flag names, e.g. `"PRIVATE|READONLY"`.
    ///
    /// Raw numbers (`"0x12"` or `"18"`) are accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;
        for part in s.split('|').map(str::trim) {
            let upper = part.to_uppercase();
            if upper == "NONE" {
                continue;
            }
            let unknown = || ParseModifiersError(part.to_string());
            let flag = match Self::NAMES.iter().find(|(name, _)| *name == upper) {
                Some((_, flag)) => *flag,
                None => match part.strip_prefix("0x") {
                    Some(hex) => Self(u16::from_str_radix(hex, 16).map_err(|_| unknown())?),
                    None => Self(part.parse::<u16>().map_err(|_| unknown())?),
                },
            };
            result = result.union(flag);
        }
        Ok(result)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (name, flag) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.0 & !Self::NAMES.iter().fold(0, |acc, (_, flag)| acc | flag.0);
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", unknown)?;
        }
        Ok(())
    }
}
