//! crates/mm_core/src/ids.rs
//! Name tokens (archetypes, cards, snapshots) and the comparison output ID.
//! Deterministic, strict shapes; no I/O.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const MAX_NAME_LEN: usize = 128;
const HEX64_LEN: usize = 64;

/// Card and archetype names are free text, but never blank, never padded,
/// never carry control characters.
#[inline]
pub fn is_valid_name(s: &str) -> bool {
    let len = s.chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
        && s.trim() == s
        && !s.chars().any(char::is_control)
}

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

macro_rules! name_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }

            /// Case-insensitive comparison against a raw label.
            #[inline]
            pub fn eq_ignore_case(&self, other: &str) -> bool {
                self.0.to_lowercase() == other.trim().to_lowercase()
            }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_name(s) { Ok(Self(s.to_owned())) } else { Err(CoreError::InvalidName) }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                if is_valid_name(&s) { Ok(Self(s)) } else { Err(CoreError::InvalidName) }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(s: &str) -> Result<Self, Self::Error> { s.parse() }
        }

        impl From<$name> for String {
            #[inline]
            fn from(v: $name) -> String { v.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

name_newtype!(
    /// Archetype name; unique key of a `MetaDeck` within a snapshot.
    ArchetypeName
);
name_newtype!(
    /// Canonical card name as resolved by the deck import collaborator.
    CardName
);
name_newtype!(
    /// Identity of one immutable meta snapshot.
    SnapshotId
);

/// "CMP:" + 64-hex (lowercase); content-derived ID of a comparison result.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComparisonId(String);

impl ComparisonId {
    pub const PREFIX: &'static str = "CMP:";

    /// Build from a lowercase 64-hex digest.
    pub fn from_hex(hex64: &str) -> Result<Self, CoreError> {
        if is_valid_sha256(hex64) {
            Ok(Self(format!("{}{hex64}", Self::PREFIX)))
        } else {
            Err(CoreError::InvalidHex)
        }
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// The 64-hex digest without the prefix.
    #[inline] pub fn digest(&self) -> &str { &self.0[Self::PREFIX.len()..] }
}

impl fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for ComparisonId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(Self::PREFIX).ok_or(CoreError::InvalidId)?;
        if is_valid_sha256(rest) { Ok(Self(s.to_owned())) } else { Err(CoreError::InvalidId) }
    }
}

impl TryFrom<String> for ComparisonId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<ComparisonId> for String {
    fn from(v: ComparisonId) -> String { v.0 }
}
