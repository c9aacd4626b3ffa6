//! Legacy filter UUIDs.
//!
//! SIMPL writes filter UUIDs wrapped in braces (`{xxxxxxxx-...}`) while the
//! complex mapping tables use the bare form. [`LegacyUuid`] is the normalized
//! bare form used as the join key between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UuidError;

/// Length of a canonical hyphenated UUID string.
const UUID_LEN: usize = 36;

/// Byte offsets of the hyphens in a canonical UUID string.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A normalized legacy filter UUID.
///
/// Surrounding whitespace and braces are removed and hex digits are
/// lowercased, so lookups are independent of how the source spelled it.
///
/// # Examples
///
/// ```
/// use sx_core::LegacyUuid;
///
/// let uuid = LegacyUuid::parse(" {A8463056-3FA7-530B-847F-7F4CB78B8602} ").unwrap();
/// assert_eq!(uuid.as_str(), "a8463056-3fa7-530b-847f-7f4cb78b8602");
/// assert!(uuid.braced().eq_ignore_ascii_case("{A8463056-3FA7-530B-847F-7F4CB78B8602}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LegacyUuid(String);

impl LegacyUuid {
    /// Parses and normalizes a UUID, with or without braces.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError`] if the stripped value is not a 36-character
    /// hyphenated hex UUID.
    pub fn parse(raw: &str) -> Result<Self, UuidError> {
        let stripped = raw
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim();

        if stripped.len() != UUID_LEN {
            return Err(UuidError {
                raw: raw.to_owned(),
                reason: "expected 36 characters",
            });
        }

        for (i, c) in stripped.char_indices() {
            let valid = if HYPHEN_POSITIONS.contains(&i) {
                c == '-'
            } else {
                c.is_ascii_hexdigit()
            };
            if !valid {
                return Err(UuidError {
                    raw: raw.to_owned(),
                    reason: "expected hyphenated hex digits",
                });
            }
        }

        Ok(Self(stripped.to_ascii_lowercase()))
    }

    /// Returns the bare normalized form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the SIMPL spelling, wrapped in braces.
    #[must_use]
    pub fn braced(&self) -> String {
        format!("{{{}}}", self.0)
    }
}

impl fmt::Display for LegacyUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LegacyUuid {
    type Error = UuidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LegacyUuid> for String {
    fn from(value: LegacyUuid) -> Self {
        value.0
    }
}
