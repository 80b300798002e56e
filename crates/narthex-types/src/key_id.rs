use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Fewest hex digits accepted after the `0x` marker.
pub const MIN_HEX_DIGITS: usize = 2;
/// Most hex digits accepted after the `0x` marker (32 bits).
pub const MAX_HEX_DIGITS: usize = 8;

const HEX_PREFIX: &str = "0x";
const RECORD_SUFFIX: &str = ".key";

/// Caller-supplied identifier naming a registration slot.
///
/// A `KeyId` is a plain 32-bit value. Its textual forms (`0x2a`, `0x2A`,
/// `0x002a`) are only spellings: parsing canonicalises to the numeric value,
/// and the record name is always derived from that value, so every spelling
/// of the same number lands on the same Key Record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(u32);

impl KeyId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Extract the identifier from a request path such as `/register/0x2a`.
    ///
    /// Only the final segment after the last `/` is considered. A path with
    /// no separator or an empty final segment is rejected.
    pub fn from_path(path: &str) -> Result<Self, TypeError> {
        let segment = match path.rfind('/') {
            Some(idx) => &path[idx + 1..],
            None => return Err(TypeError::MissingSegment(path.to_string())),
        };
        if segment.is_empty() {
            return Err(TypeError::MissingSegment(path.to_string()));
        }
        Self::parse_segment(segment)
    }

    /// Parse a single `0x<hex>` segment with 2 to 8 hex digits of either case.
    pub fn parse_segment(segment: &str) -> Result<Self, TypeError> {
        let digits = segment
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| TypeError::MissingPrefix(segment.to_string()))?;

        if !(MIN_HEX_DIGITS..=MAX_HEX_DIGITS).contains(&digits.len()) {
            return Err(TypeError::InvalidDigitCount {
                min: MIN_HEX_DIGITS,
                max: MAX_HEX_DIGITS,
                actual: digits.len(),
            });
        }

        // from_str_radix tolerates a leading sign, the path grammar does not.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHex(segment.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| TypeError::InvalidHex(segment.to_string()))
    }

    /// File name of the Key Record for this identifier: `0x<lowercase hex>.key`.
    pub fn record_name(&self) -> String {
        format!("{self}{RECORD_SUFFIX}")
    }

    /// Inverse of [`record_name`](Self::record_name). Returns `None` for any
    /// name that is not exactly the canonical record name of some identifier.
    pub fn from_record_name(name: &str) -> Option<Self> {
        let digits = name
            .strip_suffix(RECORD_SUFFIX)?
            .strip_prefix(HEX_PREFIX)?;
        if digits.is_empty() || digits.len() > MAX_HEX_DIGITS {
            return None;
        }
        if !digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let id = Self(u32::from_str_radix(digits, 16).ok()?);
        (id.record_name() == name).then_some(id)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HEX_PREFIX}{:x}", self.0)
    }
}

impl FromStr for KeyId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_segment(s)
    }
}

impl From<u32> for KeyId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
