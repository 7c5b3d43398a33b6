//! Transponder (squawk) code value type.
//!
//! A squawk code is exactly four octal digits (`0`-`7`). [`SquawkCode`] can
//! only be built through validation, so any value of this type handed to a
//! caller is well-formed.
//!
//! ```rust
//! use neo_ccams::SquawkCode;
//!
//! let code: SquawkCode = "4321".parse().unwrap();
//! assert_eq!(code, "4321");
//! assert!(code.is_assignable());
//!
//! assert!("4381".parse::<SquawkCode>().is_err()); // 8 is not octal
//! assert!("123".parse::<SquawkCode>().is_err());
//! ```
//!
//! # Reserved Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | [`UNASSIGNED_SQUAWK`] `0000` | No code assigned; never returned as an assignment |
//! | [`VFR_SQUAWK`] `7000` | Conspicuity code for VFR flights |
//! | [`MODE_S_SQUAWK`] `1000` | Mode-S conspicuity code in participating airspace |

use core::fmt;
use core::str::FromStr;

use heapless::String as HString;

/// Number of digits in a squawk code.
pub const SQUAWK_LEN: usize = 4;

/// Placeholder for "no code assigned".
pub const UNASSIGNED_SQUAWK: &str = "0000";

/// Fixed code for VFR traffic.
pub const VFR_SQUAWK: &str = "7000";

/// Fixed code for Mode-S equipped traffic inside the Mode-S region.
pub const MODE_S_SQUAWK: &str = "1000";

/// Reasons a string is not a squawk code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SquawkCodeError {
    /// Input was not exactly four characters long.
    #[error("squawk code must be {SQUAWK_LEN} digits, got {0} characters")]
    Length(usize),
    /// Input contained a character outside `0`-`7`.
    #[error("squawk code contains non-octal character {0:?}")]
    NonOctal(char),
    /// Input was `0000`, which is not an assignable code.
    #[error("squawk code 0000 is reserved for unassigned transponders")]
    Unassigned,
}

/// A validated 4-digit octal transponder code.
///
/// Stored inline (no heap allocation). Comparable against `&str` for
/// convenience in tests and roster scans.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SquawkCode(HString<SQUAWK_LEN>);

impl SquawkCode {
    /// Validate and wrap a code. Accepts `0000` (a roster may legitimately
    /// report it); use [`SquawkCode::parse_assignable`] for codes that are
    /// about to be handed out.
    pub fn parse(s: &str) -> Result<Self, SquawkCodeError> {
        let len = s.chars().count();
        if len != SQUAWK_LEN {
            return Err(SquawkCodeError::Length(len));
        }
        let mut inner = HString::new();
        for c in s.chars() {
            if !matches!(c, '0'..='7') {
                return Err(SquawkCodeError::NonOctal(c));
            }
            // Cannot overflow: length was checked above and every char is ASCII.
            let _ = inner.push(c);
        }
        Ok(Self(inner))
    }

    /// Like [`SquawkCode::parse`], but rejects the unassigned code `0000`.
    pub fn parse_assignable(s: &str) -> Result<Self, SquawkCodeError> {
        let code = Self::parse(s)?;
        if code.is_unassigned() {
            return Err(SquawkCodeError::Unassigned);
        }
        Ok(code)
    }

    /// Build a code from four octal digit values.
    ///
    /// Returns `None` if any digit is greater than 7.
    pub fn from_digits(digits: [u8; SQUAWK_LEN]) -> Option<Self> {
        let mut inner = HString::new();
        for d in digits {
            if d > 7 {
                return None;
            }
            let _ = inner.push(char::from(b'0' + d));
        }
        Some(Self(inner))
    }

    /// The VFR conspicuity code `7000`.
    pub fn vfr() -> Self {
        Self::from_static(VFR_SQUAWK)
    }

    /// The Mode-S conspicuity code `1000`.
    pub fn mode_s() -> Self {
        Self::from_static(MODE_S_SQUAWK)
    }

    fn from_static(s: &'static str) -> Self {
        let mut inner = HString::new();
        let _ = inner.push_str(s);
        Self(inner)
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `true` for `0000`.
    pub fn is_unassigned(&self) -> bool {
        self.as_str() == UNASSIGNED_SQUAWK
    }

    /// `true` for codes that are never counted as collisions:
    /// `0000`, the VFR code and the Mode-S code.
    pub fn is_conspicuity(&self) -> bool {
        matches!(self.as_str(), UNASSIGNED_SQUAWK | VFR_SQUAWK | MODE_S_SQUAWK)
    }

    /// `true` unless the code is `0000`.
    pub fn is_assignable(&self) -> bool {
        !self.is_unassigned()
    }
}

impl FromStr for SquawkCode {
    type Err = SquawkCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SquawkCode {
    type Error = SquawkCodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for SquawkCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SquawkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SquawkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SquawkCode({})", self.as_str())
    }
}

impl PartialEq<str> for SquawkCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SquawkCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SquawkCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
