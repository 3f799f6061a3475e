//! Fixed-width decimal formatting of truncated OTP values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OtpError;

/// Smallest supported code length.
pub const MIN_DIGITS: u8 = 1;

/// Largest supported code length. A 31-bit truncated value has at most 10 decimal digits.
pub const MAX_DIGITS: u8 = 10;

/// Default code length (RFC 4226 §5.3).
pub const DEFAULT_DIGITS: u8 = 6;

/// Number of decimal digits in an OTP code (1..=10).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digits(u8);

impl Digits {
    /// Validate a digit count.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidParameter` unless `1 <= value <= 10`.
    pub fn new(value: u8) -> Result<Self, OtpError> {
        if (MIN_DIGITS..=MAX_DIGITS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OtpError::InvalidParameter(format!(
                "digits must be between {MIN_DIGITS} and {MAX_DIGITS}, got {value}"
            )))
        }
    }

    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Return the code length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        usize::from(self.0)
    }

    /// Always `false`; a zero-width code cannot be constructed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Return the modulus value (10^digits) for truncation.
    #[must_use]
    pub const fn modulus(self) -> u64 {
        // digits <= 10, so 10^digits fits comfortably in u64.
        10u64.pow(self.0 as u32)
    }

    /// Reduce `value` modulo 10^digits and left-pad it with zeros.
    #[must_use]
    pub fn format(self, value: u32) -> String {
        let code = u64::from(value).checked_rem(self.modulus()).unwrap_or(0);
        let width = self.len();
        format!("{code:0>width$}")
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self(DEFAULT_DIGITS)
    }
}

impl TryFrom<u8> for Digits {
    type Error = OtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.0
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
