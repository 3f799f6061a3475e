//! Algorithm configuration export and the common generator interface.

use std::fmt;

use crate::digits::Digits;
use crate::error::OtpError;
use crate::hash::HashAlgorithm;
use crate::secret::SecretKey;

/// OTP flavour: counter-based (RFC 4226) or time-based (RFC 6238).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OtpType {
    /// HMAC-based OTP keyed by a monotonically advancing counter.
    Hotp,
    /// Time-based OTP keyed by elapsed time steps since an epoch.
    Totp,
}

impl OtpType {
    /// Lower-case tag: `"hotp"` or `"totp"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hotp => "hotp",
            Self::Totp => "totp",
        }
    }

    /// Parse the lower-case tag. Returns `None` for anything else.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hotp" => Some(Self::Hotp),
            "totp" => Some(Self::Totp),
            _ => None,
        }
    }
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-step parameters of a TOTP generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeStep {
    /// Step length in seconds.
    pub period: u32,
    /// Unix time at which step 0 begins.
    pub t0: i64,
}

/// Plain-data snapshot of a generator's configuration.
///
/// Consumed by provisioning-URI encoders; carries everything needed to
/// rebuild an equivalent generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmExport {
    /// `hotp` or `totp`.
    pub otp_type: OtpType,
    /// HMAC hash choice.
    pub hash: HashAlgorithm,
    /// Code length.
    pub digits: Digits,
    /// Copy of the shared secret.
    pub key: SecretKey,
    /// Present for TOTP only.
    pub time_step: Option<TimeStep>,
}

/// Common interface of the HOTP generator and the TOTP adapter.
pub trait OneTimePassword: Send + Sync {
    /// Code for `reference` (a counter for HOTP, Unix seconds for TOTP).
    fn generate(&self, reference: i64) -> String;

    /// Validate `code` within `radius` of `reference`.
    ///
    /// Returns the deviation of the accepted candidate, expressed in the
    /// reference's native unit (counter steps or seconds).
    ///
    /// # Errors
    ///
    /// `OtpError::InvalidLength` if the trimmed code has the wrong length,
    /// `OtpError::ValidationFailed` if no candidate matches.
    fn validate(&self, code: &str, reference: i64, radius: u32) -> Result<i64, OtpError>;

    /// Export the generator configuration.
    fn export(&self) -> AlgorithmExport;
}
