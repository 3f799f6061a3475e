//! Error types for `oath-blob`.

use oath_core::OtpError;
use thiserror::Error;

use crate::otpauth::UriError;

/// Errors produced by enrollment, verification and export.
#[derive(Debug, Error)]
pub enum OathError {
    /// OTP primitive failure (delegated from `oath-core`).
    ///
    /// Covers `InvalidLength` and `ValidationFailed`; a replayed code
    /// surfaces as `ValidationFailed`, indistinguishable from a wrong one.
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// Malformed, undecodable, unauthenticated or unparseable blob.
    ///
    /// The failing stage is not exposed.
    #[error("invalid blob")]
    InvalidBlob,

    /// Unrecognized OTP type tag.
    #[error("invalid otp type: {0}")]
    InvalidOtpType(String),

    /// Provisioning-URI encoding or decoding failure.
    #[error(transparent)]
    Uri(#[from] UriError),

    /// Enrollment options could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Synchronization state could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl OathError {
    /// `true` for a rejected code (wrong, out of window or replayed).
    #[must_use]
    pub const fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Otp(OtpError::ValidationFailed))
    }
}
