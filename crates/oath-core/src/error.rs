//! Error types for `oath-core`.

use thiserror::Error;

/// Errors produced by OTP generation, validation and AEAD sealing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// Submitted code length differs from the configured digit count.
    ///
    /// Carries the offending (trimmed) length.
    #[error("invalid length: {0}")]
    InvalidLength(usize),

    /// No candidate in the tolerance window matched, or the code was replayed.
    #[error("otp invalid")]
    ValidationFailed,

    /// Rejected configuration value (zero period, digit count out of range, empty key).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// AEAD key setup or sealing failure.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authentication tag verification failed: ciphertext tampered or wrong key.
    #[error("decryption failed: authentication tag mismatch")]
    Decryption,

    /// The operating-system CSPRNG could not be read.
    #[error("random source failure: {0}")]
    Random(String),
}
