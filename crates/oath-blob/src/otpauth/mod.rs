//! `otpauth://` provisioning URIs (Google Key URI format).
//!
//! - [`encode`] builds a URI from an [`oath_core::AlgorithmExport`]
//! - [`decode`] parses a URI into [`AlgorithmParameters`]

mod decoder;
mod encoder;

use thiserror::Error;

pub use decoder::{decode, AlgorithmParameters};
pub use encoder::encode;

/// URI scheme of provisioning URIs.
pub const SCHEME: &str = "otpauth";

/// Errors produced while encoding or decoding a provisioning URI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    /// Not an `otpauth` URI, or not a URI at all.
    #[error("unsupported uri scheme: {0}")]
    UnsupportedScheme(String),

    /// The URI host is neither `hotp` nor `totp`.
    #[error("unsupported otp type: {0}")]
    UnsupportedOtpType(String),

    /// The `secret` parameter is missing or not valid base32.
    #[error("invalid secret encoding")]
    InvalidSecretEncoding,

    /// The `algorithm` parameter names an unsupported hash.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// The `digits` parameter is not a number in 1..=10.
    #[error("invalid digits: {0}")]
    InvalidDigits(String),

    /// The `period` parameter is not a positive number of seconds.
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// A `hotp` URI without a usable `counter` parameter.
    #[error("no counter present")]
    NoCounterPresent,

    /// The label could not be percent-decoded, or the URI could not be built.
    #[error("malformed uri: {0}")]
    Malformed(String),
}
