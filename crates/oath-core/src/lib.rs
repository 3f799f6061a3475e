//! `oath-core`: HOTP/TOTP primitives for drift-tolerant OTP verification.
//!
//! Pure computation: zero I/O, zero logging. The stateful, encrypted
//! enrollment record lives in `oath-blob`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod secret;

pub mod digits;
pub mod hash;

pub mod hotp;
pub mod skew;
pub mod totp;

pub mod export;

pub mod aead;

pub use aead::{Aead, RingCipher};
pub use digits::{Digits, DEFAULT_DIGITS, MAX_DIGITS, MIN_DIGITS};
pub use error::OtpError;
pub use export::{AlgorithmExport, OneTimePassword, OtpType, TimeStep};
pub use hash::HashAlgorithm;
pub use hotp::{truncate, Hotp, HotpParams};
pub use secret::SecretKey;
pub use skew::{validate_code, validate_window, SkewWindow, MAX_SKEW};
pub use totp::{Totp, TotpParams, DEFAULT_PERIOD};
