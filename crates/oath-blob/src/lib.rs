//! `oath-blob`: encrypted, drift-tolerant OTP enrollment state.
//!
//! An enrollment lives entirely in an opaque, authenticated blob that the
//! caller stores. [`verify`] opens it, checks a submitted code against the
//! HOTP/TOTP primitives of `oath-core`, tracks clock or counter drift,
//! rejects replays and returns the resealed blob.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod options;

pub mod envelope;
pub mod state;

pub mod otpauth;

pub mod verify;

pub use error::OathError;
pub use options::EnrollOptions;
pub use otpauth::{AlgorithmParameters, UriError};
pub use state::{OtpKind, SyncState};
pub use verify::{enroll, export, verify, verify_at, Exported, Verification};

pub use oath_core::{Aead, OtpType, RingCipher};
