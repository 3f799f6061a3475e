//! Public entry points: enroll, verify and export.
//!
//! Each call opens the blob, works on the plaintext state and, where the
//! state changed, reseals it under a fresh nonce. Calls are independent;
//! callers that share one blob must serialize their read-verify-write.

use data_encoding::BASE32_NOPAD;
use oath_core::{Aead, OtpType};

use crate::envelope;
use crate::error::OathError;
use crate::options::EnrollOptions;
use crate::otpauth;
use crate::state::SyncState;

/// Outcome of an accepted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Resealed state; replaces the caller's stored blob.
    pub blob: String,
    /// `true` only when this code performed the first synchronization.
    pub synchronized: bool,
}

/// Provisioning material surfaced by [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    /// `otpauth://` URI for authenticator apps.
    pub uri: String,
    /// The shared secret as unpadded base32.
    pub base32_key: String,
}

/// Create a new enrollment and return its sealed blob.
///
/// A random key sized to the hash digest is generated unless `options`
/// carries one.
///
/// # Errors
///
/// `OathError::Otp` for unusable parameters or a failing random source or
/// cipher, `OathError::Serialization` if the state cannot be encoded.
pub fn enroll(
    otp_type: OtpType,
    options: &EnrollOptions,
    cipher: &dyn Aead,
) -> Result<String, OathError> {
    let state = SyncState::enroll(otp_type, options)?;
    tracing::debug!(
        otp_type = %otp_type,
        hash = %state.hash(),
        digits = state.digits().value(),
        "enrolled"
    );
    envelope::seal(&state, cipher)
}

/// Verify `code` against `blob` using the system clock.
///
/// # Errors
///
/// See [`verify_at`].
pub fn verify(code: &str, blob: &str, cipher: &dyn Aead) -> Result<Verification, OathError> {
    verify_at(code, blob, cipher, unix_now())
}

/// Verify `code` against `blob` as of `now` (Unix seconds).
///
/// On rejection the caller's blob stays valid and unchanged.
///
/// # Errors
///
/// `OathError::InvalidBlob` or `OathError::InvalidOtpType` if the blob cannot
/// be opened, `OtpError::InvalidLength` for a code of the wrong length and
/// `OtpError::ValidationFailed` for a wrong, out-of-window or replayed code.
pub fn verify_at(
    code: &str,
    blob: &str,
    cipher: &dyn Aead,
    now: i64,
) -> Result<Verification, OathError> {
    let mut state = envelope::open(blob, cipher)?;
    let was_synchronized = state.is_synchronized();

    match state.verify_at(code, now) {
        Ok(deviation) => {
            let synchronized = !was_synchronized && state.is_synchronized();
            tracing::debug!(
                otp_type = %state.otp_type(),
                synchronized,
                deviation,
                "code accepted"
            );
            Ok(Verification {
                blob: envelope::seal(&state, cipher)?,
                synchronized,
            })
        }
        Err(e) => {
            tracing::debug!(otp_type = %state.otp_type(), "code rejected");
            Err(e.into())
        }
    }
}

/// Surface the secret of `blob` as a provisioning URI and a base32 key.
///
/// HOTP URIs carry the next expected counter. The blob is not modified.
///
/// # Errors
///
/// `OathError::InvalidBlob` or `OathError::InvalidOtpType` if the blob cannot
/// be opened, `OathError::Uri` if the URI cannot be built.
pub fn export(
    blob: &str,
    cipher: &dyn Aead,
    account: &str,
    issuer: &str,
) -> Result<Exported, OathError> {
    let state = envelope::open(blob, cipher)?;
    let algorithm = state.generator()?.export();
    let uri = otpauth::encode(
        &algorithm,
        account,
        issuer,
        state.counter().unwrap_or_default(),
    )?;
    Ok(Exported {
        uri,
        base32_key: BASE32_NOPAD.encode(algorithm.key.expose()),
    })
}

fn unix_now() -> i64 {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    i64::try_from(secs).unwrap_or(i64::MAX)
}
