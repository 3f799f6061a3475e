//! Encrypted blob envelope.
//!
//! Wire form: `$<nonce>$<ciphertext>`, both segments base64 without
//! padding. The ciphertext is the AEAD sealing of the JSON-encoded
//! [`StateRecord`]. Every `open` failure collapses into
//! `OathError::InvalidBlob`; the failing stage is logged, never the data.

use data_encoding::BASE64_NOPAD;
use oath_core::{Aead, OtpError};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::OathError;
use crate::state::{StateRecord, SyncState};

/// Segment separator and leading marker.
const SEPARATOR: char = '$';

/// Serialize, seal and encode `state` under a fresh random nonce.
///
/// # Errors
///
/// Returns `OathError::Serialization` if encoding fails, or `OathError::Otp`
/// if the random source or the cipher fails.
pub fn seal(state: &SyncState, cipher: &dyn Aead) -> Result<String, OathError> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(&StateRecord::from(state))
            .map_err(|e| OathError::Serialization(e.to_string()))?,
    );

    let mut nonce = vec![0u8; cipher.nonce_len()];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| OtpError::Random(format!("nonce generation failed: {e}")))?;

    let ciphertext = cipher.seal(&nonce, &plaintext)?;

    Ok(format!(
        "{SEPARATOR}{}{SEPARATOR}{}",
        BASE64_NOPAD.encode(&nonce),
        BASE64_NOPAD.encode(&ciphertext)
    ))
}

/// Decode, authenticate and deserialize a blob.
///
/// # Errors
///
/// Returns `OathError::InvalidBlob` on any framing, decoding, authentication
/// or parse failure, and `OathError::InvalidOtpType` if the record names an
/// unknown generator type.
pub fn open(blob: &str, cipher: &dyn Aead) -> Result<SyncState, OathError> {
    let mut parts = blob.split(SEPARATOR);
    let (Some(""), Some(nonce), Some(ciphertext), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::warn!(stage = "format", "blob rejected");
        return Err(OathError::InvalidBlob);
    };

    let nonce = BASE64_NOPAD.decode(nonce.as_bytes()).map_err(|_| {
        tracing::warn!(stage = "decode", "blob rejected");
        OathError::InvalidBlob
    })?;
    let ciphertext = BASE64_NOPAD.decode(ciphertext.as_bytes()).map_err(|_| {
        tracing::warn!(stage = "decode", "blob rejected");
        OathError::InvalidBlob
    })?;

    let plaintext = cipher.open(&nonce, &ciphertext).map_err(|_| {
        tracing::warn!(stage = "authenticate", "blob rejected");
        OathError::InvalidBlob
    })?;

    let record: StateRecord = serde_json::from_slice(&plaintext).map_err(|_| {
        tracing::warn!(stage = "parse", "blob rejected");
        OathError::InvalidBlob
    })?;

    SyncState::try_from(record).inspect_err(|e| {
        tracing::warn!(stage = "parse", error = %e, "blob rejected");
    })
}
