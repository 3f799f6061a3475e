//! Shared-secret key material.
//!
//! [`SecretKey`] wraps [`SecretSlice<u8>`] from the `secrecy` crate and adds:
//! - Masked `Debug` output (`SecretKey(***)`)
//! - Zeroization on drop (via `secrecy`'s built-in `Zeroize`)
//! - Deep copies on `Clone`, so a generator never aliases the caller's bytes

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretSlice};
use zeroize::Zeroize;

use crate::error::OtpError;

/// Variable-length HMAC key shared between server and authenticator.
pub struct SecretKey {
    inner: SecretSlice<u8>,
}

impl SecretKey {
    /// Copy `data` into a new secret allocation.
    ///
    /// The caller should zeroize the source data after calling this.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            inner: data.to_vec().into(),
        }
    }

    /// Create a key filled with `len` cryptographically random bytes.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Random` if the CSPRNG fails.
    pub fn random(len: usize) -> Result<Self, OtpError> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| OtpError::Random(format!("CSPRNG fill failed: {e}")))?;
        let key = Self::new(&bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Expose the raw key bytes. Keep the borrow short-lived.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Returns `true` if the key holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        crate::skew::constant_time_eq(self.expose(), other.expose())
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl From<&[u8]> for SecretKey {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}
