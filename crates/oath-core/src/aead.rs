//! Authenticated-encryption seam for sealing synchronization state.
//!
//! This module provides:
//! - [`Aead`]: the narrow `seal`/`open` contract the envelope layer needs
//! - [`RingCipher`]: AES-256-GCM or ChaCha20-Poly1305 via `ring::aead`
//!
//! Nonces are supplied by the caller. Ciphertext output is
//! `ciphertext || tag`; the tag length is fixed by the algorithm.

use ring::aead;
use zeroize::Zeroizing;

use crate::error::OtpError;

/// Nonce length for both supported algorithms in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Key length for both supported algorithms in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Caller-supplied authenticated encryption.
pub trait Aead: Send + Sync {
    /// Required nonce length in bytes.
    fn nonce_len(&self) -> usize;

    /// Encrypt and authenticate `plaintext` under `nonce`.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Encryption` if the nonce is malformed or sealing fails.
    fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, OtpError>;

    /// Authenticate and decrypt `ciphertext` sealed under `nonce`.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Decryption` on any authentication failure.
    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, OtpError>;
}

/// `ring`-backed AEAD cipher.
pub struct RingCipher {
    key: aead::LessSafeKey,
}

impl RingCipher {
    /// AES-256-GCM with a 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Encryption` if the key is not exactly 32 bytes.
    pub fn aes_256_gcm(key: &[u8]) -> Result<Self, OtpError> {
        Self::new(&aead::AES_256_GCM, key)
    }

    /// ChaCha20-Poly1305 with a 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Encryption` if the key is not exactly 32 bytes.
    pub fn chacha20_poly1305(key: &[u8]) -> Result<Self, OtpError> {
        Self::new(&aead::CHACHA20_POLY1305, key)
    }

    fn new(algorithm: &'static aead::Algorithm, key: &[u8]) -> Result<Self, OtpError> {
        if key.len() != KEY_LEN {
            return Err(OtpError::Encryption(format!(
                "invalid key length: {} bytes (expected {KEY_LEN})",
                key.len()
            )));
        }
        let unbound = aead::UnboundKey::new(algorithm, key)
            .map_err(|_| OtpError::Encryption("failed to create AEAD key".into()))?;
        Ok(Self {
            key: aead::LessSafeKey::new(unbound),
        })
    }
}

impl std::fmt::Debug for RingCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingCipher")
            .field("algorithm", self.key.algorithm())
            .finish_non_exhaustive()
    }
}

impl Aead for RingCipher {
    fn nonce_len(&self) -> usize {
        self.key.algorithm().nonce_len()
    }

    fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, OtpError> {
        let nonce = aead::Nonce::try_assume_unique_for_key(nonce)
            .map_err(|_| OtpError::Encryption(format!("nonce must be {NONCE_LEN} bytes")))?;

        // Encrypt in place; plaintext buffer becomes ciphertext || tag.
        let mut in_out = Zeroizing::new(plaintext.to_vec());
        self.key
            .seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut *in_out)
            .map_err(|_| OtpError::Encryption("AEAD sealing failed".into()))?;
        Ok(std::mem::take(&mut *in_out))
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, OtpError> {
        let nonce =
            aead::Nonce::try_assume_unique_for_key(nonce).map_err(|_| OtpError::Decryption)?;

        let mut in_out = Zeroizing::new(ciphertext.to_vec());
        let plaintext_len = self
            .key
            .open_in_place(nonce, aead::Aad::empty(), &mut *in_out)
            .map_err(|_| OtpError::Decryption)?
            .len();
        in_out.truncate(plaintext_len);
        Ok(in_out)
    }
}
