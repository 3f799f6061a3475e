//! RFC 4226 HOTP generation engine.
//!
//! Provides standards-compliant counter-based one-time passwords using
//! `ring::hmac` for HMAC-SHA1, HMAC-SHA256, and HMAC-SHA512.

use crate::digits::Digits;
use crate::error::OtpError;
use crate::export::{AlgorithmExport, OneTimePassword, OtpType};
use crate::hash::HashAlgorithm;
use crate::secret::SecretKey;
use crate::skew::{validate_code, SkewWindow};

/// Dynamic Truncation (RFC 4226 §5.3).
///
/// Takes the low 4 bits of the last digest byte as an offset, reads the
/// 31-bit big-endian integer at that offset and formats it with `digits`.
///
/// # Panics
///
/// Panics if `digest` is shorter than 20 bytes (the SHA-1 digest size).
/// Every supported hash produces at least that much.
#[must_use]
pub fn truncate(digits: Digits, digest: &[u8]) -> String {
    // offset = low-order 4 bits of last byte.
    let offset = usize::from(digest[digest.len().wrapping_sub(1)] & 0x0F);

    // Extract 4 bytes starting at offset, mask high bit (0x7FFFFFFF).
    let binary_code = u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset.wrapping_add(1)],
        digest[offset.wrapping_add(2)],
        digest[offset.wrapping_add(3)],
    ]);

    digits.format(binary_code)
}

/// Immutable HOTP parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HotpParams {
    /// Code length (default 6).
    pub digits: Digits,
    /// HMAC hash (default SHA1).
    pub hash: HashAlgorithm,
}

/// Counter-based OTP generator.
#[derive(Clone, Debug)]
pub struct Hotp {
    key: SecretKey,
    params: HotpParams,
}

impl Hotp {
    /// Build a generator over a private copy of `key`.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidParameter` if the key is empty.
    pub fn new(key: &SecretKey, params: HotpParams) -> Result<Self, OtpError> {
        if key.is_empty() {
            return Err(OtpError::InvalidParameter(
                "secret must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            key: key.clone(),
            params,
        })
    }

    /// Code length.
    #[must_use]
    pub const fn digits(&self) -> Digits {
        self.params.digits
    }

    /// HMAC hash choice.
    #[must_use]
    pub const fn hash(&self) -> HashAlgorithm {
        self.params.hash
    }

    /// Validate within an arbitrary window. Shared with the TOTP adapter.
    pub(crate) fn validate_in(
        &self,
        code: &str,
        reference: i64,
        window: SkewWindow,
    ) -> Result<i64, OtpError> {
        validate_code(code, self.params.digits, reference, window, |candidate| {
            self.generate(candidate)
        })
    }
}

impl OneTimePassword for Hotp {
    /// HMAC(K, C) where C is the reference as 8-byte big-endian (RFC 4226 §5.2).
    fn generate(&self, reference: i64) -> String {
        let tag = self
            .params
            .hash
            .sign(self.key.expose(), &reference.to_be_bytes());
        truncate(self.params.digits, tag.as_ref())
    }

    /// Counters only advance, so the window is `[reference, reference + radius]`.
    fn validate(&self, code: &str, reference: i64, radius: u32) -> Result<i64, OtpError> {
        self.validate_in(code, reference, SkewWindow::forward(radius))
    }

    fn export(&self) -> AlgorithmExport {
        AlgorithmExport {
            otp_type: OtpType::Hotp,
            hash: self.params.hash,
            digits: self.params.digits,
            key: self.key.clone(),
            time_step: None,
        }
    }
}
