//! Enrollment options: an immutable configuration value.
//!
//! Built once, either in code through the consuming `with_*` methods or
//! from a JSON document, then passed by value into [`crate::enroll`].
//! All fields have RFC defaults via [`Default`]. The shared secret is
//! never read from or written to configuration files.

use std::fs;
use std::path::Path;

use oath_core::{Digits, HashAlgorithm, SecretKey, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};

use crate::error::OathError;

/// Parameters for a new enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollOptions {
    /// HMAC hash choice. Also sizes the random key.
    #[serde(default)]
    hash: HashAlgorithm,

    /// Code length.
    #[serde(default)]
    digits: Digits,

    /// TOTP step length in seconds.
    #[serde(default = "default_period")]
    period: u32,

    /// TOTP epoch offset in Unix seconds.
    #[serde(default)]
    t0: i64,

    /// Initial HOTP counter.
    #[serde(default)]
    counter: i64,

    /// Tolerance radius before the first successful verification.
    #[serde(default)]
    initial_skew: u32,

    /// Tolerance radius after the first successful verification.
    #[serde(default)]
    work_skew: u32,

    #[serde(skip)]
    key: Option<SecretKey>,
}

const fn default_period() -> u32 {
    DEFAULT_PERIOD
}

impl Default for EnrollOptions {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            digits: Digits::default(),
            period: default_period(),
            t0: 0,
            counter: 0,
            initial_skew: 0,
            work_skew: 0,
            key: None,
        }
    }
}

impl EnrollOptions {
    /// Parse options from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `OathError::Config` on malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, OathError> {
        serde_json::from_str(json).map_err(|e| OathError::Config(e.to_string()))
    }

    /// Load options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `OathError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, OathError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| OathError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&contents)
    }

    /// Use `hash` for code generation.
    #[must_use]
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Use `digits` for the code length.
    #[must_use]
    pub fn with_digits(mut self, digits: Digits) -> Self {
        self.digits = digits;
        self
    }

    /// TOTP step length in seconds. Zero is rejected at enrollment.
    #[must_use]
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// TOTP epoch offset.
    #[must_use]
    pub fn with_t0(mut self, t0: i64) -> Self {
        self.t0 = t0;
        self
    }

    /// Initial HOTP counter.
    #[must_use]
    pub fn with_counter(mut self, counter: i64) -> Self {
        self.counter = counter;
        self
    }

    /// Use a copy of `key` instead of generating a random one.
    ///
    /// An empty key is ignored.
    #[must_use]
    pub fn with_key(mut self, key: &[u8]) -> Self {
        if !key.is_empty() {
            self.key = Some(SecretKey::new(key));
        }
        self
    }

    /// Tolerance radius before the first successful verification.
    #[must_use]
    pub fn with_initial_skew(mut self, skew: u32) -> Self {
        self.initial_skew = skew;
        self
    }

    /// Tolerance radius after the first successful verification.
    #[must_use]
    pub fn with_work_skew(mut self, skew: u32) -> Self {
        self.work_skew = skew;
        self
    }

    /// HMAC hash choice.
    #[must_use]
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// Code length.
    #[must_use]
    pub const fn digits(&self) -> Digits {
        self.digits
    }

    /// TOTP step length in seconds.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// TOTP epoch offset.
    #[must_use]
    pub const fn t0(&self) -> i64 {
        self.t0
    }

    /// Initial HOTP counter.
    #[must_use]
    pub const fn counter(&self) -> i64 {
        self.counter
    }

    /// Tolerance radius before the first successful verification.
    #[must_use]
    pub const fn initial_skew(&self) -> u32 {
        self.initial_skew
    }

    /// Tolerance radius after the first successful verification.
    #[must_use]
    pub const fn work_skew(&self) -> u32 {
        self.work_skew
    }

    /// Caller-supplied key, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&SecretKey> {
        self.key.as_ref()
    }

    /// Take the supplied key, or generate one sized to the hash digest.
    pub(crate) fn resolve_key(&self) -> Result<SecretKey, OathError> {
        match &self.key {
            Some(key) => Ok(key.clone()),
            None => Ok(SecretKey::random(self.hash.digest_len())?),
        }
    }
}
