//! Synchronization state for one enrolled factor.
//!
//! [`SyncState`] is the plaintext of a blob: key material, algorithm
//! parameters, measured drift, the two-phase skew tolerance and the
//! replay history. [`SyncState::verify_at`] is the state machine; it
//! mutates the state only when a code is accepted.
//!
//! [`StateRecord`] is the serialized form. Zero-valued fields are omitted
//! on write and take their defaults on read.

use std::collections::VecDeque;

use data_encoding::BASE64;
use oath_core::{
    Digits, HashAlgorithm, Hotp, HotpParams, OneTimePassword, OtpError, OtpType, SecretKey,
    Totp, TotpParams, DEFAULT_PERIOD, MAX_SKEW,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::OathError;
use crate::options::EnrollOptions;

// ── Types ───────────────────────────────────────────────────────────

/// Variant-specific part of the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpKind {
    /// Counter-based factor.
    Hotp {
        /// Next expected counter value.
        counter: i64,
    },
    /// Time-based factor.
    Totp {
        /// Step length in seconds.
        period: u32,
        /// Unix time at which step 0 begins.
        t0: i64,
    },
}

impl OtpKind {
    /// The type tag for this variant.
    #[must_use]
    pub const fn otp_type(self) -> OtpType {
        match self {
            Self::Hotp { .. } => OtpType::Hotp,
            Self::Totp { .. } => OtpType::Totp,
        }
    }
}

/// Mutable synchronization record of one enrollment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncState {
    key: SecretKey,
    hash: HashAlgorithm,
    digits: Digits,
    kind: OtpKind,
    deviation: i64,
    synchronized: bool,
    initial_skew: u32,
    work_skew: u32,
    last_verified: VecDeque<String>,
}

/// Changes to apply once a code has been accepted.
struct Accepted {
    deviation: i64,
    kind: OtpKind,
}

impl SyncState {
    /// Fresh, unsynchronized state for a new enrollment.
    ///
    /// # Errors
    ///
    /// Returns `OathError::Otp` if the options describe an unusable
    /// generator (zero period, a skew above `MAX_SKEW`) or the random key
    /// cannot be generated.
    pub fn enroll(otp_type: OtpType, options: &EnrollOptions) -> Result<Self, OathError> {
        if options.initial_skew() > MAX_SKEW || options.work_skew() > MAX_SKEW {
            return Err(OtpError::InvalidParameter(format!("skew must be <= {MAX_SKEW}")).into());
        }
        let kind = match otp_type {
            OtpType::Hotp => OtpKind::Hotp {
                counter: options.counter(),
            },
            OtpType::Totp => OtpKind::Totp {
                period: options.period(),
                t0: options.t0(),
            },
        };
        let state = Self {
            key: options.resolve_key()?,
            hash: options.hash(),
            digits: options.digits(),
            kind,
            deviation: 0,
            synchronized: false,
            initial_skew: options.initial_skew(),
            work_skew: options.work_skew(),
            last_verified: VecDeque::new(),
        };
        // Reject unusable parameters up front rather than at first verification.
        state.generator()?;
        Ok(state)
    }

    /// Shared secret.
    #[must_use]
    pub const fn key(&self) -> &SecretKey {
        &self.key
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

    /// Variant-specific parameters.
    #[must_use]
    pub const fn kind(&self) -> OtpKind {
        self.kind
    }

    /// `hotp` or `totp`.
    #[must_use]
    pub const fn otp_type(&self) -> OtpType {
        self.kind.otp_type()
    }

    /// Next expected counter (HOTP only).
    #[must_use]
    pub const fn counter(&self) -> Option<i64> {
        match self.kind {
            OtpKind::Hotp { counter } => Some(counter),
            OtpKind::Totp { .. } => None,
        }
    }

    /// Measured drift: counter steps of the last accepted HOTP code, or the
    /// accumulated clock offset in seconds for TOTP.
    #[must_use]
    pub const fn deviation(&self) -> i64 {
        self.deviation
    }

    /// `true` once any code has been accepted. Never reverts.
    #[must_use]
    pub const fn is_synchronized(&self) -> bool {
        self.synchronized
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

    /// The radius currently in force.
    #[must_use]
    pub const fn active_skew(&self) -> u32 {
        if self.synchronized {
            self.work_skew
        } else {
            self.initial_skew
        }
    }

    /// Recently accepted codes, oldest first.
    #[must_use]
    pub const fn last_verified(&self) -> &VecDeque<String> {
        &self.last_verified
    }

    /// Replay-history capacity for the active radius.
    ///
    /// HOTP keeps `radius` codes (at least one), TOTP keeps `2 * radius + 1`.
    #[must_use]
    pub fn history_capacity(&self) -> usize {
        let radius = usize::try_from(self.active_skew()).unwrap_or(usize::MAX);
        match self.kind {
            OtpKind::Hotp { .. } => radius.max(1),
            OtpKind::Totp { .. } => radius.saturating_mul(2).saturating_add(1),
        }
    }

    /// Build the generator described by this state.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidParameter` for an empty key or zero period.
    pub fn generator(&self) -> Result<Box<dyn OneTimePassword>, OtpError> {
        let hotp = HotpParams {
            digits: self.digits,
            hash: self.hash,
        };
        Ok(match self.kind {
            OtpKind::Hotp { .. } => Box::new(Hotp::new(&self.key, hotp)?),
            OtpKind::Totp { period, t0 } => {
                Box::new(Totp::new(&self.key, TotpParams { hotp, period, t0 })?)
            }
        })
    }

    /// Verify `code` and, on acceptance, advance the state.
    ///
    /// `now` is the current Unix time in seconds; HOTP ignores it.
    /// Returns the deviation of the accepted candidate from the window
    /// center. On any error the state is left untouched.
    ///
    /// # Errors
    ///
    /// `OtpError::InvalidLength` for a code of the wrong length,
    /// `OtpError::ValidationFailed` for a wrong, out-of-window or replayed code.
    pub fn verify_at(&mut self, code: &str, now: i64) -> Result<i64, OtpError> {
        let code = code.trim();

        // Replays surface exactly like a wrong code.
        if self.last_verified.iter().any(|seen| seen == code) {
            return Err(OtpError::ValidationFailed);
        }

        let radius = self.active_skew();
        let generator = self.generator()?;

        let (window_deviation, accepted) = match self.kind {
            OtpKind::Hotp { counter } => {
                // The counter already absorbs past drift, so the window starts there.
                let deviation = generator.validate(code, counter, radius)?;
                let next = counter
                    .checked_add(deviation)
                    .and_then(|c| c.checked_add(1))
                    .ok_or(OtpError::ValidationFailed)?;
                (
                    deviation,
                    Accepted {
                        deviation,
                        kind: OtpKind::Hotp { counter: next },
                    },
                )
            }
            OtpKind::Totp { .. } => {
                let reference = now.saturating_add(self.deviation);
                let deviation = generator.validate(code, reference, radius)?;
                let total = self
                    .deviation
                    .checked_add(deviation)
                    .ok_or(OtpError::ValidationFailed)?;
                (
                    deviation,
                    Accepted {
                        deviation: total,
                        kind: self.kind,
                    },
                )
            }
        };

        self.commit(code, accepted);
        Ok(window_deviation)
    }

    fn commit(&mut self, code: &str, accepted: Accepted) {
        self.deviation = accepted.deviation;
        self.kind = accepted.kind;
        self.synchronized = true;

        // Capacity follows the post-sync radius.
        let capacity = self.history_capacity();
        while self.last_verified.len() >= capacity {
            if self.last_verified.pop_front().is_none() {
                break;
            }
        }
        self.last_verified.push_back(code.to_owned());
    }
}

// ── Serialized form ─────────────────────────────────────────────────

/// Forward-compatible key-value encoding of [`SyncState`].
#[derive(Serialize, Deserialize)]
pub(crate) struct StateRecord {
    #[serde(with = "base64_key")]
    key: Zeroizing<Vec<u8>>,
    #[serde(default)]
    algorithm: HashAlgorithm,
    #[serde(rename = "type")]
    otp_type: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    period: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    counter: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    digits: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    t0: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    deviation: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    synchronized: bool,
    #[serde(default, rename = "skew", skip_serializing_if = "is_zero")]
    work_skew: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    initial_skew: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    last_verified: Vec<String>,
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl From<&SyncState> for StateRecord {
    fn from(state: &SyncState) -> Self {
        let (counter, period, t0) = match state.kind {
            OtpKind::Hotp { counter } => (counter, 0, 0),
            OtpKind::Totp { period, t0 } => (0, period, t0),
        };
        Self {
            key: Zeroizing::new(state.key.expose().to_vec()),
            algorithm: state.hash,
            otp_type: state.otp_type().as_str().to_owned(),
            period,
            counter,
            digits: state.digits.value(),
            t0,
            deviation: state.deviation,
            synchronized: state.synchronized,
            work_skew: state.work_skew,
            initial_skew: state.initial_skew,
            last_verified: state.last_verified.iter().cloned().collect(),
        }
    }
}

impl TryFrom<StateRecord> for SyncState {
    type Error = OathError;

    fn try_from(record: StateRecord) -> Result<Self, Self::Error> {
        let kind = match OtpType::from_tag(&record.otp_type) {
            Some(OtpType::Hotp) => OtpKind::Hotp {
                counter: record.counter,
            },
            Some(OtpType::Totp) => OtpKind::Totp {
                period: if record.period == 0 {
                    DEFAULT_PERIOD
                } else {
                    record.period
                },
                t0: record.t0,
            },
            None => return Err(OathError::InvalidOtpType(record.otp_type)),
        };
        if record.key.is_empty()
            || record.initial_skew > MAX_SKEW
            || record.work_skew > MAX_SKEW
        {
            return Err(OathError::InvalidBlob);
        }
        let digits = if record.digits == 0 {
            Digits::default()
        } else {
            Digits::new(record.digits).map_err(|_| OathError::InvalidBlob)?
        };
        Ok(Self {
            key: SecretKey::new(&record.key),
            hash: record.algorithm,
            digits,
            kind,
            deviation: record.deviation,
            synchronized: record.synchronized,
            initial_skew: record.initial_skew,
            work_skew: record.work_skew,
            last_verified: record.last_verified.into_iter().collect(),
        })
    }
}

/// Padded standard base64 for the key bytes.
mod base64_key {
    use super::BASE64;
    use serde::{Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S: Serializer>(key: &Zeroizing<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        let encoded = Zeroizing::new(BASE64.encode(key));
        s.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Zeroizing<Vec<u8>>, D::Error> {
        let encoded = Zeroizing::new(String::deserialize(d)?);
        BASE64
            .decode(encoded.as_bytes())
            .map(Zeroizing::new)
            .map_err(serde::de::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
