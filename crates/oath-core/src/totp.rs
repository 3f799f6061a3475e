//! RFC 6238 TOTP adapter.
//!
//! Converts Unix timestamps into time steps and delegates to [`Hotp`].

use crate::error::OtpError;
use crate::export::{AlgorithmExport, OneTimePassword, OtpType, TimeStep};
use crate::hotp::{Hotp, HotpParams};
use crate::secret::SecretKey;
use crate::skew::SkewWindow;

/// Default TOTP period in seconds (RFC 6238 §4).
pub const DEFAULT_PERIOD: u32 = 30;

/// Immutable TOTP parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TotpParams {
    /// Digit count and hash choice shared with HOTP.
    pub hotp: HotpParams,
    /// Step length in seconds (default 30).
    pub period: u32,
    /// Unix time at which step 0 begins (default 0).
    pub t0: i64,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            hotp: HotpParams::default(),
            period: DEFAULT_PERIOD,
            t0: 0,
        }
    }
}

/// Time-based OTP generator.
#[derive(Clone, Debug)]
pub struct Totp {
    inner: Hotp,
    period: u32,
    t0: i64,
}

impl Totp {
    /// Build a generator over a private copy of `key`.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidParameter` if `period` is 0 or the key is empty.
    pub fn new(key: &SecretKey, params: TotpParams) -> Result<Self, OtpError> {
        if params.period == 0 {
            return Err(OtpError::InvalidParameter("period must be > 0".to_owned()));
        }
        Ok(Self {
            inner: Hotp::new(key, params.hotp)?,
            period: params.period,
            t0: params.t0,
        })
    }

    /// Step length in seconds.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Epoch offset in Unix seconds.
    #[must_use]
    pub const fn t0(&self) -> i64 {
        self.t0
    }

    /// T = (time - T0) / period, truncating toward zero (RFC 6238 §4).
    #[must_use]
    pub fn steps(&self, time: i64) -> i64 {
        time.saturating_sub(self.t0)
            .checked_div(i64::from(self.period))
            .unwrap_or(0)
    }
}

impl OneTimePassword for Totp {
    fn generate(&self, reference: i64) -> String {
        self.inner.generate(self.steps(reference))
    }

    /// Clocks drift both ways, so the window is `[steps - radius, steps + radius]`.
    /// The returned deviation is in seconds.
    fn validate(&self, code: &str, reference: i64, radius: u32) -> Result<i64, OtpError> {
        let deviation =
            self.inner
                .validate_in(code, self.steps(reference), SkewWindow::symmetric(radius))?;
        deviation
            .checked_mul(i64::from(self.period))
            .ok_or(OtpError::ValidationFailed)
    }

    fn export(&self) -> AlgorithmExport {
        AlgorithmExport {
            otp_type: OtpType::Totp,
            time_step: Some(TimeStep {
                period: self.period,
                t0: self.t0,
            }),
            ..self.inner.export()
        }
    }
}
