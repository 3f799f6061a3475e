//! Skew-window validation.
//!
//! A [`SkewWindow`] describes which candidate reference values around an
//! expected reference are accepted. [`validate_window`] evaluates every
//! candidate in parallel, collects all outcomes in window order and only
//! then decides, so the amount of work does not depend on which candidate
//! (if any) matched.

use std::ops::RangeInclusive;

use rayon::prelude::*;

use crate::digits::Digits;
use crate::error::OtpError;

/// Largest accepted tolerance radius, in counter or time steps.
pub const MAX_SKEW: u32 = 1_000;

/// Constant-time byte comparison for OTP codes.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Uses bitwise OR accumulation to avoid short-circuit timing leaks.
///
/// The early return on length mismatch is acceptable because code length
/// is public; the constant-time property protects the code value.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Tolerance window around a reference value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkewWindow {
    behind: u32,
    ahead: u32,
}

impl SkewWindow {
    /// Counter mode: `[reference, reference + radius]`. Counters only advance.
    #[must_use]
    pub const fn forward(radius: u32) -> Self {
        Self {
            behind: 0,
            ahead: radius,
        }
    }

    /// Time mode: `[reference - radius, reference + radius]`. Clocks drift both ways.
    #[must_use]
    pub const fn symmetric(radius: u32) -> Self {
        Self {
            behind: radius,
            ahead: radius,
        }
    }

    /// Number of candidates the window spans, before clamping at the `i64` bounds.
    #[must_use]
    pub fn span(self) -> u64 {
        u64::from(self.behind)
            .saturating_add(u64::from(self.ahead))
            .saturating_add(1)
    }

    /// `true` if neither side exceeds [`MAX_SKEW`].
    #[must_use]
    pub const fn is_bounded(self) -> bool {
        self.behind <= MAX_SKEW && self.ahead <= MAX_SKEW
    }

    /// Candidate reference values as a range, lowest first.
    ///
    /// The window is clamped at `i64::MIN`/`i64::MAX` instead of wrapping.
    #[must_use]
    pub fn range(self, reference: i64) -> RangeInclusive<i64> {
        let start = reference.saturating_sub(i64::from(self.behind));
        let end = reference.saturating_add(i64::from(self.ahead));
        start..=end
    }

    /// Candidate reference values in window order (lowest first).
    #[must_use]
    pub fn candidates(self, reference: i64) -> Vec<i64> {
        self.range(reference).collect()
    }
}

/// Outcome of one candidate evaluation.
struct CandidateOutcome {
    candidate: i64,
    matched: bool,
}

/// Validate `code` against every candidate of `window` around `reference`.
///
/// `generate` must be a pure function of the candidate. On acceptance,
/// returns the signed offset of the first matching candidate (in window
/// order) from `reference`.
///
/// The caller is responsible for trimming `code` and checking its length.
///
/// # Errors
///
/// Returns `OtpError::InvalidParameter` if the window exceeds [`MAX_SKEW`]
/// on either side, `OtpError::ValidationFailed` if no candidate matches.
pub fn validate_window<F>(
    code: &str,
    reference: i64,
    window: SkewWindow,
    generate: F,
) -> Result<i64, OtpError>
where
    F: Fn(i64) -> String + Sync,
{
    if !window.is_bounded() {
        return Err(OtpError::InvalidParameter(format!(
            "skew radius must be <= {MAX_SKEW}"
        )));
    }
    let submitted = code.as_bytes();

    // Order-preserving collect; the range is never materialized up front.
    let outcomes: Vec<CandidateOutcome> = window
        .range(reference)
        .into_par_iter()
        .map(|candidate| {
            let expected = generate(candidate);
            CandidateOutcome {
                candidate,
                matched: constant_time_eq(expected.as_bytes(), submitted),
            }
        })
        .collect();

    // Every outcome is visited; the first match in window order wins.
    let mut accepted: Option<i64> = None;
    for outcome in &outcomes {
        if outcome.matched && accepted.is_none() {
            accepted = Some(outcome.candidate);
        }
    }

    let candidate = accepted.ok_or(OtpError::ValidationFailed)?;
    candidate
        .checked_sub(reference)
        .ok_or(OtpError::ValidationFailed)
}

/// Trim `code`, check its length against `digits`, then run
/// [`validate_window`].
///
/// Length is counted in characters. A code of the wrong length is
/// rejected before `generate` is ever called.
///
/// # Errors
///
/// `OtpError::InvalidLength` with the trimmed character count, otherwise
/// as [`validate_window`].
pub fn validate_code<F>(
    code: &str,
    digits: Digits,
    reference: i64,
    window: SkewWindow,
    generate: F,
) -> Result<i64, OtpError>
where
    F: Fn(i64) -> String + Sync,
{
    let trimmed = code.trim();
    let length = trimmed.chars().count();
    if length != digits.len() {
        return Err(OtpError::InvalidLength(length));
    }
    validate_window(trimmed, reference, window, generate)
}
