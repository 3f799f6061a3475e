//! Skew-window acceptance boundaries for HOTP and TOTP.
//!
//! HOTP accepts a code minted at counter `c + k` iff `0 <= k <= r`;
//! TOTP accepts a code minted at step `s + k` iff `-r <= k <= r`.

use std::sync::atomic::{AtomicUsize, Ordering};

use oath_core::{
    validate_code, Digits, Hotp, HotpParams, OneTimePassword, OtpError, SecretKey, SkewWindow,
    Totp, TotpParams, MAX_SKEW,
};

const SECRET_20: &[u8] = b"12345678901234567890";

fn hotp() -> Hotp {
    Hotp::new(&SecretKey::new(SECRET_20), HotpParams::default()).expect("valid hotp")
}

fn totp() -> Totp {
    Totp::new(&SecretKey::new(SECRET_20), TotpParams::default()).expect("valid totp")
}

#[test]
fn hotp_accepts_exactly_forward_window() {
    let alg = hotp();
    let counter = 100i64;
    for radius in 0u32..4 {
        for k in -2i64..=6 {
            let code = alg.generate(counter + k);
            let result = alg.validate(&code, counter, radius);
            if (0..=i64::from(radius)).contains(&k) {
                assert_eq!(result, Ok(k), "radius {radius}, k {k}");
            } else {
                assert_eq!(
                    result,
                    Err(OtpError::ValidationFailed),
                    "radius {radius}, k {k}"
                );
            }
        }
    }
}

#[test]
fn totp_accepts_exactly_symmetric_window() {
    let alg = totp();
    let now = 1_700_000_000i64;
    for radius in 0u32..3 {
        for k in -4i64..=4 {
            let code = alg.generate(now + k * 30);
            let result = alg.validate(&code, now, radius);
            if k.abs() <= i64::from(radius) {
                assert_eq!(result, Ok(k * 30), "radius {radius}, k {k}");
            } else {
                assert_eq!(
                    result,
                    Err(OtpError::ValidationFailed),
                    "radius {radius}, k {k}"
                );
            }
        }
    }
}

#[test]
fn length_guard_precedes_matching() {
    let alg = hotp();
    assert_eq!(alg.validate("1234567", 0, 10), Err(OtpError::InvalidLength(7)));
    assert_eq!(alg.validate("", 0, 10), Err(OtpError::InvalidLength(0)));
}

#[test]
fn wrong_length_never_reaches_the_generator() {
    let calls = AtomicUsize::new(0);
    let generate = |candidate: i64| {
        calls.fetch_add(1, Ordering::SeqCst);
        format!("{:06}", candidate.rem_euclid(1_000_000))
    };
    let window = SkewWindow::symmetric(10);
    for code in ["", "12345", "1234567", " 1234567 "] {
        let result = validate_code(code, Digits::default(), 0, window, generate);
        assert!(matches!(result, Err(OtpError::InvalidLength(_))), "{code:?}");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(
        validate_code("000003", Digits::default(), 0, window, generate),
        Ok(3)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 21);
}

#[test]
fn radius_beyond_max_skew_is_rejected() {
    let alg = totp();
    let code = alg.generate(1_700_000_000);
    assert!(matches!(
        alg.validate(&code, 1_700_000_000, MAX_SKEW + 1),
        Err(OtpError::InvalidParameter(_))
    ));
    assert_eq!(alg.validate(&code, 1_700_000_000, MAX_SKEW), Ok(0));
}

#[test]
fn totp_at_time_zero_looks_behind_into_negative_steps() {
    let alg = totp();
    let code = alg.generate(-30);
    assert_eq!(alg.validate(&code, 0, 1), Ok(-30));
}
