//! Counter-based enrollments through the public entry points.

use oath_blob::{enroll, export, verify, EnrollOptions, OathError, OtpType, RingCipher};
use oath_core::OtpError;

const SECRET_20: &[u8] = b"12345678901234567890";

const RFC4226_EXPECTED: [&str; 10] = [
    "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583", "399871",
    "520489",
];

fn cipher() -> RingCipher {
    RingCipher::aes_256_gcm(&[0x11; 32]).expect("key")
}

fn blob(initial_skew: u32, work_skew: u32) -> String {
    let options = EnrollOptions::default()
        .with_key(SECRET_20)
        .with_initial_skew(initial_skew)
        .with_work_skew(work_skew);
    enroll(OtpType::Hotp, &options, &cipher()).expect("enroll")
}

#[test]
fn first_code_synchronizes_and_cannot_be_replayed() {
    let blob = blob(0, 0);
    let accepted = verify("755224", &blob, &cipher()).expect("accept");
    assert!(accepted.synchronized);

    let err = verify("755224", &accepted.blob, &cipher()).expect_err("replay");
    assert!(err.is_validation_failure());

    // The next counter value is still accepted from the resealed blob, and
    // no longer reports a first synchronization.
    let next = verify("287082", &accepted.blob, &cipher()).expect("accept");
    assert!(!next.synchronized);
}

#[test]
fn replaying_against_the_old_blob_is_the_callers_concern() {
    let old = blob(0, 0);
    verify("755224", &old, &cipher()).expect("accept");
    // A stale blob still holds the old counter; storing the returned blob is mandatory.
    assert!(verify("755224", &old, &cipher()).is_ok());
}

#[test]
fn initial_skew_absorbs_presses_before_enrollment() {
    let blob = blob(10, 1);
    let accepted = verify(RFC4226_EXPECTED[7], &blob, &cipher()).expect("accept");
    // Counter is now 8; work skew 1 covers 8 and 9 only.
    assert!(verify(RFC4226_EXPECTED[9], &accepted.blob, &cipher()).is_ok());
    let err = verify(RFC4226_EXPECTED[0], &accepted.blob, &cipher()).expect_err("behind");
    assert!(err.is_validation_failure());
}

#[test]
fn walking_through_all_codes_keeps_the_counter_in_step() {
    let mut current = blob(0, 0);
    for code in RFC4226_EXPECTED {
        current = verify(code, &current, &cipher()).expect("sequential").blob;
    }
    let exported = export(&current, &cipher(), "alice", "").expect("export");
    assert!(exported.uri.contains("counter=10"));
}

#[test]
fn wrong_length_is_distinguishable() {
    let blob = blob(0, 0);
    let err = verify("7552", &blob, &cipher()).expect_err("short");
    assert!(matches!(err, OathError::Otp(OtpError::InvalidLength(4))));
    let err = verify(" 755224 ", &blob, &cipher());
    assert!(err.is_ok(), "surrounding whitespace is trimmed");
}
