//! Time-based enrollments with a drifting client clock.

use oath_blob::{envelope, enroll, verify_at, EnrollOptions, OtpType, RingCipher, SyncState};
use oath_core::{Hotp, HotpParams, OneTimePassword, SecretKey, Totp, TotpParams};

const SECRET_20: &[u8] = b"12345678901234567890";
const NOW: i64 = 1_700_000_000;

fn cipher() -> RingCipher {
    RingCipher::aes_256_gcm(&[0x22; 32]).expect("key")
}

fn client() -> Totp {
    Totp::new(&SecretKey::new(SECRET_20), TotpParams::default()).expect("totp")
}

fn open_state(blob: &str, cipher: &RingCipher) -> SyncState {
    envelope::open(blob, cipher).expect("open")
}

fn blob(initial_skew: u32, work_skew: u32) -> String {
    let options = EnrollOptions::default()
        .with_key(SECRET_20)
        .with_initial_skew(initial_skew)
        .with_work_skew(work_skew);
    enroll(OtpType::Totp, &options, &cipher()).expect("enroll")
}

#[test]
fn drift_is_learned_and_followed() {
    let client = client();
    let mut current = blob(4, 1);

    // Client clock runs three steps ahead.
    let code = client.generate(NOW + 90);
    current = verify_at(&code, &current, &cipher(), NOW).expect("initial").blob;
    assert_eq!(open_state(&current, &cipher()).deviation(), 90);

    // Another step of drift still fits the narrow work window.
    let later = NOW + 600;
    let code = client.generate(later + 120);
    current = verify_at(&code, &current, &cipher(), later).expect("work").blob;
    assert_eq!(open_state(&current, &cipher()).deviation(), 120);
}

#[test]
fn work_skew_applies_after_sync() {
    let client = client();
    let current = blob(4, 0);
    let code = client.generate(NOW);
    let current = verify_at(&code, &current, &cipher(), NOW).expect("sync").blob;

    let later = NOW + 300;
    let ahead = client.generate(later + 30);
    let err = verify_at(&ahead, &current, &cipher(), later).expect_err("outside");
    assert!(err.is_validation_failure());
}

#[test]
fn replay_within_the_same_step_is_rejected() {
    let client = client();
    let current = blob(1, 1);
    let code = client.generate(NOW);
    let current = verify_at(&code, &current, &cipher(), NOW).expect("first").blob;
    let err = verify_at(&code, &current, &cipher(), NOW + 5).expect_err("replay");
    assert!(err.is_validation_failure());
}

#[test]
fn totp_at_step_equals_hotp_at_counter() {
    let key = SecretKey::new(SECRET_20);
    let totp = Totp::new(&key, TotpParams::default()).expect("totp");
    let hotp = Hotp::new(&key, HotpParams::default()).expect("hotp");
    assert_eq!(totp.generate(NOW), hotp.generate(NOW / 30));
}
