//! Export to and import from `otpauth://` URIs.

use oath_blob::otpauth::decode;
use oath_blob::{enroll, export, verify_at, EnrollOptions, OtpType, RingCipher};
use oath_core::{Digits, HashAlgorithm, OneTimePassword};

fn cipher() -> RingCipher {
    RingCipher::aes_256_gcm(&[0x44; 32]).expect("key")
}

#[test]
fn exported_totp_uri_rebuilds_an_equivalent_generator() {
    let options = EnrollOptions::default()
        .with_hash(HashAlgorithm::Sha256)
        .with_digits(Digits::new(8).expect("digits"))
        .with_period(60);
    let blob = enroll(OtpType::Totp, &options, &cipher()).expect("enroll");
    let exported = export(&blob, &cipher(), "bob@example.com", "Example Co").expect("export");

    let params = decode(&exported.uri).expect("decode");
    assert_eq!(params.otp_type(), OtpType::Totp);
    assert_eq!(params.hash(), HashAlgorithm::Sha256);
    assert_eq!(params.digits().value(), 8);
    assert_eq!(params.period(), 60);
    assert_eq!(params.issuer(), "Example Co");
    assert_eq!(params.account(), "bob@example.com");
    assert_eq!(params.key().len(), 32);

    // The authenticator's code verifies against the original blob.
    let now = 1_700_000_000;
    let code = params.generator().expect("generator").generate(now);
    assert!(verify_at(&code, &blob, &cipher(), now).is_ok());
}

#[test]
fn imported_uri_enrolls_the_same_factor() {
    let uri = "otpauth://hotp/ACME%20Co:john.doe@email.com?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&issuer=ACME%20Co&counter=3";
    let params = decode(uri).expect("decode");
    let blob = enroll(OtpType::Hotp, &params.enroll_options(), &cipher()).expect("enroll");

    // RFC 4226 code for counter 3.
    assert!(verify_at("969429", &blob, &cipher(), 0).is_ok());
}

#[test]
fn base32_key_matches_uri_secret() {
    let blob = enroll(OtpType::Totp, &EnrollOptions::default(), &cipher()).expect("enroll");
    let exported = export(&blob, &cipher(), "carol", "").expect("export");
    assert!(!exported.base32_key.contains('='));
    assert!(exported
        .uri
        .contains(&format!("secret={}", exported.base32_key)));
}
