//! AEAD seal/open lifecycle through the `Aead` trait object.

use oath_core::aead::{KEY_LEN, NONCE_LEN};
use oath_core::{Aead, OtpError, RingCipher};

fn boxed_ciphers() -> Vec<Box<dyn Aead>> {
    vec![
        Box::new(RingCipher::aes_256_gcm(&[0x11; KEY_LEN]).expect("aes")),
        Box::new(RingCipher::chacha20_poly1305(&[0x11; KEY_LEN]).expect("chacha")),
    ]
}

#[test]
fn seal_then_open_through_trait_object() {
    for cipher in boxed_ciphers() {
        let nonce = vec![0x42; cipher.nonce_len()];
        let sealed = cipher.seal(&nonce, b"{\"type\":\"hotp\"}").expect("seal");
        let opened = cipher.open(&nonce, &sealed).expect("open");
        assert_eq!(opened.as_slice(), b"{\"type\":\"hotp\"}");
    }
}

#[test]
fn ciphertexts_are_not_interchangeable_between_algorithms() {
    let ciphers = boxed_ciphers();
    let nonce = [0x42; NONCE_LEN];
    let sealed = ciphers[0].seal(&nonce, b"state").expect("seal");
    assert_eq!(ciphers[1].open(&nonce, &sealed), Err(OtpError::Decryption));
}

#[test]
fn truncated_ciphertext_fails_authentication() {
    for cipher in boxed_ciphers() {
        let nonce = [0x42; NONCE_LEN];
        let sealed = cipher.seal(&nonce, b"state").expect("seal");
        let truncated = &sealed[..sealed.len() - 1];
        assert_eq!(cipher.open(&nonce, truncated), Err(OtpError::Decryption));
        assert_eq!(cipher.open(&nonce, &[]), Err(OtpError::Decryption));
    }
}
