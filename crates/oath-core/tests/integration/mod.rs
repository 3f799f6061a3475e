mod aead_roundtrip;
mod window_semantics;
