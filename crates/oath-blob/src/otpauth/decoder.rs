use std::borrow::Cow;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use oath_core::{
    Digits, HashAlgorithm, Hotp, HotpParams, OneTimePassword, OtpError, OtpType, SecretKey,
    Totp, TotpParams, DEFAULT_PERIOD,
};
use url::Url;
use zeroize::Zeroizing;

use super::{UriError, SCHEME};
use crate::options::EnrollOptions;

/// Parameters recovered from a provisioning URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmParameters {
    otp_type: OtpType,
    key: SecretKey,
    hash: HashAlgorithm,
    digits: Digits,
    period: u32,
    counter: i64,
    issuer: String,
    account: String,
}

impl AlgorithmParameters {
    /// `hotp` or `totp`.
    #[must_use]
    pub const fn otp_type(&self) -> OtpType {
        self.otp_type
    }

    /// Decoded shared secret.
    #[must_use]
    pub const fn key(&self) -> &SecretKey {
        &self.key
    }

    #[must_use]
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    #[must_use]
    pub const fn digits(&self) -> Digits {
        self.digits
    }

    /// Step length in seconds. Meaningless for HOTP.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Next counter value. Zero for TOTP.
    #[must_use]
    pub const fn counter(&self) -> i64 {
        self.counter
    }

    /// Issuer from the `issuer` parameter or the label prefix; may be empty.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Build the generator these parameters describe. TOTP uses epoch 0.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidParameter` for an empty key.
    pub fn generator(&self) -> Result<Box<dyn OneTimePassword>, OtpError> {
        let hotp = HotpParams {
            digits: self.digits,
            hash: self.hash,
        };
        Ok(match self.otp_type {
            OtpType::Hotp => Box::new(Hotp::new(&self.key, hotp)?),
            OtpType::Totp => Box::new(Totp::new(
                &self.key,
                TotpParams {
                    hotp,
                    period: self.period,
                    t0: 0,
                },
            )?),
        })
    }

    /// Enrollment options that reproduce this factor, key included.
    #[must_use]
    pub fn enroll_options(&self) -> EnrollOptions {
        let options = EnrollOptions::default()
            .with_key(self.key.expose())
            .with_hash(self.hash)
            .with_digits(self.digits);
        match self.otp_type {
            OtpType::Hotp => options.with_counter(self.counter),
            OtpType::Totp => options.with_period(self.period),
        }
    }
}

/// Parse a provisioning URI.
///
/// # Errors
///
/// Returns the [`UriError`] variant naming the first offending component.
pub fn decode(value: &str) -> Result<AlgorithmParameters, UriError> {
    let uri = Url::parse(value.trim()).map_err(|e| UriError::UnsupportedScheme(e.to_string()))?;

    if uri.scheme() != SCHEME {
        return Err(UriError::UnsupportedScheme(uri.scheme().to_owned()));
    }

    let host = uri.host_str().unwrap_or_default();
    let otp_type =
        OtpType::from_tag(host).ok_or_else(|| UriError::UnsupportedOtpType(host.to_owned()))?;

    let key = extract_key(&uri)?;
    let hash = extract_hash(&uri)?;
    let digits = extract_digits(&uri)?;

    let (counter, period) = match otp_type {
        OtpType::Hotp => (extract_counter(&uri)?, DEFAULT_PERIOD),
        OtpType::Totp => (0, extract_period(&uri)?),
    };

    // `+` stays literal in the path; only `%XX` escapes are decoded.
    let label = urlencoding::decode(uri.path().trim_start_matches('/'))
        .map(Cow::into_owned)
        .map_err(|e| UriError::Malformed(e.to_string()))?;
    let (label_issuer, account) = match label.split_once(':') {
        Some((issuer, account)) => (issuer.to_owned(), account.to_owned()),
        None => (String::new(), label),
    };
    let issuer = query_param(&uri, "issuer")
        .filter(|issuer| !issuer.is_empty())
        .unwrap_or(label_issuer);

    Ok(AlgorithmParameters {
        otp_type,
        key,
        hash,
        digits,
        period,
        counter,
        issuer,
        account,
    })
}

fn query_param(uri: &Url, name: &str) -> Option<String> {
    uri.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Base32, tolerant of lower case, surrounding whitespace and padding.
fn extract_key(uri: &Url) -> Result<SecretKey, UriError> {
    let raw = Zeroizing::new(query_param(uri, "secret").unwrap_or_default());
    let normalized = Zeroizing::new(raw.trim().trim_end_matches('=').to_ascii_uppercase());
    let bytes = Zeroizing::new(
        BASE32_NOPAD
            .decode(normalized.as_bytes())
            .map_err(|_| UriError::InvalidSecretEncoding)?,
    );
    if bytes.is_empty() {
        return Err(UriError::InvalidSecretEncoding);
    }
    Ok(SecretKey::new(&bytes))
}

fn extract_hash(uri: &Url) -> Result<HashAlgorithm, UriError> {
    match query_param(uri, "algorithm") {
        None => Ok(HashAlgorithm::default()),
        Some(name) if name.is_empty() => Ok(HashAlgorithm::default()),
        Some(name) => {
            HashAlgorithm::from_str(&name).map_err(|_| UriError::UnsupportedHashAlgorithm(name))
        }
    }
}

fn extract_digits(uri: &Url) -> Result<Digits, UriError> {
    let Some(value) = query_param(uri, "digits") else {
        return Ok(Digits::default());
    };
    value
        .parse::<u8>()
        .ok()
        .and_then(|n| Digits::new(n).ok())
        .ok_or(UriError::InvalidDigits(value))
}

fn extract_period(uri: &Url) -> Result<u32, UriError> {
    let Some(value) = query_param(uri, "period") else {
        return Ok(DEFAULT_PERIOD);
    };
    match value.parse::<u32>() {
        Ok(period) if period > 0 => Ok(period),
        _ => Err(UriError::InvalidPeriod(value)),
    }
}

fn extract_counter(uri: &Url) -> Result<i64, UriError> {
    query_param(uri, "counter")
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or(UriError::NoCounterPresent)
}
