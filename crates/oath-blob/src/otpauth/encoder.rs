use data_encoding::BASE32_NOPAD;
use oath_core::{AlgorithmExport, OtpType};
use url::Url;
use zeroize::Zeroizing;

use super::{UriError, SCHEME};

/// Build a provisioning URI for `export`.
///
/// The label is `issuer:account`, or just `account` when `issuer` is empty.
/// Query keys are emitted in sorted order. `counter` is written for HOTP
/// and ignored for TOTP. The TOTP epoch offset has no URI representation
/// and is dropped.
///
/// # Errors
///
/// Returns `UriError::Malformed` if the URI cannot be assembled.
pub fn encode(
    export: &AlgorithmExport,
    account: &str,
    issuer: &str,
    counter: i64,
) -> Result<String, UriError> {
    let mut uri = Url::parse(&format!("{SCHEME}://{}/", export.otp_type))
        .map_err(|e| UriError::Malformed(e.to_string()))?;

    if issuer.is_empty() {
        uri.set_path(account);
    } else {
        uri.set_path(&format!("{issuer}:{account}"));
    }

    let secret = Zeroizing::new(BASE32_NOPAD.encode(export.key.expose()));
    {
        let mut query = uri.query_pairs_mut();
        query.append_pair("algorithm", export.hash.as_str());
        if export.otp_type == OtpType::Hotp {
            query.append_pair("counter", &counter.to_string());
        }
        query.append_pair("digits", &export.digits.to_string());
        if !issuer.is_empty() {
            query.append_pair("issuer", issuer);
        }
        if let Some(step) = export.time_step {
            query.append_pair("period", &step.period.to_string());
        }
        query.append_pair("secret", &secret);
    }

    Ok(uri.into())
}
