mod hotp_lifecycle;
mod provisioning;
mod totp_drift;
