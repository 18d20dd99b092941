//! Keeps a time-based one-time password one click away.
//!
//! The library holds the code derivation ([`totp::Totp`]), the two background
//! units that keep a tray indicator current ([`refresh::RefreshLoop`]) and react
//! to its menu ([`dispatch::ActionDispatcher`]), and the lifecycle wiring that
//! ties them together ([`app::App`]). The tray, the clipboard and the icon
//! decoder are reached only through the traits in [`indicator`] and
//! [`clipboard`]; the `desktop` feature provides the concrete backends.

pub mod app;
pub mod clipboard;
pub mod config;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod diagnostics;
pub mod dispatch;
pub mod icon;
pub mod indicator;
pub mod refresh;
pub mod secret;
pub mod totp;

use std::{fmt::Display, sync::LazyLock, time::SystemTime};

use data_encoding::{Encoding, Specification};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("Secret decode error")]
    SecretDecode(#[source] data_encoding::DecodeError),
    #[error("Invalid digest")]
    InvalidDigest(Vec<u8>),
    #[error("The decoded secret cannot be used as an HMAC key")]
    InvalidKeyLength,
    #[error("The system clock reports a time before the UNIX epoch")]
    ClockBeforeEpoch,
    #[error("Cannot truncate to {0} digits. Expected at most {max}", max = MAX_DIGITS)]
    UnsupportedDigits(u32),
}

/// Longest code a 31-bit truncated value can fill.
pub const MAX_DIGITS: u32 = 9;

/// RFC4648 base32 without padding that, like most authenticator apps,
/// ignores non-zero bits left over after the last full byte.
static BASE32_LENIENT: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZ234567");
    spec.check_trailing_bits = false;
    spec.encoding().expect("base32 alphabet is a valid specification")
});

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum OtpHashAlgorithm {
    #[default]
    SHA1,
    SHA256,
    SHA512,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OtpCode {
    code: u32,
    digits: u32,
}

impl OtpCode {
    pub fn integer(&self) -> u32 {
        self.code
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }
}

impl Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0padding$}",
            self.code,
            padding = (self.digits as usize)
        )
    }
}

/// Derives the code valid at a given instant.
///
/// This is the only view of the secret the background units get: they ask
/// for a fresh code on every tick or click and never keep it around.
pub trait CodeGenerator: Send + Sync {
    fn code_at(&self, at: SystemTime) -> Result<OtpCode, OtpError>;

    fn code_now(&self) -> Result<OtpCode, OtpError> {
        self.code_at(SystemTime::now())
    }
}

pub trait Otp {
    /// Decodes a secret (given as an RFC4648 base32-encoded ASCII string)
    /// into a byte string
    ///
    /// Whitespace, lowercase letters and trailing `=` padding are tolerated,
    /// as authenticator apps commonly display secrets that way.
    fn decode_secret(secret: &str) -> Result<Vec<u8>, OtpError> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .trim_end_matches('=')
            .to_uppercase();

        BASE32_LENIENT
            .decode(normalized.as_bytes())
            .map_err(OtpError::SecretDecode)
    }

    /// Calculates the HMAC digest for the given secret.
    fn calc_digest(
        &self,
        decoded_secret: &[u8],
        algorithm: OtpHashAlgorithm,
        data: u64,
    ) -> Result<Vec<u8>, OtpError> {
        let data = data.to_be_bytes();

        match algorithm {
            OtpHashAlgorithm::SHA1 => sign::<Hmac<Sha1>>(decoded_secret, &data),
            OtpHashAlgorithm::SHA256 => sign::<Hmac<Sha256>>(decoded_secret, &data),
            OtpHashAlgorithm::SHA512 => sign::<Hmac<Sha512>>(decoded_secret, &data),
        }
    }

    /// Encodes the HMAC digest into a truncated integer.
    fn encode_digest_truncated(digest: &[u8], target_digits_count: u32) -> Result<u32, OtpError> {
        // While sometimes this is a hardcoded 19
        // the last byte tells us the offset for any algorithm
        let offset = match digest.last() {
            Some(x) => *x & 0xf,
            None => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        } as usize;

        // Gets the 4 bytes that will compose the code
        let code_bytes: [u8; 4] = match digest
            .get(offset..offset + 4)
            .and_then(|bytes| bytes.try_into().ok())
        {
            Some(x) => x,
            None => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        };

        let code = u32::from_be_bytes(code_bytes);
        if target_digits_count > MAX_DIGITS {
            return Err(OtpError::UnsupportedDigits(target_digits_count));
        }
        let truncation_factor = u32::pow(10, target_digits_count);

        Ok((code & 0x7fffffff) % truncation_factor)
    }
}

fn sign<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, OtpError> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| OtpError::InvalidKeyLength)?;
    mac.update(data);

    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{totp::Totp, Otp, OtpCode, OtpError};

    #[rstest]
    #[case("JBSWY3DPEHPK3PXP")]
    #[case("jbswy3dpehpk3pxp")]
    #[case("JBSW Y3DP EHPK 3PXP")]
    #[case("  JBSWY3DPEHPK3PXP\n")]
    #[case("JBSWY3DPEHPK3PXP======")]
    fn decode_secret_normalizes(#[case] secret: &str) {
        assert_eq!(Totp::decode_secret(secret).unwrap(), b"Hello!\xde\xad\xbe\xef");
    }

    #[rstest]
    #[case("AB", &[0x00])]
    #[case("MZ", b"f")]
    #[case("ab======", &[0x00])]
    fn decode_secret_ignores_trailing_bits(#[case] secret: &str, #[case] expected: &[u8]) {
        assert_eq!(Totp::decode_secret(secret).unwrap(), expected);
    }

    #[rstest]
    #[case("JBSWY3DPEHPK3PX1")]
    #[case("not base32!")]
    #[case("A")]
    fn decode_secret_rejects_malformed(#[case] secret: &str) {
        assert!(matches!(
            Totp::decode_secret(secret),
            Err(OtpError::SecretDecode(_))
        ));
    }

    #[test]
    fn truncation_rejects_short_digest() {
        assert!(matches!(
            Totp::encode_digest_truncated(&[0x0f; 8], 6),
            Err(OtpError::InvalidDigest(_))
        ));
        assert!(matches!(
            Totp::encode_digest_truncated(&[], 6),
            Err(OtpError::InvalidDigest(_))
        ));
    }

    #[rstest]
    #[case(10)]
    #[case(12)]
    #[case(u32::MAX)]
    fn truncation_rejects_too_many_digits(#[case] digits: u32) {
        assert!(matches!(
            Totp::encode_digest_truncated(&[0x00; 20], digits),
            Err(OtpError::UnsupportedDigits(d)) if d == digits
        ));
    }

    #[test]
    fn truncation_accepts_nine_digits() {
        assert!(Totp::encode_digest_truncated(&[0x7f; 20], 9).unwrap() < 1_000_000_000);
    }

    #[test]
    fn code_is_zero_padded() {
        let code = OtpCode { code: 42, digits: 6 };
        assert_eq!(code.to_string(), "000042");
        assert_eq!(code.integer(), 42);
        assert_eq!(code.digits(), 6);
    }
}
