use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    secret::Secret, CodeGenerator, Otp, OtpCode, OtpError, OtpHashAlgorithm, MAX_DIGITS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Totp {
    pub(crate) secret: Secret,
    pub(crate) algorithm: OtpHashAlgorithm,
    pub(crate) period: u64,
    pub(crate) digits: u32,
}

impl Otp for Totp {}

impl CodeGenerator for Totp {
    fn code_at(&self, at: SystemTime) -> Result<OtpCode, OtpError> {
        self.generate_at(at)
    }
}

impl Totp {
    /// Creates the config for the [Time-based One-time Password Algorithm](http://en.wikipedia.org/wiki/Time-based_One-time_Password_Algorithm)
    /// (TOTP) given an RFC4648 base32 encoded secret.
    ///
    /// Obs.: This method defaults to the SHA1 hash, a 6-digit code and a period of 30 seconds
    pub fn new(secret: Secret) -> Self {
        Self {
            secret,
            algorithm: OtpHashAlgorithm::SHA1,
            period: 30,
            digits: 6,
        }
    }

    ///  Sets hashing algorithm
    pub fn with_algorithm(&mut self, algorithm: OtpHashAlgorithm) -> &mut Self {
        self.algorithm = algorithm;

        self
    }

    ///  Sets the period in seconds
    pub fn with_period(&mut self, period: u64) -> &mut Self {
        self.period = period.max(1);

        self
    }

    ///  Sets the number of digits to generate, between 1 and [`MAX_DIGITS`]
    pub fn with_digits(&mut self, digits: u32) -> &mut Self {
        self.digits = digits.clamp(1, MAX_DIGITS);

        self
    }

    pub fn algorithm(&self) -> OtpHashAlgorithm {
        self.algorithm
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    /// Generates a Totp from the provided seconds since the UNIX epoch
    /// truncated to the specified number of digits
    pub fn generate(&self, seconds_since_epoch: u64) -> Result<OtpCode, OtpError> {
        let calculated_time = seconds_since_epoch / self.period;

        let decoded = Self::decode_secret(self.secret.expose())?;
        let digest = self.calc_digest(decoded.as_slice(), self.algorithm, calculated_time)?;

        let code = Self::encode_digest_truncated(digest.as_ref(), self.digits)?;

        Ok(OtpCode {
            code,
            digits: self.digits,
        })
    }

    /// Generates the code for a wall-clock instant.
    ///
    /// Fails with [`OtpError::ClockBeforeEpoch`] when the instant predates
    /// the UNIX epoch.
    pub fn generate_at(&self, at: SystemTime) -> Result<OtpCode, OtpError> {
        let since_epoch = at
            .duration_since(UNIX_EPOCH)
            .map_err(|_| OtpError::ClockBeforeEpoch)?;

        self.generate(since_epoch.as_secs())
    }

    /// Seconds until the code for `seconds_since_epoch` rolls over
    pub fn remaining_seconds(&self, seconds_since_epoch: u64) -> u64 {
        self.period - seconds_since_epoch % self.period
    }
}
