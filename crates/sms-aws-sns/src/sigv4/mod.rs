//! AWS Signature Version 4.
//!
//! - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
//!
//! Signing runs strictly forward: [`canonical::build_canonical_request`] →
//! [`key::derive_signing_key`] → [`signer::sign`]. Every value is built fresh
//! for one request; nothing is cached between calls.

pub mod canonical;
pub mod key;
pub mod signer;

pub use canonical::{build_canonical_request, CanonicalRequest, HeaderSet};
pub use key::{derive_signing_key, SigningKey, SigningKeyChain};
pub use signer::{sign, Signature, ALGORITHM};

use sha2::{Digest, Sha256};
use sms_core::SmsError;
use std::fmt;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Terminator of every credential scope.
pub const AWS4_REQUEST: &str = "aws4_request";

/// Access key pair used for one signing operation.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Where and when a request is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub region: String,
    pub service: String,
    /// `YYYYMMDD`
    pub date_stamp: String,
    /// `YYYYMMDDTHHMMSSZ`
    pub amz_date: String,
}

impl SigningContext {
    /// Build a context from a single instant, so `date_stamp` is always the
    /// prefix of `amz_date`.
    pub fn new(
        region: impl Into<String>,
        service: impl Into<String>,
        now: OffsetDateTime,
    ) -> Result<Self, SmsError> {
        let amz_date = now
            .to_offset(UtcOffset::UTC)
            .format(format_description!(
                "[year][month][day]T[hour][minute][second]Z"
            ))
            .map_err(|e| SmsError::Unexpected(format!("failed to format x-amz-date: {}", e)))?;
        let date_stamp = amz_date[..8].to_string();

        Ok(Self {
            region: region.into(),
            service: service.into(),
            date_stamp,
            amz_date,
        })
    }

    /// Scope: "20220313/<region>/<service>/aws4_request"
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.date_stamp, self.region, self.service, AWS4_REQUEST
        )
    }
}

/// Hex encoded SHA256 hash.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}
