use super::AWS4_REQUEST;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Raw 32-byte SigV4 signing key.
pub type SigningKey = [u8; 32];

/// HMAC with SHA256 hash, raw output.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> [u8; 32] {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = HmacSha256::new_from_slice(key).expect("hmac accepts keys of any length");
    h.update(content);
    h.finalize().into_bytes().into()
}

/// Intermediate keys of one derivation. Each stage keys the next with its raw
/// bytes; none of them is ever hex encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKeyChain {
    pub k_date: [u8; 32],
    pub k_region: [u8; 32],
    pub k_service: [u8; 32],
    pub k_signing: SigningKey,
}

impl SigningKeyChain {
    pub fn derive(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Self {
        let secret = format!("AWS4{secret_key}");
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, region.as_bytes());
        let k_service = hmac_sha256(&k_region, service.as_bytes());
        let k_signing = hmac_sha256(&k_service, AWS4_REQUEST.as_bytes());

        Self {
            k_date,
            k_region,
            k_service,
            k_signing,
        }
    }
}

impl std::fmt::Debug for SigningKeyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKeyChain(<redacted>)")
    }
}

/// Derive `kSigning` for `date_stamp/region/service/aws4_request`.
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> SigningKey {
    SigningKeyChain::derive(secret_key, date_stamp, region, service).k_signing
}
