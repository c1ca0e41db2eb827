use super::key::hmac_sha256;
use super::{CanonicalRequest, SigningContext, SigningKey};
use tracing::debug;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Result of signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Lower-case hex HMAC of the string to sign.
    pub signature: String,
    /// Value of the `authorization` header.
    pub authorization: String,
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(creq: &CanonicalRequest, ctx: &SigningContext) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        ctx.amz_date,
        ctx.credential_scope(),
        creq.hashed()
    )
}

/// Sign `creq` with a key derived by [`super::derive_signing_key`] for the same
/// context.
pub fn sign(
    creq: &CanonicalRequest,
    ctx: &SigningContext,
    access_key: &str,
    signing_key: &SigningKey,
) -> Signature {
    let scope = ctx.credential_scope();
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(creq, ctx);
    debug!("calculated string to sign: {string_to_sign}");

    let signature = hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()));
    let authorization = format!(
        "{ALGORITHM} Credential={access_key}/{scope}, SignedHeaders={}, Signature={signature}",
        creq.signed_headers()
    );

    Signature {
        signature,
        authorization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigv4::{build_canonical_request, derive_signing_key, HeaderSet, SigningKeyChain};

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";
    const BODY: &[u8] = b"Action=Publish&Message=hi&PhoneNumber=%2B15551234567&Version=2010-03-31";

    fn context() -> SigningContext {
        SigningContext {
            region: "us-east-1".into(),
            service: "sns".into(),
            date_stamp: "20250324".into(),
            amz_date: "20250324T123600Z".into(),
        }
    }

    fn canonical(headers: &[(&str, &str)]) -> CanonicalRequest {
        let set: HeaderSet = headers.iter().copied().collect();
        build_canonical_request("POST", "/", "", &set, BODY)
    }

    fn sns_canonical() -> CanonicalRequest {
        canonical(&[
            ("Content-Type", "application/x-www-form-urlencoded; charset=utf-8"),
            ("Host", "sns.us-east-1.amazonaws.com"),
            ("X-Amz-Date", "20250324T123600Z"),
        ])
    }

    fn sign_with_secret(creq: &CanonicalRequest) -> Signature {
        let ctx = context();
        let key = derive_signing_key(SECRET, &ctx.date_stamp, &ctx.region, &ctx.service);
        sign(creq, &ctx, "AKIDEXAMPLE", &key)
    }

    #[test]
    fn string_to_sign_layout() {
        assert_eq!(
            string_to_sign(&sns_canonical(), &context()),
            "AWS4-HMAC-SHA256\n\
             20250324T123600Z\n\
             20250324/us-east-1/sns/aws4_request\n\
             960fe9728a7f420a88e069636e7886503e8dc3a6f7f887f03dd548512e8daade"
        );
    }

    #[test]
    fn golden_authorization_header() {
        let first = sign_with_secret(&sns_canonical());
        assert_eq!(
            first.signature,
            "d1b97d6b4096de16fb3959d1a8d77238ea6dee0331310564754abacf8cd25827"
        );
        assert_eq!(
            first.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20250324/us-east-1/sns/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=d1b97d6b4096de16fb3959d1a8d77238ea6dee0331310564754abacf8cd25827"
        );

        for _ in 0..5 {
            assert_eq!(sign_with_secret(&sns_canonical()), first);
        }
    }

    // Example request from the AWS "Create a signed AWS API request" guide.
    #[test]
    fn documented_iam_list_users_signature() {
        let headers: HeaderSet = [
            ("Content-Type", "application/x-www-form-urlencoded; charset=utf-8"),
            ("Host", "iam.amazonaws.com"),
            ("X-Amz-Date", "20150830T123600Z"),
        ]
        .into_iter()
        .collect();
        let creq = build_canonical_request(
            "GET",
            "/",
            "Action=ListUsers&Version=2010-05-08",
            &headers,
            b"",
        );
        assert_eq!(
            creq.hashed(),
            "f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59"
        );

        let ctx = SigningContext {
            region: "us-east-1".into(),
            service: "iam".into(),
            date_stamp: "20150830".into(),
            amz_date: "20150830T123600Z".into(),
        };
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            &ctx.date_stamp,
            &ctx.region,
            &ctx.service,
        );
        let sig = sign(&creq, &ctx, "AKIDEXAMPLE", &key);
        assert_eq!(
            sig.signature,
            "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
        );
    }

    #[test]
    fn hex_reencoded_chain_produces_wrong_signature() {
        let ctx = context();
        let creq = sns_canonical();
        let good = sign_with_secret(&creq);

        // Re-encode every intermediate key as hex before reusing it.
        let k_date = hmac_sha256(format!("AWS4{SECRET}").as_bytes(), ctx.date_stamp.as_bytes());
        let k_region = hmac_sha256(hex::encode(k_date).as_bytes(), ctx.region.as_bytes());
        let k_service = hmac_sha256(hex::encode(k_region).as_bytes(), ctx.service.as_bytes());
        let k_signing = hmac_sha256(hex::encode(k_service).as_bytes(), b"aws4_request");
        let wrong = sign(&creq, &ctx, "AKIDEXAMPLE", &k_signing);

        assert_ne!(wrong.signature, good.signature);
        assert_eq!(
            wrong.signature,
            "e9f93dca55954e5e0651491ff4bbe423a62cf70ddcbbc35cddf129639d109d47"
        );

        let chain = SigningKeyChain::derive(SECRET, &ctx.date_stamp, &ctx.region, &ctx.service);
        assert_eq!(sign(&creq, &ctx, "AKIDEXAMPLE", &chain.k_signing), good);
    }

    #[test]
    fn signed_headers_in_authorization_are_sorted() {
        let sig = sign_with_secret(&canonical(&[
            ("X-Amz-Date", "20250324T123600Z"),
            ("Content-Type", "application/x-www-form-urlencoded; charset=utf-8"),
            ("Host", "sns.us-east-1.amazonaws.com"),
        ]));
        assert!(sig
            .authorization
            .contains(", SignedHeaders=content-type;host;x-amz-date, "));
        // Same headers, different block order: a different (but valid-format) signature.
        assert_eq!(
            sig.signature,
            "5ba76fa5e6d79a8bfff13cab766c547f0fff92e40209d672f8e0eb68824eaf24"
        );
    }

    #[test]
    fn signature_is_lowercase_hex() {
        let sig = sign_with_secret(&sns_canonical());
        assert_eq!(sig.signature.len(), 64);
        assert!(sig
            .signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
