//! Building a signed SNS `Publish` request.

use crate::config::SnsConfig;
use crate::sigv4::{
    build_canonical_request, derive_signing_key, sign, HeaderSet, SigningContext,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sms_core::{PostRequest, SmsError};
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

pub const SNS_SERVICE: &str = "sns";
pub const SNS_API_VERSION: &str = "2010-03-31";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// RFC 3986 encoding: every byte except the unreserved characters
/// 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_' and '~'. Space becomes `%20`.
static RFC3986_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Join `key=value` pairs with `&`, percent encoding both sides.
pub fn encode_form<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k.as_ref(), &RFC3986_ENCODE_SET),
                utf8_percent_encode(v.as_ref(), &RFC3986_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Form parameters of one `Publish` call, in wire order.
pub fn publish_params<'a>(
    config: &'a SnsConfig,
    phone: &'a str,
    message: &'a str,
) -> Vec<(String, &'a str)> {
    let mut params = vec![
        ("Action".to_string(), "Publish"),
        ("PhoneNumber".to_string(), phone),
        ("Message".to_string(), message),
        ("Version".to_string(), SNS_API_VERSION),
    ];

    let mut attributes: Vec<(&str, &str)> = Vec::with_capacity(2);
    if !config.sender_id.is_empty() {
        attributes.push(("AWS.SNS.SMS.SenderID", config.sender_id.as_str()));
    }
    if let Some(sms_type) = config.sms_type {
        attributes.push(("AWS.SNS.SMS.SMSType", sms_type.as_str()));
    }

    for (i, (name, value)) in attributes.into_iter().enumerate() {
        let entry = format!("MessageAttributes.entry.{}", i + 1);
        params.push((format!("{entry}.Name"), name));
        params.push((format!("{entry}.Value.DataType"), "String"));
        params.push((format!("{entry}.Value.StringValue"), value));
    }

    params
}

/// A `Publish` request ready for the transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    /// `content-type`, `host`, `x-amz-date`, then `authorization`.
    pub headers: HeaderSet,
    pub body: String,
    pub context: SigningContext,
}

impl SignedRequest {
    /// Redirects are followed; HTTP error statuses are left for the response
    /// parser to judge.
    pub fn into_post(self) -> PostRequest {
        PostRequest {
            headers: self.headers.into_headers(),
            body: self.body.into_bytes(),
            allow_redirects: true,
            http_errors: false,
        }
    }
}

/// Signs `Publish` requests for one [`SnsConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SnsRequestBuilder<'a> {
    config: &'a SnsConfig,
}

impl<'a> SnsRequestBuilder<'a> {
    pub fn new(config: &'a SnsConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, phone: &str, message: &str) -> Result<SignedRequest, SmsError> {
        self.build_at(phone, message, OffsetDateTime::now_utc())
    }

    /// Sign as of `now`. `x-amz-date` and the credential scope both come from
    /// this single instant.
    pub fn build_at(
        &self,
        phone: &str,
        message: &str,
        now: OffsetDateTime,
    ) -> Result<SignedRequest, SmsError> {
        let url = self.config.endpoint_url();
        let endpoint = Url::parse(&url)
            .map_err(|e| SmsError::Invalid(format!("invalid SNS endpoint {}: {}", url, e)))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SmsError::Invalid(format!("SNS endpoint {} has no host", url)));
            }
        };

        let ctx = SigningContext::new(&self.config.region, SNS_SERVICE, now)?;
        let body = encode_form(publish_params(self.config, phone, message));

        // Alphabetical insertion keeps the header block sorted as well.
        let mut headers = HeaderSet::new();
        headers.insert("Content-Type", FORM_CONTENT_TYPE);
        headers.insert("Host", host);
        headers.insert("X-Amz-Date", ctx.amz_date.as_str());

        let creq = build_canonical_request("POST", endpoint.path(), "", &headers, body.as_bytes());
        debug!("calculated canonical request: {creq}");

        let credentials = self.config.credentials();
        let signing_key = derive_signing_key(
            &credentials.secret_key,
            &ctx.date_stamp,
            &ctx.region,
            &ctx.service,
        );
        let signature = sign(&creq, &ctx, &credentials.access_key, &signing_key);
        headers.insert("Authorization", signature.authorization);

        Ok(SignedRequest {
            url,
            headers,
            body,
            context: ctx,
        })
    }
}
