//! # AWS SNS SMS Gateway
//!
//! Amazon SNS SMS gateway for smsgate, talking to the SNS Query API
//! directly and signing every call with its own AWS Signature Version 4
//! implementation (no AWS SDK).
//!
//! ## Features
//!
//! - Send SMS messages via SNS `Publish` with an optional sender ID and SMS type
//! - SigV4 signing built from scratch ([`sigv4`])
//! - Pluggable HTTP transport ([`sms_core::HttpTransport`])
//! - Error classification of SNS error documents and full tracing
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_aws_sns::{AwsSnsGateway, SnsConfig};
//! use sms_core::{ReqwestTransport, SmsGateway};
//!
//! let transport = ReqwestTransport::new(Duration::from_secs(30), "smsgate")?;
//! let gateway = AwsSnsGateway::new(
//!     SnsConfig::new("us-east-1", "access_key", "secret_key", "ACME"),
//!     Arc::new(transport),
//! );
//! let delivered = gateway.send("+15551234567", "Hello from AWS SNS!").await;
//! ```

pub mod config;
pub mod request;
pub mod response;
pub mod sigv4;

pub use config::{SmsType, SnsConfig};
pub use request::{SignedRequest, SnsRequestBuilder};
pub use response::{parse_publish_response, PublishOutcome};

use async_trait::async_trait;
use sms_core::{HttpTransport, SendRequest, SendResponse, SmsError, SmsGateway};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info};

const PROVIDER: &str = "aws-sns";

/// AWS SNS SMS gateway
#[derive(Clone)]
pub struct AwsSnsGateway {
    config: SnsConfig,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for AwsSnsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSnsGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AwsSnsGateway {
    pub fn new(config: SnsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &SnsConfig {
        &self.config
    }

    /// Publish one SMS, signing as of `now`.
    pub async fn publish_at(
        &self,
        req: SendRequest<'_>,
        now: OffsetDateTime,
    ) -> Result<SendResponse, SmsError> {
        info!("Sending SMS via AWS SNS to {}", req.to);

        let signed = SnsRequestBuilder::new(&self.config).build_at(req.to, req.text, now)?;
        let url = signed.url.clone();
        debug!(
            amz_date = %signed.context.amz_date,
            scope = %signed.context.credential_scope(),
            "signed SNS publish request"
        );

        let res = self
            .transport
            .post(&url, signed.into_post())
            .await
            .map_err(|e| {
                error!("AWS SNS publish failed: {}", e);
                e
            })?;

        let outcome = parse_publish_response(&res)?;
        info!(
            "SMS sent successfully via AWS SNS with MessageId: {}",
            outcome.message_id
        );

        let raw = serde_json::json!({
            "MessageId": outcome.message_id,
            "RequestId": outcome.request_id,
            "Region": self.config.region,
            "HTTPStatusCode": res.status,
        });

        Ok(SendResponse {
            id: outcome.message_id,
            provider: PROVIDER,
            raw,
        })
    }
}

#[async_trait]
impl SmsGateway for AwsSnsGateway {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn dispatch(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        self.publish_at(req, OffsetDateTime::now_utc()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_core::{CallbackRequest, Headers, HttpResponse, PostRequest};
    use std::sync::Mutex;
    use time::macros::datetime;

    /// Records the last request and answers with a canned response.
    struct Recorder {
        answer: Result<HttpResponse, String>,
        seen: Mutex<Option<(String, PostRequest)>>,
    }

    impl Recorder {
        fn answering(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: Mutex::new(None),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Err(reason.to_string()),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for Recorder {
        async fn post(&self, url: &str, req: PostRequest) -> Result<HttpResponse, SmsError> {
            *self.seen.lock().unwrap() = Some((url.to_string(), req));
            self.answer.clone().map_err(SmsError::Http)
        }
    }

    const ACCEPTED: &str =
        "<PublishResponse><PublishResult><MessageId>abc-123</MessageId></PublishResult></PublishResponse>";

    fn gateway(transport: Arc<Recorder>) -> AwsSnsGateway {
        AwsSnsGateway::new(
            SnsConfig::new(
                "us-east-1",
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
                "ACME",
            ),
            transport,
        )
    }

    #[tokio::test]
    async fn send_returns_true_on_message_id() {
        let transport = Recorder::answering(200, ACCEPTED);
        let gw = gateway(transport.clone());
        assert!(gw.send("+15551234567", "hi").await);

        let (url, req) = transport.seen.lock().unwrap().take().unwrap();
        assert_eq!(url, "https://sns.us-east-1.amazonaws.com/");
        assert!(req.allow_redirects);
        assert!(!req.http_errors);
        let body = String::from_utf8(req.body).unwrap();
        assert!(body.starts_with("Action=Publish&PhoneNumber=%2B15551234567&Message=hi&"));
    }

    #[tokio::test]
    async fn send_returns_false_on_empty_message_id() {
        let gw = gateway(Recorder::answering(
            200,
            "<PublishResponse><PublishResult><MessageId/></PublishResult></PublishResponse>",
        ));
        assert!(!gw.send("+15551234567", "hi").await);
    }

    #[tokio::test]
    async fn send_returns_false_on_malformed_xml() {
        let gw = gateway(Recorder::answering(200, "<PublishResponse><oops"));
        assert!(!gw.send("+15551234567", "hi").await);
    }

    #[tokio::test]
    async fn transport_failure_is_contained() {
        let gw = gateway(Recorder::failing("dns error"));
        assert!(!gw.send("+15551234567", "hi").await);

        let err = gw
            .dispatch(SendRequest {
                to: "+15551234567",
                text: "hi",
            })
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn dispatch_reports_message_and_request_ids() {
        let gw = gateway(Recorder::answering(
            200,
            "<PublishResponse><PublishResult><MessageId>abc-123</MessageId></PublishResult>\
             <ResponseMetadata><RequestId>req-9</RequestId></ResponseMetadata></PublishResponse>",
        ));
        let res = gw
            .publish_at(
                SendRequest {
                    to: "+15551234567",
                    text: "hi",
                },
                datetime!(2025-03-24 12:36:00 UTC),
            )
            .await
            .unwrap();
        assert_eq!(res.id.as_str(), "abc-123");
        assert_eq!(res.provider, "aws-sns");
        assert_eq!(res.raw["RequestId"], "req-9");
        assert_eq!(res.raw["HTTPStatusCode"], 200);
    }

    #[tokio::test]
    async fn signed_headers_reach_the_transport() {
        let transport = Recorder::answering(200, ACCEPTED);
        let gw = gateway(transport.clone());
        gw.publish_at(
            SendRequest {
                to: "+15551234567",
                text: "hi",
            },
            datetime!(2025-03-24 12:36:00 UTC),
        )
        .await
        .unwrap();

        let (_, req) = transport.seen.lock().unwrap().take().unwrap();
        let header = |name: &str| {
            req.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };
        assert_eq!(header("x-amz-date").as_deref(), Some("20250324T123600Z"));
        assert_eq!(
            header("content-type").as_deref(),
            Some("application/x-www-form-urlencoded; charset=utf-8")
        );
        assert!(header("authorization")
            .unwrap()
            .contains("SignedHeaders=content-type;host;x-amz-date"));
    }

    #[test]
    fn callbacks_are_unsupported() {
        let gw = gateway(Recorder::answering(200, ACCEPTED));
        assert_eq!(gw.provider(), "aws-sns");
        assert!(!gw.capabilities().callbacks);

        let headers: Headers = vec![];
        let err = gw
            .callback(CallbackRequest {
                headers: &headers,
                body: b"{}",
            })
            .unwrap_err();
        assert!(matches!(err, SmsError::Unsupported("aws-sns")));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let gw = gateway(Recorder::answering(200, ACCEPTED));
        assert!(!format!("{:?}", gw).contains("wJalrXUtnFEMI"));
    }
}
