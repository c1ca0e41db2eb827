//! Outbound HTTP seam.
//!
//! Gateways never own a concrete HTTP stack; the hosting system injects an
//! [`HttpTransport`] and gateways hand it fully prepared requests.

use crate::{Headers, SmsError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Allow requests that ask for it to follow 3xx responses (default: true)
    pub follow_redirects: bool,
    /// User-Agent sent to providers (default: smsgate/<version>)
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            follow_redirects: true,
            user_agent: concat!("smsgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A fully prepared POST request.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Follow 3xx responses.
    pub allow_redirects: bool,
    /// Turn non-2xx statuses into [`SmsError::Http`]. Gateways that inspect the
    /// body themselves leave this off.
    pub http_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, url: &str, req: PostRequest) -> Result<HttpResponse, SmsError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_impl::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use reqwest::redirect::Policy;
    use tracing::{debug, error};

    /// [`HttpTransport`] backed by reqwest.
    ///
    /// Two clients are kept because reqwest fixes its redirect policy at build time.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        follow: reqwest::Client,
        no_follow: reqwest::Client,
        follow_redirects: bool,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SmsError> {
            Self::from_config(&HttpConfig {
                timeout_seconds: timeout.as_secs(),
                user_agent: user_agent.to_string(),
                ..HttpConfig::default()
            })
        }

        /// With `follow_redirects` off, no request follows redirects whatever it asks for.
        pub fn from_config(config: &HttpConfig) -> Result<Self, SmsError> {
            let build = |policy: Policy| {
                reqwest::Client::builder()
                    .timeout(config.timeout())
                    .user_agent(config.user_agent.as_str())
                    .redirect(policy)
                    .build()
                    .map_err(|e| SmsError::Http(format!("failed to build http client: {}", e)))
            };
            let follow_policy = if config.follow_redirects {
                Policy::default()
            } else {
                Policy::none()
            };
            Ok(Self {
                follow: build(follow_policy)?,
                no_follow: build(Policy::none())?,
                follow_redirects: config.follow_redirects,
            })
        }

        pub fn follows_redirects(&self) -> bool {
            self.follow_redirects
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn post(&self, url: &str, req: PostRequest) -> Result<HttpResponse, SmsError> {
            let client = if req.allow_redirects {
                &self.follow
            } else {
                &self.no_follow
            };

            let mut builder = client.post(url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let res = builder.body(req.body).send().await.map_err(|e| {
                error!("POST {} failed: {}", url, e);
                SmsError::Http(e.to_string())
            })?;

            let status = res.status().as_u16();
            let body = res
                .text()
                .await
                .map_err(|e| SmsError::Http(e.to_string()))?;
            debug!(status, len = body.len(), "received response from {}", url);

            let response = HttpResponse { status, body };
            if req.http_errors && !response.is_success() {
                return Err(SmsError::Http(format!(
                    "HTTP {}: {}",
                    response.status, response.body
                )));
            }
            Ok(response)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn builds_both_clients() {
            let transport = ReqwestTransport::new(Duration::from_secs(5), "smsgate-test").unwrap();
            assert!(transport.follows_redirects());
        }

        #[test]
        fn from_config_honours_follow_redirects() {
            let config = HttpConfig {
                follow_redirects: false,
                ..HttpConfig::default()
            };
            let transport = ReqwestTransport::from_config(&config).unwrap();
            assert!(!transport.follows_redirects());
        }
    }
}
