//! # SMS Core
//!
//! Core traits and types for the smsgate pluggable SMS gateways.
//!
//! This crate provides the fundamental building blocks for SMS operations:
//! - [`SmsGateway`] trait for sending SMS messages and answering delivery callbacks
//! - [`HttpTransport`] trait for the injected outbound HTTP client
//! - Common types for requests, responses, and errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::SmsGateway;
//!
//! // Any gateway implements SmsGateway
//! let delivered = gateway.send("+15551234567", "Hello world!").await;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

pub mod transport;

pub use transport::{HttpConfig, HttpResponse, HttpTransport, PostRequest};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;

/// Errors that can occur during SMS operations
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// HTTP communication error (network, DNS, TLS)
    #[error("http error: {0}")]
    Http(String),
    /// The provider rejected our credentials or signature
    #[error("authentication error: {0}")]
    Auth(String),
    /// Invalid request parameters
    #[error("invalid request: {0}")]
    Invalid(String),
    /// SMS provider returned an error
    #[error("provider error: {0}")]
    Provider(String),
    /// Provider response could not be parsed
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The gateway does not offer the requested operation
    #[error("operation not supported by {0}")]
    Unsupported(&'static str),
    /// Unexpected error occurred
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl SmsError {
    /// Whether the provider refused the request because of credentials, signature or clock skew.
    pub fn is_auth(&self) -> bool {
        matches!(self, SmsError::Auth(_))
    }

    /// Whether the request never produced a provider answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, SmsError::Http(_))
    }
}

/// Identifier a provider assigns to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        MessageId(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest<'a> {
    /// Recipient in E.164 format.
    pub to: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: MessageId,
    /// Name of the gateway that produced the response, e.g. "aws-sns".
    pub provider: &'static str,
    /// Raw provider payload for debugging / audit.
    pub raw: serde_json::Value,
}

/// Optional operations a gateway may offer on top of `send`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The provider pushes delivery status callbacks that `callback` can parse.
    pub callbacks: bool,
}

/// Lightweight header representation to avoid tying the core to any HTTP framework.
pub type Headers = Vec<(String, String)>;

/// Inbound status callback as received by the hosting system.
#[derive(Debug, Clone, Copy)]
pub struct CallbackRequest<'a> {
    pub headers: &'a Headers,
    pub body: &'a [u8],
}

/// An outbound SMS gateway.
///
/// Implementors provide [`SmsGateway::dispatch`], which reports the precise
/// failure; [`SmsGateway::send`] is the boolean boundary used by dispatch
/// systems that only care whether the message was accepted.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Stable provider key, e.g., "aws-sns".
    fn provider(&self) -> &'static str;

    /// Send a single text SMS and report why it failed, if it did.
    async fn dispatch(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError>;

    /// Send a single text SMS. Never fails loudly: every error becomes `false`.
    async fn send(&self, phone: &str, message: &str) -> bool {
        match self
            .dispatch(SendRequest {
                to: phone,
                text: message,
            })
            .await
        {
            Ok(res) => {
                info!(provider = res.provider, message_id = %res.id, "sms accepted");
                true
            }
            Err(e) => {
                warn!(provider = self.provider(), error = %e, "sms send failed");
                false
            }
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Parse a provider status callback into the id of the message it refers to.
    ///
    /// Gateways without callbacks answer [`SmsError::Unsupported`].
    fn callback(&self, _req: CallbackRequest<'_>) -> Result<Option<MessageId>, SmsError> {
        Err(SmsError::Unsupported(self.provider()))
    }
}

use std::collections::HashMap;
use std::sync::Arc;

/// Runtime registry so apps can register any combination of gateways and look them up by key.
#[derive(Default, Clone)]
pub struct GatewayRegistry {
    map: Arc<HashMap<&'static str, Arc<dyn SmsGateway>>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self {
            map: Arc::new(HashMap::new()),
        }
    }

    pub fn with(mut self, gateway: Arc<dyn SmsGateway>) -> Self {
        let mut m = (*self.map).clone();
        m.insert(gateway.provider(), gateway);
        self.map = Arc::new(m);
        self
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn SmsGateway>> {
        self.map.get(provider).cloned()
    }

    pub fn providers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
