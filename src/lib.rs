//! # smsgate
//!
//! Pluggable outbound SMS gateways for dispatch systems that only need to ask
//! "was this SMS accepted?".
//!
//! ## Features
//!
//! - **Gateway trait**: every provider exposes `send(phone, message) -> bool`
//!   plus a diagnostic `dispatch` that keeps the error kind
//! - **AWS SNS without the SDK**: `Publish` calls are signed by a built-in
//!   AWS Signature Version 4 implementation
//! - **Injected transport**: gateways post through an [`sms_core::HttpTransport`]
//!   supplied by the host (reqwest by default)
//! - **Delivery callbacks**: an optional capability; gateways without it
//!   answer `callback` with [`sms_core::SmsError::Unsupported`]
//! - **Configuration**: layered files and environment variables
//! - **Observability**: structured logging via `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smsgate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = AppConfig::load()?;
//!     smsgate::logging::init(&config.logging)?;
//!
//!     let registry = smsgate::gateways_from_config(&config)?;
//!     if let Some(sns) = registry.get("aws-sns") {
//!         let delivered = sns.send("+15551234567", "Hello from smsgate!").await;
//!         println!("accepted: {delivered}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! # config/default.toml
//! [gateways.aws_sns]
//! region = "us-east-1"
//! access_key = "AKID..."
//! secret_key = "..."
//! sender_id = "ACME"
//! ```
//!
//! Every key can be overridden from the environment, e.g.
//! `SMSGATE__GATEWAYS__AWS_SNS__REGION=eu-west-1`.

pub mod config;
pub mod logging;

pub use crate::config::*;

use sms_aws_sns::AwsSnsGateway;
use sms_core::{GatewayRegistry, HttpTransport, ReqwestTransport, SmsError};
use std::sync::Arc;
use tracing::info;

/// Build every configured gateway on top of one reqwest transport.
pub fn gateways_from_config(config: &AppConfig) -> Result<GatewayRegistry, SmsError> {
    let transport = ReqwestTransport::from_config(&config.http)?;
    Ok(gateways_with_transport(config, Arc::new(transport)))
}

/// Build every configured gateway on top of a caller supplied transport.
pub fn gateways_with_transport(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
) -> GatewayRegistry {
    let mut registry = GatewayRegistry::new();
    if let Some(sns) = &config.gateways.aws_sns {
        info!(region = %sns.region, "registering aws-sns gateway");
        registry = registry.with(Arc::new(AwsSnsGateway::new(sns.clone(), transport)));
    }
    registry
}

/// Common imports for smsgate usage
pub mod prelude {
    pub use crate::config::{AppConfig, GatewaysConfig, HttpConfig, LoggingConfig};
    pub use sms_aws_sns::{AwsSnsGateway, SmsType, SnsConfig};
    pub use sms_core::*;
}
