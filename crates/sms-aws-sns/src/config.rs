use crate::sigv4::Credentials;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SNS `AWS.SNS.SMS.SMSType` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SmsType {
    Transactional,
    Promotional,
}

impl SmsType {
    pub fn as_str(self) -> &'static str {
        match self {
            SmsType::Transactional => "Transactional",
            SmsType::Promotional => "Promotional",
        }
    }
}

/// AWS SNS gateway configuration.
///
/// Values are opaque: nothing here is validated, AWS rejects what it does not
/// accept.
#[derive(Clone, Deserialize, Serialize)]
pub struct SnsConfig {
    /// AWS Region, e.g. `us-east-1`
    pub region: String,
    /// AWS Access Key ID
    pub access_key: String,
    /// AWS Secret Access Key
    pub secret_key: String,
    /// Alphanumeric sender ID (up to 11 characters); omitted when empty
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sms_type: Option<SmsType>,
    /// Override of `https://sns.<region>.amazonaws.com/`
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl SnsConfig {
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        sender_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            sender_id: sender_id.into(),
            sms_type: None,
            endpoint: None,
        }
    }

    pub fn with_sms_type(mut self, sms_type: SmsType) -> Self {
        self.sms_type = Some(sms_type);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://sns.{}.amazonaws.com/", self.region),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.access_key, &self.secret_key)
    }
}

impl fmt::Debug for SnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnsConfig")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("sender_id", &self.sender_id)
            .field("sms_type", &self.sms_type)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
