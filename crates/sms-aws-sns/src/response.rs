//! Reading SNS `Publish` answers.
//!
//! Only success detection is done here: a non-empty
//! `PublishResponse/PublishResult/MessageId` means the message was accepted.
//! Error documents are read just far enough to tell authentication failures
//! apart from other rejections.

use quick_xml::de;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use sms_core::{HttpResponse, MessageId, SmsError};

/// Error codes SNS answers when the signature, credentials or clock are wrong.
const AUTH_ERROR_CODES: &[&str] = &[
    "AuthorizationError",
    "IncompleteSignature",
    "InvalidAccessKeyId",
    "InvalidClientTokenId",
    "MissingAuthenticationToken",
    "RequestExpired",
    "SignatureDoesNotMatch",
];

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PublishResponse {
    publish_result: PublishResult,
    response_metadata: ResponseMetadata,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PublishResult {
    message_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ResponseMetadata {
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponse {
    error: ErrorDetail,
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

/// An accepted `Publish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub message_id: MessageId,
    pub request_id: Option<String>,
}

/// Require exactly one root element, with nothing but whitespace, comments
/// or processing instructions around it.
fn ensure_single_root(body: &str) -> Result<(), SmsError> {
    let malformed = |what: String| SmsError::Malformed(format!("xml: {}", what));
    let mut reader = Reader::from_str(body);
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(_) => {
                if depth == 0 && seen_root {
                    return Err(malformed("extra content after the root element".into()));
                }
                depth += 1;
                seen_root = true;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) => {
                if depth == 0 && seen_root {
                    return Err(malformed("extra content after the root element".into()));
                }
                seen_root = true;
            }
            Event::Text(text) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(malformed("text outside the root element".into()));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(malformed("text outside the root element".into()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed("no root element".into()));
    }
    if depth != 0 {
        return Err(malformed("unclosed root element".into()));
    }
    Ok(())
}

/// Decide whether SNS accepted the message.
///
/// A whitespace-only `MessageId` counts as missing. A document repeating
/// `PublishResult` is rejected as malformed rather than read first-wins.
pub fn parse_publish_response(res: &HttpResponse) -> Result<PublishOutcome, SmsError> {
    let body = res.body.trim();
    if body.is_empty() {
        return Err(SmsError::Provider(format!(
            "HTTP {} with empty body",
            res.status
        )));
    }
    if !body.starts_with('<') {
        return Err(SmsError::Malformed(format!(
            "HTTP {}: expected an XML document",
            res.status
        )));
    }

    ensure_single_root(body)?;
    let publish: PublishResponse =
        de::from_str(body).map_err(|e| SmsError::Malformed(format!("xml: {}", e)))?;

    let message_id = publish.publish_result.message_id.trim();
    if !message_id.is_empty() {
        let request_id = publish.response_metadata.request_id;
        return Ok(PublishOutcome {
            message_id: MessageId(message_id.to_string()),
            request_id: (!request_id.is_empty()).then_some(request_id),
        });
    }

    // The document parsed as a publish answer, so it parses as an error one too.
    let error: ErrorResponse = de::from_str(body).unwrap_or_default();
    let code = error.error.code;
    if code.is_empty() {
        return Err(SmsError::Provider(format!(
            "HTTP {}: response carries no MessageId",
            res.status
        )));
    }

    let detail = format!(
        "{}: {} (HTTP {}, request {})",
        code, error.error.message, res.status, error.request_id
    );
    if AUTH_ERROR_CODES.contains(&code.as_str()) {
        Err(SmsError::Auth(detail))
    } else {
        Err(SmsError::Provider(detail))
    }
}
