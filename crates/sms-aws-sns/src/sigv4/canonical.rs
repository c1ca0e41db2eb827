use super::hex_sha256;
use sms_core::Headers;
use std::fmt;

/// Ordered header name → value mapping.
///
/// The canonical header block keeps insertion order; only the signed-headers
/// list is sorted. Callers insert headers in the order they want signed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing an existing one of the same name (ignoring
    /// case) in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lower-cased names, sorted and joined with `;`.
    pub fn signed_headers(&self) -> String {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .map(|(k, _)| k.to_ascii_lowercase())
            .collect();
        names.sort();
        names.join(";")
    }

    /// One `name:value\n` line per header, in insertion order.
    pub fn canonical_block(&self) -> String {
        let mut block = String::with_capacity(128);
        for (k, v) in &self.entries {
            block.push_str(&k.to_ascii_lowercase());
            block.push(':');
            block.push_str(v.trim());
            block.push('\n');
        }
        block
    }

    pub fn into_headers(self) -> Headers {
        self.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// The signing input describing one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    text: String,
    signed_headers: String,
}

impl CanonicalRequest {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    pub fn hashed(&self) -> String {
        hex_sha256(self.text.as_bytes())
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the canonical request:
///
/// ```text
/// POST
/// /
/// <query>
/// content-type:...
/// host:...
/// x-amz-date:...
///
/// content-type;host;x-amz-date
/// <hex sha256 of payload>
/// ```
///
/// Pure over its inputs; the caller captures the clock into `x-amz-date`.
pub fn build_canonical_request(
    method: &str,
    uri_path: &str,
    query_string: &str,
    headers: &HeaderSet,
    payload: &[u8],
) -> CanonicalRequest {
    let signed_headers = headers.signed_headers();
    let payload_hash = hex_sha256(payload);

    let text = format!(
        "{method}\n{uri_path}\n{query_string}\n{}\n{signed_headers}\n{payload_hash}",
        headers.canonical_block()
    );

    CanonicalRequest {
        text,
        signed_headers,
    }
}
