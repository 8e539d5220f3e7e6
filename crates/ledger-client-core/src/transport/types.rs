//! Normalized response wrapper shared by every transport.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::request::RequestDescriptor;

// ==============================================================================
// Response Envelope
// ==============================================================================

/// One HTTP response, undecoded, together with the call that produced it.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    /// Final URL the response came from.
    pub url: String,
    pub body: String,
    pub request: RequestDescriptor,
}

impl ResponseEnvelope {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        url: impl Into<String>,
        body: impl Into<String>,
        request: RequestDescriptor,
    ) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            url: url.into(),
            body: body.into(),
            request,
        }
    }

    /// Header value as text; absent or non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use reqwest::{Method, Url};

    use super::*;

    #[test]
    fn envelope_exposes_text_headers_and_reason() {
        let request = RequestDescriptor::builder(
            Method::GET,
            Url::parse("http://node/v1").expect("static url"),
        )
        .build();
        let mut headers = HeaderMap::new();
        headers.insert("x-aptos-cursor", HeaderValue::from_static("abc"));

        let envelope = ResponseEnvelope::new(
            StatusCode::NOT_FOUND,
            headers,
            "http://node/v1",
            "{}",
            request,
        );
        assert_eq!(envelope.status_text, "Not Found");
        assert_eq!(envelope.header("x-aptos-cursor"), Some("abc"));
        assert_eq!(envelope.header("x-missing"), None);
        assert!(!envelope.is_success());
    }
}
