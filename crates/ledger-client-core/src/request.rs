//! Outbound call descriptors.
//!
//! A [`RequestDescriptor`] is assembled once through [`RequestBuilder`] and is
//! read-only afterwards. The pagination walker derives follow-up requests with
//! [`RequestDescriptor::with_param`], which returns a new descriptor.

use std::borrow::Cow;
use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

pub const CONTENT_TYPE_JSON: &str = "application/json";

// ==============================================================================
// Query Parameter Names
// ==============================================================================

pub const PARAM_LEDGER_VERSION: &str = "ledger_version";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_START: &str = "start";
pub const PARAM_WITH_TRANSACTIONS: &str = "with_transactions";

// ==============================================================================
// Call Overrides
// ==============================================================================

/// Per-call settings layered over the client's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOverrides {
    pub auth_token: Option<String>,
    pub headers: HeaderMap,
    pub with_credentials: Option<bool>,
}

impl CallOverrides {
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_credentials(mut self, forward: bool) -> Self {
        self.with_credentials = Some(forward);
        self
    }

    /// Combine with `defaults`; values set on `self` take precedence and
    /// headers with the same name replace the default ones.
    pub fn merged_over(&self, defaults: &CallOverrides) -> CallOverrides {
        let mut headers = defaults.headers.clone();
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        CallOverrides {
            auth_token: self
                .auth_token
                .clone()
                .or_else(|| defaults.auth_token.clone()),
            headers,
            with_credentials: self.with_credentials.or(defaults.with_credentials),
        }
    }

    pub fn forwards_credentials(&self) -> bool {
        self.with_credentials.unwrap_or(false)
    }
}

// ==============================================================================
// Query Options
// ==============================================================================

/// Options for point lookups and cursor-paginated listings.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Read state as of this ledger version instead of the latest one.
    pub ledger_version: Option<u64>,
    /// Page size requested from the node.
    pub limit: Option<u16>,
    pub overrides: Option<CallOverrides>,
}

impl QueryOptions {
    pub fn at_version(ledger_version: u64) -> Self {
        Self {
            ledger_version: Some(ledger_version),
            ..Self::default()
        }
    }
}

/// Options for offset-paginated transaction listings.
#[derive(Debug, Clone, Default)]
pub struct RangeOptions {
    pub start: Option<u64>,
    pub limit: Option<u16>,
    pub overrides: Option<CallOverrides>,
}

// ==============================================================================
// Request Descriptor
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    base_url: Url,
    endpoint: Option<String>,
    body: Option<serde_json::Value>,
    content_type: Option<String>,
    params: Vec<(Cow<'static, str>, String)>,
    overrides: CallOverrides,
}

impl RequestDescriptor {
    pub fn builder(method: Method, base_url: Url) -> RequestBuilder {
        RequestBuilder {
            inner: RequestDescriptor {
                method,
                base_url,
                endpoint: None,
                body: None,
                content_type: None,
                params: Vec::new(),
                overrides: CallOverrides::default(),
            },
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn params(&self) -> &[(Cow<'static, str>, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn overrides(&self) -> &CallOverrides {
        &self.overrides
    }

    /// A copy of this descriptor with `name` set to `value`.
    pub fn with_param(&self, name: &'static str, value: impl fmt::Display) -> Self {
        let mut next = self.clone();
        set_param(&mut next.params, Cow::Borrowed(name), value.to_string());
        next
    }

    /// Full URL: base joined with the endpoint, followed by the query string.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let joined = match self.endpoint.as_deref() {
            Some(endpoint) if !endpoint.is_empty() => format!(
                "{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            ),
            _ => self.base_url.as_str().to_owned(),
        };
        let mut url = Url::parse(&joined)?;
        if !self.params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &self.params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.url() {
            Ok(url) => write!(f, "{} {url}", self.method),
            Err(_) => write!(
                f,
                "{} {}{}",
                self.method,
                self.base_url,
                self.endpoint.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn set_param(params: &mut Vec<(Cow<'static, str>, String)>, name: Cow<'static, str>, value: String) {
    match params.iter_mut().find(|(key, _)| *key == name) {
        Some(existing) => existing.1 = value,
        None => params.push((name, value)),
    }
}

// ==============================================================================
// Request Builder
// ==============================================================================

#[derive(Debug)]
pub struct RequestBuilder {
    inner: RequestDescriptor,
}

impl RequestBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner.endpoint = Some(endpoint.into());
        self
    }

    /// Add a query parameter when `value` is present; `None` is dropped, not
    /// sent as an empty string.
    pub fn param<V: fmt::Display>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            set_param(&mut self.inner.params, Cow::Borrowed(name), value.to_string());
        }
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.inner.body = Some(body);
        self.inner.content_type = Some(CONTENT_TYPE_JSON.to_owned());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.inner.content_type = Some(content_type.into());
        self
    }

    pub fn overrides(mut self, overrides: CallOverrides) -> Self {
        self.inner.overrides = overrides;
        self
    }

    pub fn build(self) -> RequestDescriptor {
        self.inner
    }
}
