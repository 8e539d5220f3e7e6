//! Error taxonomy for the request pipeline.
//!
//! Every failure a call can produce is one variant of [`ClientError`]. Each
//! variant wraps a struct carrying its own structured fields, so callers
//! match on the variant instead of parsing messages.

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::request::RequestDescriptor;

// ==============================================================================
// Client Error
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(Box<ApiError>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    PaginationExhausted(Box<PaginationExhausted>),
}

impl ClientError {
    /// Short, stable name of the variant for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_error",
            Self::Api(_) => "api_error",
            Self::Parse(_) => "parse_error",
            Self::Format(_) => "format_error",
            Self::PaginationExhausted(_) => "pagination_exhausted",
        }
    }

    /// Only transport failures are worth retrying; the core itself never does.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_retryable())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Parse(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

impl From<PaginationExhausted> for ClientError {
    fn from(err: PaginationExhausted) -> Self {
        Self::PaginationExhausted(Box::new(err))
    }
}

// ==============================================================================
// Transport Error
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    /// The request could not be sent (builder or protocol failure).
    Request,
    /// The response head arrived but the body could not be read.
    Body,
    /// The descriptor could not be turned into a valid URL.
    InvalidRequest,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::Request => write!(f, "request"),
            Self::Body => write!(f, "body"),
            Self::InvalidRequest => write!(f, "invalid request"),
        }
    }
}

/// No response envelope was obtained.
#[derive(Debug, thiserror::Error)]
#[error("transport error ({kind}) for {url}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Classify a `reqwest` failure raised while sending or reading a call.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportErrorKind::Timeout
        } else if source.is_connect() {
            TransportErrorKind::Connect
        } else if source.is_body() || source.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, url, source.to_string())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Timeout | TransportErrorKind::Connect
        )
    }
}

// ==============================================================================
// API Error
// ==============================================================================

/// Decoded error body: JSON when it parses, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
}

impl ErrorBody {
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_owned()),
        }
    }

    fn json_str(&self, field: &str) -> Option<&str> {
        match self {
            Self::Json(value) => value.get(field).and_then(serde_json::Value::as_str),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// The node answered with a non-success status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub status_text: String,
    pub body: ErrorBody,
    pub url: String,
    /// The call that produced this error, kept for diagnostics.
    pub request: RequestDescriptor,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from {}: {}",
            self.status.as_u16(),
            self.status_text,
            self.url,
            self.message().unwrap_or("no message")
        )
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn message(&self) -> Option<&str> {
        self.body.json_str("message")
    }

    pub fn error_code(&self) -> Option<&str> {
        self.body.json_str("error_code")
    }

    pub fn vm_error_code(&self) -> Option<u64> {
        match &self.body {
            ErrorBody::Json(value) => value.get("vm_error_code").and_then(serde_json::Value::as_u64),
            ErrorBody::Text(_) => None,
        }
    }
}

// ==============================================================================
// Parse Error
// ==============================================================================

/// A success status whose body could not be decoded into the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {target} from {url} (status {}): {message}", .status.as_u16())]
pub struct ParseError {
    pub status: StatusCode,
    pub url: String,
    pub target: &'static str,
    pub message: String,
}

impl ParseError {
    pub fn new(
        status: StatusCode,
        url: impl Into<String>,
        target: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            url: url.into(),
            target,
            message: message.into(),
        }
    }
}

// ==============================================================================
// Format Error
// ==============================================================================

/// Malformed address or hash input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex input `{input}`: {reason}")]
pub struct FormatError {
    pub input: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// ==============================================================================
// Pagination Exhausted
// ==============================================================================

/// The cursor walk hit its request bound before the server stopped paging.
#[derive(Debug, thiserror::Error)]
#[error("pagination exceeded {requests} requests (last cursor `{last_cursor}`, {} items gathered)", .partial.len())]
pub struct PaginationExhausted {
    pub requests: usize,
    pub last_cursor: String,
    /// Items gathered before the bound, in server order.
    pub partial: Vec<serde_json::Value>,
}

impl PaginationExhausted {
    pub fn decode_partial<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.partial
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect()
    }
}

// ==============================================================================
// Config Error
// ==============================================================================

/// Failure while building a client; never returned by individual calls.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid node URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported node URL scheme `{0}`; expected http or https")]
    UnsupportedScheme(String),

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("auth token file {path}: {reason}")]
    TokenFile { path: String, reason: String },

    #[error("requests_per_second must be at least 1")]
    InvalidRateLimit,

    #[error("max_pages must be at least 1")]
    InvalidPageBound,

    #[error("unknown network `{0}`; expected mainnet, testnet, devnet or local")]
    UnknownNetwork(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
