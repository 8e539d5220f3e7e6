//! Client configuration: node URL, default call overrides and limits.
//!
//! A [`ClientConfig`] is built once and handed to the client; there is no
//! process-wide default.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

use crate::error::ConfigError;
use crate::request::CallOverrides;

/// Upper bound on requests issued by a single cursor walk.
pub const DEFAULT_MAX_PAGES: usize = 1_000;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ==============================================================================
// Network
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    pub fn node_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            Self::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
            Self::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            Self::Local => "http://127.0.0.1:8080/v1",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::Devnet => write!(f, "devnet"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "local" | "localnet" => Ok(Self::Local),
            other => Err(ConfigError::UnknownNetwork(other.to_owned())),
        }
    }
}

// ==============================================================================
// Client Config
// ==============================================================================

#[derive(Debug, Clone)]
pub struct ClientConfig {
    node_url: Url,
    defaults: CallOverrides,
    requests_per_second: Option<u32>,
    connect_timeout: Duration,
    request_timeout: Duration,
    max_pages: usize,
}

impl ClientConfig {
    /// Configuration for an explicit node URL such as `https://host/v1`.
    pub fn new(node_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            node_url: parse_node_url(node_url)?,
            defaults: CallOverrides::default(),
            requests_per_second: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    pub fn for_network(network: Network) -> Self {
        Self {
            node_url: Url::parse(network.node_url()).expect("network node URLs are valid static config"),
            defaults: CallOverrides::default(),
            requests_per_second: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.defaults.auth_token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;
        self.defaults.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_credentials(mut self, forward: bool) -> Self {
        self.defaults.with_credentials = Some(forward);
        self
    }

    /// Rate-limit outbound HTTP requests; each page of a walk counts once.
    pub fn with_requests_per_second(mut self, limit: u32) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidRateLimit);
        }
        self.requests_per_second = Some(limit);
        Ok(self)
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Result<Self, ConfigError> {
        if max_pages == 0 {
            return Err(ConfigError::InvalidPageBound);
        }
        self.max_pages = max_pages;
        Ok(self)
    }

    pub fn node_url(&self) -> &Url {
        &self.node_url
    }

    pub fn defaults(&self) -> &CallOverrides {
        &self.defaults
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.defaults.headers
    }

    pub fn requests_per_second(&self) -> Option<u32> {
        self.requests_per_second
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

// ==============================================================================
// Connection Helpers
// ==============================================================================

pub(crate) fn parse_node_url(node_url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(node_url).map_err(|e| ConfigError::InvalidUrl {
        url: node_url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
}

/// Pick the auth token: an explicit value wins over a token file, whose
/// first non-empty line is the token.
pub fn resolve_auth_token(
    token: Option<&str>,
    token_file: Option<&Path>,
) -> Result<Option<String>, ConfigError> {
    if let Some(token) = token {
        return Ok(Some(token.to_owned()));
    }

    let Some(token_file) = token_file else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(token_file).map_err(|e| ConfigError::TokenFile {
        path: token_file.display().to_string(),
        reason: e.to_string(),
    })?;
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ConfigError::TokenFile {
            path: token_file.display().to_string(),
            reason: "file is empty".to_owned(),
        })?;

    Ok(Some(line.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn parse_node_url_http_url() {
        let parsed = parse_node_url("http://127.0.0.1:8080/v1").expect("should parse");
        assert_eq!(parsed.as_str(), "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn parse_node_url_invalid_scheme() {
        let err = parse_node_url("ftp://example.com").expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported node URL scheme"));
    }

    #[test]
    fn network_urls_parse_as_node_urls() {
        for network in [
            Network::Mainnet,
            Network::Testnet,
            Network::Devnet,
            Network::Local,
        ] {
            let config = ClientConfig::for_network(network);
            assert_eq!(config.node_url().as_str(), network.node_url());
            assert_eq!(network.to_string().parse::<Network>().ok(), Some(network));
        }
        assert!("moonnet".parse::<Network>().is_err());
    }

    #[test]
    fn builder_rejects_zero_limits() {
        let config = ClientConfig::new("http://localhost:8080/v1").expect("valid url");
        assert!(matches!(
            config.clone().with_requests_per_second(0),
            Err(ConfigError::InvalidRateLimit)
        ));
        assert!(matches!(
            config.with_max_pages(0),
            Err(ConfigError::InvalidPageBound)
        ));
    }

    #[test]
    fn with_header_rejects_invalid_names() {
        let config = ClientConfig::new("http://localhost:8080/v1").expect("valid url");
        let err = config
            .with_header("bad header", "x")
            .expect_err("space in name");
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn resolve_auth_token_prefers_explicit_value() {
        let token = resolve_auth_token(Some("secret"), Some(Path::new("/nonexistent")))
            .expect("explicit token wins");
        assert_eq!(token.as_deref(), Some("secret"));
        assert_eq!(resolve_auth_token(None, None).expect("no auth"), None);
    }

    #[test]
    fn resolve_auth_token_reads_token_file() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time must be after unix epoch")
            .as_nanos();
        let token_path = std::env::temp_dir().join(format!("ledger-client-token-{unique}.txt"));
        fs::write(&token_path, "\n  aptoslabs_token  \n").expect("token file must be writable");

        let token = resolve_auth_token(None, Some(&token_path)).expect("token must parse");
        assert_eq!(token.as_deref(), Some("aptoslabs_token"));

        fs::write(&token_path, "\n\n").expect("token file must be writable");
        let err = resolve_auth_token(None, Some(&token_path)).expect_err("empty file");
        assert!(err.to_string().contains("empty"));

        let _ = fs::remove_file(token_path);
    }
}
