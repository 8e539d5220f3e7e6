//! `reqwest` transport for the node's REST API.
//!
//! Applies the descriptor's overrides (extra headers, bearer token,
//! credential forwarding), optional client-side rate limiting, and reads the
//! whole body as text for the error translator to decode.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header::{self, HeaderValue};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError, TransportErrorKind};
use crate::request::{RequestDescriptor, CONTENT_TYPE_JSON};

use super::types::ResponseEnvelope;
use super::{Transport, CLIENT_HEADER, CLIENT_NAME};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// HTTP(S) transport backed by two pooled `reqwest` clients: one without a
/// cookie store and one with, selected by the credential-forwarding flag.
pub struct HttpTransport {
    client: reqwest::Client,
    credentialed: reqwest::Client,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = build_client(config, false)?;
        let credentialed = build_client(config, true)?;

        let limiter = match config.requests_per_second() {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or(ConfigError::InvalidRateLimit)?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            credentialed,
            limiter,
        })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

fn build_client(config: &ClientConfig, cookie_store: bool) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(32)
        .tcp_nodelay(true)
        .cookie_store(cookie_store)
        .build()
        .map_err(ConfigError::HttpClient)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseEnvelope, TransportError> {
        let url = request.url().map_err(|e| {
            TransportError::new(
                TransportErrorKind::InvalidRequest,
                request.to_string(),
                e.to_string(),
            )
        })?;

        self.wait_for_rate_limit().await;

        let overrides = request.overrides();
        let client = if overrides.forwards_credentials() {
            &self.credentialed
        } else {
            &self.client
        };

        let mut builder = client
            .request(request.method().clone(), url.clone())
            .header(header::ACCEPT, CONTENT_TYPE_JSON)
            .header(CLIENT_HEADER, HeaderValue::from_static(CLIENT_NAME));
        if let Some(content_type) = request.content_type() {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        // `headers` replaces same-named entries, so overrides win.
        builder = builder.headers(overrides.headers.clone());
        if let Some(token) = &overrides.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        debug!(
            http.method = %request.method(),
            http.url = %url,
            http.params = request.params().len(),
            "node request"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(final_url.as_str(), e))?;
        debug!(http.url = %final_url, %status, body_len = body.len(), "node response");
        trace!(http.url = %final_url, body = %body, "node response body");

        Ok(ResponseEnvelope::new(
            status,
            headers,
            final_url,
            body,
            request.clone(),
        ))
    }
}
