use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError, ParseError};
use crate::memo::Memo;
use crate::pagination::walk_cursor_pages;
use crate::request::{CallOverrides, RequestBuilder, RequestDescriptor};
use crate::transport::{HttpTransport, Transport};
use crate::translate::translate;

// ==============================================================================
// Ledger Client
// ==============================================================================

/// Client for one node. Account and general queries are implemented as
/// inherent methods in `crate::account` and `crate::general`.
pub struct LedgerClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    pub(crate) chain_id: Memo<u8>,
}

impl LedgerClient {
    /// Build a client that talks HTTP(S) through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            chain_id: Memo::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request against the configured node, seeded with the client's
    /// default overrides.
    pub fn request(&self, method: Method, endpoint: impl Into<String>) -> RequestBuilder {
        RequestDescriptor::builder(method, self.config.node_url().clone())
            .endpoint(endpoint)
            .overrides(self.config.defaults().clone())
    }

    /// Layer per-call overrides over the client defaults.
    pub(crate) fn call_overrides(&self, overrides: Option<&CallOverrides>) -> CallOverrides {
        match overrides {
            Some(overrides) => overrides.merged_over(self.config.defaults()),
            None => self.config.defaults().clone(),
        }
    }

    /// Execute `request` and decode a success body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, ClientError> {
        let envelope = self.transport.execute(request).await?;
        translate(envelope)
    }

    /// Walk every page of a cursor-paginated listing and decode the items.
    pub async fn send_paginated<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<Vec<T>, ClientError> {
        let url = request
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|_| request.to_string());
        let items =
            walk_cursor_pages(self.transport.as_ref(), request, self.config.max_pages()).await?;
        debug!(http.url = %url, items = items.len(), "pagination complete");

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| {
                    ClientError::from(ParseError::new(
                        StatusCode::OK,
                        url.clone(),
                        std::any::type_name::<T>(),
                        e.to_string(),
                    ))
                })
            })
            .collect()
    }
}
