//! Transport abstraction layer.
//!
//! Defines the [`Transport`] trait and provides a `reqwest` implementation
//! ([`HttpTransport`]) plus a scripted test double (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::HttpTransport;
pub use types::ResponseEnvelope;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::RequestDescriptor;

/// Header carrying the client identification string on every request.
pub const CLIENT_HEADER: &str = "x-aptos-client";

pub const CLIENT_NAME: &str = concat!("ledger-client-core/", env!("CARGO_PKG_VERSION"));

/// Executes one described call.
///
/// Implementations return an envelope for every response the server sends,
/// whatever its status; only failures to obtain a response are errors here.
/// Connection pooling and lifecycle belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor)
        -> Result<ResponseEnvelope, TransportError>;
}
