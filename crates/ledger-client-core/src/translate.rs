//! Turns response envelopes into typed values or typed errors.
//!
//! Non-success statuses become [`ApiError`]; a success status whose body does
//! not decode into the expected shape becomes [`ParseError`]. Nothing is
//! coerced to a default value.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, ClientError, ErrorBody, ParseError};
use crate::transport::ResponseEnvelope;

/// Pass success envelopes through; map everything else to [`ApiError`].
pub fn check_status(envelope: ResponseEnvelope) -> Result<ResponseEnvelope, ClientError> {
    if envelope.is_success() {
        return Ok(envelope);
    }

    let body = ErrorBody::from_text(&envelope.body);
    debug!(
        http.url = %envelope.url,
        status = envelope.status.as_u16(),
        "node returned error status"
    );
    Err(ApiError {
        status: envelope.status,
        status_text: envelope.status_text,
        body,
        url: envelope.url,
        request: envelope.request,
    }
    .into())
}

/// Decode a success envelope's body into `T`.
pub fn decode_body<T: DeserializeOwned>(envelope: &ResponseEnvelope) -> Result<T, ClientError> {
    serde_json::from_str(&envelope.body).map_err(|e| {
        ParseError::new(
            envelope.status,
            envelope.url.clone(),
            std::any::type_name::<T>(),
            e.to_string(),
        )
        .into()
    })
}

/// [`check_status`] followed by [`decode_body`].
pub fn translate<T: DeserializeOwned>(envelope: ResponseEnvelope) -> Result<T, ClientError> {
    let envelope = check_status(envelope)?;
    decode_body(&envelope)
}
