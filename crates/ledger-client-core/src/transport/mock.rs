use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::error::{TransportError, TransportErrorKind};
use crate::pagination::CURSOR_HEADER;
use crate::request::RequestDescriptor;

use super::types::ResponseEnvelope;
use super::Transport;

/// One scripted outcome for a call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response {
        status: StatusCode,
        headers: Vec<(&'static str, HeaderValue)>,
        body: String,
    },
    Unreachable,
}

impl MockReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Response {
            status: StatusCode::from_u16(status).expect("valid status code"),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::Response {
            status: StatusCode::from_u16(status).expect("valid status code"),
            headers: Vec::new(),
            body: body.to_owned(),
        }
    }

    /// A 200 page of `items`, advertising `cursor` when given.
    pub fn page(items: Vec<serde_json::Value>, cursor: Option<&str>) -> Self {
        let headers = cursor
            .map(|c| vec![(CURSOR_HEADER, HeaderValue::from_str(c).expect("valid cursor"))])
            .unwrap_or_default();
        Self::Response {
            status: StatusCode::OK,
            headers,
            body: serde_json::Value::Array(items).to_string(),
        }
    }
}

type Responder = Box<dyn Fn(&RequestDescriptor, usize) -> MockReply + Send + Sync>;

/// A scripted transport for testing. Replies are served from a queue, then
/// from an optional responder closure; every request is recorded.
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<RequestDescriptor>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
            responder: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().expect("requests lock").clone()
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<MockReply>,
    responder: Option<Responder>,
}

impl MockTransportBuilder {
    pub fn reply(mut self, reply: MockReply) -> Self {
        self.replies.push_back(reply);
        self
    }

    /// Fallback once the queue is empty; receives the zero-based call index.
    pub fn responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&RequestDescriptor, usize) -> MockReply + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            responder: self.responder,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseEnvelope, TransportError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        let queued = self.replies.lock().expect("replies lock").pop_front();
        let reply = match (queued, &self.responder) {
            (Some(reply), _) => reply,
            (None, Some(responder)) => responder(request, index),
            (None, None) => panic!("MockTransport has no reply scripted for call {index}"),
        };

        let url = request
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|_| request.to_string());
        match reply {
            MockReply::Response {
                status,
                headers,
                body,
            } => {
                let mut header_map = HeaderMap::new();
                for (name, value) in headers {
                    header_map.insert(HeaderName::from_static(name), value);
                }
                Ok(ResponseEnvelope::new(
                    status,
                    header_map,
                    url,
                    body,
                    request.clone(),
                ))
            }
            MockReply::Unreachable => Err(TransportError::new(
                TransportErrorKind::Connect,
                url,
                "connection refused",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, Url};

    use super::*;

    fn request() -> RequestDescriptor {
        RequestDescriptor::builder(Method::GET, Url::parse("http://node/v1").expect("static url"))
            .endpoint("-/healthy")
            .build()
    }

    #[tokio::test]
    async fn queued_replies_precede_responder() {
        let transport = MockTransport::builder()
            .reply(MockReply::text(503, "busy"))
            .responder(|_, index| MockReply::json(200, serde_json::json!({ "call": index })))
            .build();

        let first = transport.execute(&request()).await.unwrap();
        let second = transport.execute(&request()).await.unwrap();

        assert_eq!(first.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(second.body, r#"{"call":1}"#);
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_reply_is_a_transport_error() {
        let transport = MockTransport::builder()
            .reply(MockReply::Unreachable)
            .build();
        let err = transport.execute(&request()).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Connect);
        assert!(err.url.ends_with("/v1/-/healthy"));
    }
}
