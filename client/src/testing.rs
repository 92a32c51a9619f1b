//! Scripted in-memory [`Transport`] for unit tests.

use crate::core::service::Transport;
use crate::services::api::request::{ApiRequest, Envelope, Method, RawResponse, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// How the fake backend answers one attempt.
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(u16, Value),
    Status(u16),
    /// Connection failure, no response.
    Network,
    /// Never answers.
    Hang,
    /// Answer after a delay on the tokio clock.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        MockReply::Json(status, body)
    }

    pub fn status(status: u16) -> Self {
        MockReply::Status(status)
    }

    pub fn after(self, delay: Duration) -> Self {
        MockReply::Delayed(delay, Box::new(self))
    }
}

/// One attempt as seen on the wire.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub request_id: String,
}

type Handler = Box<dyn Fn(&ApiRequest) -> MockReply + Send + Sync>;

pub struct MockTransport {
    handler: Handler,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Route every attempt through `handler`.
    pub fn new(handler: impl Fn(&ApiRequest) -> MockReply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same reply to every attempt.
    pub fn replying(reply: MockReply) -> Self {
        Self::new(move |_| reply.clone())
    }

    /// Replies in order; the last one repeats once the script runs out.
    pub fn sequence(replies: Vec<MockReply>) -> Self {
        let script = Mutex::new(VecDeque::from(replies));
        Self::new(move |_| {
            let mut script = script.lock();
            match script.len() {
                0 => MockReply::Status(599),
                1 => script[0].clone(),
                _ => script.pop_front().unwrap_or(MockReply::Status(599)),
            }
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Attempts whose method and path match.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, envelope: Envelope<'_>) -> Result<RawResponse, TransportError> {
        let request = envelope.request;
        self.calls.lock().push(RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer: envelope.bearer.map(str::to_string),
            request_id: envelope.request_id.to_string(),
        });

        let mut reply = (self.handler)(request);
        loop {
            return match reply {
                MockReply::Json(status, body) => Ok(RawResponse::new(status, body.to_string())),
                MockReply::Status(status) => Ok(RawResponse::new(status, Vec::new())),
                MockReply::Network => Err(TransportError::Connect("connection refused".into())),
                MockReply::Hang => {
                    futures::future::pending::<()>().await;
                    Err(TransportError::Connect("unreachable".into()))
                }
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                    continue;
                }
            };
        }
    }
}
