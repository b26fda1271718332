use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::sse::{SseDecoder, SseFrame, StreamMessage};

pub type PushStream = BoxStream<'static, Result<StreamMessage, TransportError>>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("push stream request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("push stream rejected with status {0}")]
    Status(StatusCode),
    #[error("push stream responded with content type {0:?}")]
    ContentType(String),
    #[error("push stream ended")]
    Ended,
    #[error("push stream unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn open(&self) -> Result<PushStream, TransportError>;
}

const LAST_EVENT_ID: &str = "Last-Event-ID";

struct PumpState<B> {
    body: B,
    decoder: SseDecoder,
    pending: VecDeque<StreamMessage>,
    finished: bool,
    last_event_id: Arc<Mutex<Option<String>>>,
}

pub struct HttpPushTransport {
    http: Client,
    subscribe_url: String,
    last_event_id: Arc<Mutex<Option<String>>>,
}

impl HttpPushTransport {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            subscribe_url: format!(
                "{}/api/notifications/subscribe",
                base_url.trim_end_matches('/')
            ),
            last_event_id: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn open(&self) -> Result<PushStream, TransportError> {
        let mut request = self
            .http
            .get(&self.subscribe_url)
            .header(header::ACCEPT, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache");
        if let Some(id) = self.last_event_id.lock().await.clone() {
            request = request.header(LAST_EVENT_ID, id);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("text/event-stream") {
            return Err(TransportError::ContentType(content_type));
        }
        debug!(url = %self.subscribe_url, "push stream response accepted");

        let state = PumpState {
            body: Box::pin(response.bytes_stream()),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
            last_event_id: Arc::clone(&self.last_event_id),
        };
        let stream = futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(message) = state.pending.pop_front() {
                    if let StreamMessage::Event(SseFrame { id: Some(id), .. }) = &message {
                        *state.last_event_id.lock().await = Some(id.clone());
                    }
                    return Some((Ok(message), state));
                }
                if state.finished {
                    return None;
                }
                match state.body.next().await {
                    Some(Ok(chunk)) => {
                        let messages = state.decoder.feed(&chunk);
                        state.pending.extend(messages);
                    }
                    Some(Err(err)) => {
                        state.finished = true;
                        return Some((Err(TransportError::Request(err)), state));
                    }
                    None => {
                        state.finished = true;
                        return Some((Err(TransportError::Ended), state));
                    }
                }
            }
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
