use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid unread count {raw:?}")]
    InvalidCount { raw: String },
    #[error("invalid {event} payload: {source}")]
    Json {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PayloadError {
    pub fn json(event: &'static str, source: serde_json::Error) -> Self {
        Self::Json { event, source }
    }
}
