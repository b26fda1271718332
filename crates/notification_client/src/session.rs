use std::sync::Arc;

use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connected,
    ClosedAfterMaxRetries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Reconnect { attempt: u32 },
    GiveUp,
}

#[derive(Debug)]
struct SessionState {
    connection: ConnectionState,
    retry_count: u32,
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    inner: Arc<Mutex<SessionState>>,
    max_retries: u32,
}

impl ClientSession {
    pub fn new(max_retries: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                connection: ConnectionState::Uninitialized,
                retry_count: 0,
            })),
            max_retries,
        }
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.connection
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == ConnectionState::Connected
    }

    pub async fn retry_count(&self) -> u32 {
        self.inner.lock().await.retry_count
    }

    pub async fn try_activate(&self) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.connection == ConnectionState::Connected {
            return false;
        }
        guard.connection = ConnectionState::Connected;
        guard.retry_count = 0;
        true
    }

    pub async fn record_open(&self) {
        self.inner.lock().await.retry_count = 0;
    }

    /// Counts one transport error. Reaching the limit closes the session and
    /// releases the guard.
    pub async fn record_error(&self) -> RetryDecision {
        let mut guard = self.inner.lock().await;
        guard.retry_count += 1;
        if guard.retry_count >= self.max_retries {
            guard.connection = ConnectionState::ClosedAfterMaxRetries;
            return RetryDecision::GiveUp;
        }
        RetryDecision::Reconnect {
            attempt: guard.retry_count,
        }
    }

    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        guard.connection = ConnectionState::Uninitialized;
        guard.retry_count = 0;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
