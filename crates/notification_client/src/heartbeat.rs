use std::{pin::Pin, time::Duration};

use tokio::time::{sleep_until, Instant, Sleep};

/// Liveness deadline for the push stream. Disarmed until the first `reset`.
pub struct Heartbeat {
    timeout: Duration,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl Heartbeat {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    pub fn reset(&mut self) {
        let deadline = Instant::now() + self.timeout;
        match self.deadline.as_mut() {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.deadline = Some(Box::pin(sleep_until(deadline))),
        }
    }

    pub async fn expired(&mut self) {
        match self.deadline.as_mut() {
            Some(sleep) => sleep.as_mut().await,
            None => std::future::pending().await,
        }
    }
}
