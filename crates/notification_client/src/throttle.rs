use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::Mutex;

/// Collapses calls made within a fixed window into one run at the end of it.
pub struct Throttle {
    window: Duration,
    pending: Arc<Mutex<bool>>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn trigger<F, Fut>(&self, task: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        {
            let mut pending = self.pending.lock().await;
            if *pending {
                return false;
            }
            *pending = true;
        }

        let pending = Arc::clone(&self.pending);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            *pending.lock().await = false;
            task().await;
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_window() {
        let throttle = Throttle::new(Duration::from_secs(2));
        let runs = Arc::new(AtomicUsize::new(0));

        for expected in [true, false, false] {
            let runs = Arc::clone(&runs);
            let scheduled = throttle
                .trigger(move || async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                })
                .await;
            assert_eq!(scheduled, expected);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let again = Arc::clone(&runs);
        assert!(
            throttle
                .trigger(move || async move {
                    again.fetch_add(1, Ordering::SeqCst);
                })
                .await
        );
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
