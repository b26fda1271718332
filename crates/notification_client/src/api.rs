use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::NotificationId, protocol::Notification};

#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list_notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_read(&self, id: NotificationId) -> Result<()>;
    async fn mark_all_read(&self) -> Result<()>;
}

pub struct HttpNotificationApi {
    http: Client,
    base_url: String,
}

impl HttpNotificationApi {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let url = format!("{}/api/notifications", self.base_url);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .context("failed to load notification list")?;
        Ok(res.json().await?)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<()> {
        let url = format!("{}/api/notifications/{}/read", self.base_url, id.0);
        self.http
            .post(&url)
            .send()
            .await
            .with_context(|| format!("failed to mark notification {} read", id.0))?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        let url = format!("{}/api/notifications/read/all", self.base_url);
        self.http
            .post(&url)
            .send()
            .await
            .context("failed to mark all notifications read")?;
        Ok(())
    }
}
