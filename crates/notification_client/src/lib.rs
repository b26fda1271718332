use std::{future::Future, sync::Arc, time::Duration};

use futures::StreamExt;
use reqwest::Client;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info};

pub mod api;
mod dispatch;
pub mod heartbeat;
pub mod session;
pub mod sse;
pub mod throttle;
pub mod transport;
pub mod view;

pub use api::{HttpNotificationApi, NotificationApi};
pub use session::{ClientSession, ConnectionState, RetryDecision};
pub use transport::{HttpPushTransport, PushStream, PushTransport, TransportError};

use heartbeat::Heartbeat;
use sse::StreamMessage;
use throttle::Throttle;
use view::{ListPlaceholder, NotificationItem, NotificationView, Region, UnreadBadge};

const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(40);
const MAX_RETRIES: u32 = 5;
const RECONNECT_DELAY: Duration = Duration::from_secs(3);
const THROTTLE_WINDOW: Duration = Duration::from_secs(2);
const BID_PULSE: Duration = Duration::from_millis(200);
const CONNECTION_LOST_MESSAGE: &str =
    "The connection to the server was lost. The page will now reload.";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub heartbeat_timeout: Duration,
    pub max_retries: u32,
    pub reconnect_delay: Duration,
    pub throttle_window: Duration,
    pub bid_pulse: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            heartbeat_timeout: HEARTBEAT_TIMEOUT,
            max_retries: MAX_RETRIES,
            reconnect_delay: RECONNECT_DELAY,
            throttle_window: THROTTLE_WINDOW,
            bid_pulse: BID_PULSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    HeartbeatExpired,
    MaxRetriesExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    UnreadChat(String),
    ConnectionStateChanged(ConnectionState),
    StreamClosed(StreamOutcome),
}

enum PumpExit {
    HeartbeatExpired,
    Failed(TransportError),
}

#[derive(Debug, Default)]
struct PanelState {
    dropdown_open: bool,
}

pub struct NotificationClient {
    api: Arc<dyn NotificationApi>,
    transport: Arc<dyn PushTransport>,
    view: Arc<dyn NotificationView>,
    session: ClientSession,
    settings: ClientSettings,
    throttle: Throttle,
    panel: Mutex<PanelState>,
    events: broadcast::Sender<PageEvent>,
}

impl NotificationClient {
    pub fn new(base_url: &str, view: Arc<dyn NotificationView>) -> Arc<Self> {
        Self::new_with_settings(base_url, view, ClientSettings::default())
    }

    pub fn new_with_settings(
        base_url: &str,
        view: Arc<dyn NotificationView>,
        settings: ClientSettings,
    ) -> Arc<Self> {
        let http = Client::new();
        Self::new_with_dependencies(
            Arc::new(HttpNotificationApi::new(http.clone(), base_url)),
            Arc::new(HttpPushTransport::new(http, base_url)),
            view,
            settings,
        )
    }

    pub fn new_with_dependencies(
        api: Arc<dyn NotificationApi>,
        transport: Arc<dyn PushTransport>,
        view: Arc<dyn NotificationView>,
        settings: ClientSettings,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            api,
            transport,
            view,
            session: ClientSession::new(settings.max_retries),
            throttle: Throttle::new(settings.throttle_window),
            settings,
            panel: Mutex::new(PanelState::default()),
            events,
        })
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn subscribe_page_events(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    pub async fn mount(self: &Arc<Self>) -> bool {
        if !self.view.has_region(Region::NotificationArea) {
            debug!("no notification area on this page; skipping setup");
            return false;
        }
        self.request_initialize().await;
        true
    }

    pub async fn request_initialize(self: &Arc<Self>) -> bool {
        let client = Arc::clone(self);
        self.throttle
            .trigger(move || async move {
                client.initialize().await;
            })
            .await
    }

    pub async fn initialize(self: &Arc<Self>) -> Option<JoinHandle<StreamOutcome>> {
        if !self.session.try_activate().await {
            info!("push stream is already connected");
            return None;
        }
        self.emit_state(ConnectionState::Connected);

        self.load_notifications().await;

        let client = Arc::clone(self);
        Some(tokio::spawn(async move {
            let outcome = client.run_push_stream().await;
            let _ = client.events.send(PageEvent::StreamClosed(outcome));
            outcome
        }))
    }

    pub async fn load_notifications(&self) {
        match self.api.list_notifications().await {
            Ok(notifications) => {
                if notifications.is_empty() {
                    self.view.show_placeholder(ListPlaceholder::NoNotifications);
                } else {
                    let items: Vec<NotificationItem> =
                        notifications.iter().map(NotificationItem::from).collect();
                    self.view.render_notifications(&items);
                }
                self.update_unread_count(notifications.len() as i64).await;
            }
            Err(err) => {
                error!(error = %err, "failed to load notifications");
                self.view.show_placeholder(ListPlaceholder::Unavailable);
            }
        }
    }

    /// Runs the push connection until the heartbeat expires or the retry
    /// limit is reached. Errors below the limit reconnect after the
    /// reconnect delay.
    pub async fn run_push_stream(self: &Arc<Self>) -> StreamOutcome {
        let mut heartbeat = Heartbeat::new(self.settings.heartbeat_timeout);
        let mut reconnect_delay = self.settings.reconnect_delay;

        loop {
            let failure = match race(&mut heartbeat, self.transport.open()).await {
                None => return self.expire_heartbeat().await,
                Some(Ok(stream)) => {
                    info!("push stream established; resetting retry count");
                    self.session.record_open().await;
                    heartbeat.reset();
                    match self
                        .pump(stream, &mut heartbeat, &mut reconnect_delay)
                        .await
                    {
                        PumpExit::HeartbeatExpired => return self.expire_heartbeat().await,
                        PumpExit::Failed(err) => err,
                    }
                }
                Some(Err(err)) => err,
            };

            error!(error = %failure, "push stream error");
            match self.session.record_error().await {
                RetryDecision::GiveUp => {
                    error!(
                        max_retries = self.settings.max_retries,
                        "push stream retry limit reached; closing connection"
                    );
                    self.emit_state(ConnectionState::ClosedAfterMaxRetries);
                    return StreamOutcome::MaxRetriesExceeded;
                }
                RetryDecision::Reconnect { attempt } => {
                    debug!(
                        attempt,
                        delay_ms = reconnect_delay.as_millis() as u64,
                        "reconnecting push stream"
                    );
                }
            }

            if race(&mut heartbeat, tokio::time::sleep(reconnect_delay))
                .await
                .is_none()
            {
                return self.expire_heartbeat().await;
            }
        }
    }

    async fn pump(
        self: &Arc<Self>,
        mut stream: PushStream,
        heartbeat: &mut Heartbeat,
        reconnect_delay: &mut Duration,
    ) -> PumpExit {
        loop {
            let next = tokio::select! {
                message = stream.next() => message,
                _ = heartbeat.expired() => return PumpExit::HeartbeatExpired,
            };
            match next {
                Some(Ok(StreamMessage::Event(frame))) => {
                    heartbeat.reset();
                    self.handle_frame(frame).await;
                }
                Some(Ok(StreamMessage::Retry(delay))) => *reconnect_delay = delay,
                Some(Err(err)) => return PumpExit::Failed(err),
                None => return PumpExit::Failed(TransportError::Ended),
            }
        }
    }

    async fn expire_heartbeat(&self) -> StreamOutcome {
        error!(
            timeout_secs = self.settings.heartbeat_timeout.as_secs(),
            "push stream heartbeat timed out; connection may be lost"
        );
        self.view.alert(CONNECTION_LOST_MESSAGE);
        self.view.reload_page();
        self.session.reset().await;
        self.emit_state(ConnectionState::Uninitialized);
        StreamOutcome::HeartbeatExpired
    }

    async fn update_unread_count(&self, count: i64) {
        let badge = UnreadBadge::new(count);
        self.view.set_unread_badge(badge);
        if !badge.visible && self.panel.lock().await.dropdown_open {
            self.view.show_placeholder(ListPlaceholder::NoNotifications);
        }
    }

    pub async fn toggle_dropdown(&self) -> bool {
        let mut panel = self.panel.lock().await;
        panel.dropdown_open = !panel.dropdown_open;
        self.view.set_dropdown_visible(panel.dropdown_open);
        panel.dropdown_open
    }

    pub async fn close_dropdown(&self) {
        self.panel.lock().await.dropdown_open = false;
        self.view.set_dropdown_visible(false);
    }

    pub async fn open_notification(&self, item: &NotificationItem) {
        if let Err(err) = self.api.mark_read(item.id).await {
            error!(notification_id = item.id.0, error = %err, "failed to mark notification read");
            return;
        }
        if let Some(url) = item.url.as_deref().filter(|url| *url != "null") {
            self.view.navigate(url);
        }
    }

    pub async fn mark_all_read(&self) {
        if let Err(err) = self.api.mark_all_read().await {
            error!(error = %err, "failed to mark all notifications read");
        }
    }

    fn emit_state(&self, state: ConnectionState) {
        let _ = self.events.send(PageEvent::ConnectionStateChanged(state));
    }
}

async fn race<F: Future>(heartbeat: &mut Heartbeat, fut: F) -> Option<F::Output> {
    tokio::select! {
        output = fut => Some(output),
        _ = heartbeat.expired() => None,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
