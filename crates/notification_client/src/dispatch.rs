use std::sync::Arc;

use shared::protocol::{
    BidCountUpdate, DashboardMetrics, EventKind, Notification, OfferStatusUpdate, PushEvent,
    RequestCard, ShipmentUpdate,
};
use tracing::{debug, warn};

use crate::{
    sse::SseFrame,
    view::{
        BidCounterView, DashboardView, NotificationItem, OfferStatusView, Region, RequestCardView,
    },
    NotificationClient, PageEvent,
};

const BID_PULSE_SCALE: f32 = 1.2;
const BID_REST_SCALE: f32 = 1.0;

impl NotificationClient {
    /// Routes one received frame. Payload errors are logged and swallowed so
    /// the stream keeps running.
    pub(crate) async fn handle_frame(self: &Arc<Self>, frame: SseFrame) {
        let name = frame.event_name();
        let Some(kind) = EventKind::from_name(name) else {
            debug!(event = name, "push message without a handler");
            return;
        };
        match PushEvent::decode(kind, &frame.data) {
            Ok(event) => self.apply_event(event).await,
            Err(err) => warn!(event = kind.name(), error = %err, "failed to handle push event"),
        }
    }

    pub async fn apply_event(self: &Arc<Self>, event: PushEvent) {
        match event {
            PushEvent::UnreadCount(count) => self.update_unread_count(count).await,
            PushEvent::Notification(notification) => self.on_notification(&notification),
            PushEvent::UnreadChat(detail) => self.on_unread_chat(detail),
            PushEvent::NewRequest(card) => self.on_new_request(&card),
            PushEvent::ShipmentUpdate(update) => self.on_shipment_update(&update),
            PushEvent::OfferStatusUpdate(update) => self.on_offer_status_update(&update),
            PushEvent::BidCountUpdate(update) => self.on_bid_count_update(&update),
            PushEvent::DashboardUpdate(metrics) => self.on_dashboard_update(&metrics),
        }
    }

    fn on_notification(&self, notification: &Notification) {
        self.view
            .prepend_notification(&NotificationItem::from(notification));
    }

    fn on_unread_chat(&self, detail: String) {
        let _ = self.events.send(PageEvent::UnreadChat(detail));
    }

    fn on_new_request(&self, card: &RequestCard) {
        if !self.view.has_region(Region::RequestList) {
            return;
        }
        self.view.insert_request_card(&RequestCardView::from(card));
        self.view.refresh_deadline_timers();
    }

    fn on_shipment_update(&self, update: &ShipmentUpdate) {
        self.view.complete_progress_steps(
            update.request_id,
            update.detailed_status.completed_steps(),
        );
    }

    fn on_offer_status_update(&self, update: &OfferStatusUpdate) {
        self.view
            .update_offer_status(&OfferStatusView::from(update));
    }

    fn on_bid_count_update(&self, update: &BidCountUpdate) {
        let counter = BidCounterView::from(update);
        self.view.update_bid_counter(&counter);
        self.view
            .set_bid_counter_scale(counter.request_id, BID_PULSE_SCALE);

        let view = Arc::clone(&self.view);
        let pulse = self.settings.bid_pulse;
        tokio::spawn(async move {
            tokio::time::sleep(pulse).await;
            view.set_bid_counter_scale(counter.request_id, BID_REST_SCALE);
        });
    }

    fn on_dashboard_update(&self, metrics: &DashboardMetrics) {
        if !self.view.has_region(Region::DashboardGrid) {
            return;
        }
        self.view.update_dashboard(&DashboardView::from(metrics));
    }
}
