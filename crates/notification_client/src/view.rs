use shared::{
    domain::{NotificationId, OfferId, OfferStatus, ProgressStep, RequestId},
    protocol::{BidCountUpdate, DashboardMetrics, Notification, OfferStatusUpdate, RequestCard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NotificationArea,
    RequestList,
    DashboardGrid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub url: Option<String>,
    pub message: String,
    pub timestamp: String,
}

impl From<&Notification> for NotificationItem {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            url: notification.target_url().map(str::to_string),
            message: notification.message.clone(),
            timestamp: notification.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPlaceholder {
    NoNotifications,
    Unavailable,
}

impl ListPlaceholder {
    pub fn text(self) -> &'static str {
        match self {
            ListPlaceholder::NoNotifications => "No new notifications.",
            ListPlaceholder::Unavailable => "Notifications are unavailable.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreadBadge {
    pub count: i64,
    pub visible: bool,
}

impl UnreadBadge {
    pub fn new(count: i64) -> Self {
        Self {
            count,
            visible: count > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestCardView {
    pub request_id: RequestId,
    pub id_label: String,
    pub item_name: String,
    pub requester_id: String,
    pub has_my_offer: bool,
    pub incoterms: String,
    pub departure_port: String,
    pub arrival_port: String,
    pub desired_arrival: String,
    pub registered: String,
    pub deadline: String,
    pub deadline_at: String,
    pub trade_type: String,
    pub transport_type: String,
    pub cbm: f64,
    pub cbm_label: String,
}

impl From<&RequestCard> for RequestCardView {
    fn from(card: &RequestCard) -> Self {
        Self {
            request_id: card.id,
            id_label: card.id_label.clone(),
            item_name: card.item_name.clone(),
            requester_id: card.requester_id.clone(),
            has_my_offer: card.has_my_offer,
            incoterms: card.incoterms.clone(),
            departure_port: card.departure_port.clone(),
            arrival_port: card.arrival_port.clone(),
            desired_arrival: card.desired_arrival_date.clone(),
            registered: card.registration_date.clone(),
            deadline: card.deadline.clone(),
            deadline_at: card.deadline_date_time.clone(),
            trade_type: card.trade_type.clone(),
            transport_type: card.transport_type.clone(),
            cbm: card.cbm,
            cbm_label: format!("{:.2} CBM", card.cbm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResaleAction {
    Show,
    Remove,
    Unchanged,
}

/// New badge and action state for one offer card. The cancel action is
/// always withdrawn once an offer has been decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStatusView {
    pub offer_id: OfferId,
    pub badge_text: String,
    pub badge_class: String,
    pub resale: ResaleAction,
}

impl From<&OfferStatusUpdate> for OfferStatusView {
    fn from(update: &OfferStatusUpdate) -> Self {
        let resale = match update.offer_status() {
            OfferStatus::Accepted => ResaleAction::Show,
            OfferStatus::Rejected => ResaleAction::Remove,
            OfferStatus::Other => ResaleAction::Unchanged,
        };
        Self {
            offer_id: update.offer_id,
            badge_text: update.status_text.clone(),
            badge_class: update.status.to_lowercase(),
            resale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidCounterView {
    pub request_id: RequestId,
    pub bidder_count: u64,
    pub label: String,
}

impl From<&BidCountUpdate> for BidCounterView {
    fn from(update: &BidCountUpdate) -> Self {
        Self {
            request_id: update.request_id,
            bidder_count: update.bidder_count,
            label: format!("{} offers received", update.bidder_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub today_requests: String,
    pub today_deals: String,
    pub total_fwd_users: String,
    pub total_cus_users: String,
    pub pending_users: String,
    pub no_bid_requests: String,
    pub missed_confirmation_rate: String,
}

impl From<&DashboardMetrics> for DashboardView {
    fn from(metrics: &DashboardMetrics) -> Self {
        Self {
            today_requests: metrics.today_requests.to_string(),
            today_deals: metrics.today_deals.to_string(),
            total_fwd_users: metrics.total_fwd_users.to_string(),
            total_cus_users: metrics.total_cus_users.to_string(),
            pending_users: metrics.pending_users.to_string(),
            no_bid_requests: metrics.no_bid_requests.to_string(),
            missed_confirmation_rate: format!("{:.2}%", metrics.missed_confirmation_rate),
        }
    }
}

pub trait NotificationView: Send + Sync {
    fn has_region(&self, region: Region) -> bool;

    fn render_notifications(&self, items: &[NotificationItem]);
    fn show_placeholder(&self, placeholder: ListPlaceholder);
    fn prepend_notification(&self, item: &NotificationItem);
    fn set_unread_badge(&self, badge: UnreadBadge);
    fn set_dropdown_visible(&self, visible: bool);

    fn insert_request_card(&self, card: &RequestCardView);
    fn refresh_deadline_timers(&self);
    fn complete_progress_steps(&self, request_id: RequestId, steps: &[ProgressStep]);
    fn update_offer_status(&self, offer: &OfferStatusView);
    fn update_bid_counter(&self, counter: &BidCounterView);
    fn set_bid_counter_scale(&self, request_id: RequestId, scale: f32);
    fn update_dashboard(&self, dashboard: &DashboardView);

    fn alert(&self, message: &str);
    fn reload_page(&self);
    fn navigate(&self, url: &str);
}
