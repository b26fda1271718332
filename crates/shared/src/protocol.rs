use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    domain::{NotificationId, OfferId, OfferStatus, RequestId, ShipmentStatus},
    error::PayloadError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: String,
}

impl Notification {
    /// Navigation target, treating a missing URL and the literal `"null"` alike.
    pub fn target_url(&self) -> Option<&str> {
        match self.url.as_deref() {
            None | Some("") | Some("null") => None,
            Some(url) => Some(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCard {
    pub id: RequestId,
    pub id_label: String,
    pub item_name: String,
    pub cbm: f64,
    #[serde(default)]
    pub requester_id: String,
    #[serde(default)]
    pub has_my_offer: bool,
    #[serde(default)]
    pub incoterms: String,
    #[serde(default)]
    pub departure_port: String,
    #[serde(default)]
    pub arrival_port: String,
    #[serde(default)]
    pub desired_arrival_date: String,
    #[serde(default)]
    pub desired_arrival_date_as_local_date: String,
    #[serde(default)]
    pub registration_date: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub deadline_date_time: String,
    #[serde(default)]
    pub trade_type: String,
    #[serde(default)]
    pub transport_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdate {
    pub request_id: RequestId,
    pub detailed_status: ShipmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStatusUpdate {
    pub offer_id: OfferId,
    pub status: String,
    pub status_text: String,
}

impl OfferStatusUpdate {
    pub fn offer_status(&self) -> OfferStatus {
        OfferStatus::from_wire(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidCountUpdate {
    pub request_id: RequestId,
    pub bidder_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub today_requests: i64,
    pub today_deals: i64,
    pub total_fwd_users: i64,
    pub total_cus_users: i64,
    pub pending_users: i64,
    pub no_bid_requests: i64,
    pub missed_confirmation_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UnreadCount,
    Notification,
    UnreadChat,
    NewRequest,
    ShipmentUpdate,
    OfferStatusUpdate,
    BidCountUpdate,
    DashboardUpdate,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::UnreadCount,
        EventKind::Notification,
        EventKind::UnreadChat,
        EventKind::NewRequest,
        EventKind::ShipmentUpdate,
        EventKind::OfferStatusUpdate,
        EventKind::BidCountUpdate,
        EventKind::DashboardUpdate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::UnreadCount => "unreadCount",
            EventKind::Notification => "notification",
            EventKind::UnreadChat => "unreadChat",
            EventKind::NewRequest => "new_request",
            EventKind::ShipmentUpdate => "shipment_update",
            EventKind::OfferStatusUpdate => "offer_status_update",
            EventKind::BidCountUpdate => "bid_count_update",
            EventKind::DashboardUpdate => "dashboard_update",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    UnreadCount(i64),
    Notification(Notification),
    UnreadChat(String),
    NewRequest(RequestCard),
    ShipmentUpdate(ShipmentUpdate),
    OfferStatusUpdate(OfferStatusUpdate),
    BidCountUpdate(BidCountUpdate),
    DashboardUpdate(DashboardMetrics),
}

impl PushEvent {
    pub fn decode(kind: EventKind, data: &str) -> Result<Self, PayloadError> {
        Ok(match kind {
            EventKind::UnreadCount => PushEvent::UnreadCount(parse_unread_count(data)?),
            EventKind::Notification => PushEvent::Notification(json(kind, data)?),
            EventKind::UnreadChat => PushEvent::UnreadChat(data.to_string()),
            EventKind::NewRequest => PushEvent::NewRequest(json(kind, data)?),
            EventKind::ShipmentUpdate => PushEvent::ShipmentUpdate(json(kind, data)?),
            EventKind::OfferStatusUpdate => PushEvent::OfferStatusUpdate(json(kind, data)?),
            EventKind::BidCountUpdate => PushEvent::BidCountUpdate(json(kind, data)?),
            EventKind::DashboardUpdate => PushEvent::DashboardUpdate(json(kind, data)?),
        })
    }
}

fn json<T: DeserializeOwned>(kind: EventKind, data: &str) -> Result<T, PayloadError> {
    serde_json::from_str(data).map_err(|err| PayloadError::json(kind.name(), err))
}

/// Reads the leading integer of an `unreadCount` payload; trailing text is ignored.
pub fn parse_unread_count(raw: &str) -> Result<i64, PayloadError> {
    let trimmed = raw.trim();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(PayloadError::InvalidCount {
            raw: raw.to_string(),
        });
    }
    trimmed[..digits_start + digits_len]
        .parse()
        .map_err(|_| PayloadError::InvalidCount {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
