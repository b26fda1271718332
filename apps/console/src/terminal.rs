use std::sync::Mutex;

use history_ui::{
    DateRange, HistoryRegion, HistoryView, RateControlId, RatingPrompt, SummaryModalView,
    TableRow,
};
use notification_client::view::{
    BidCounterView, DashboardView, ListPlaceholder, NotificationItem, NotificationView,
    OfferStatusView, Region, RequestCardView, ResaleAction, UnreadBadge,
};
use shared::domain::{ProgressStep, RequestId};
use tracing::info;
use url::form_urlencoded;

#[derive(Default)]
pub struct TerminalNotificationView;

impl NotificationView for TerminalNotificationView {
    fn has_region(&self, _region: Region) -> bool {
        true
    }

    fn render_notifications(&self, items: &[NotificationItem]) {
        for item in items {
            print_item(item);
        }
    }

    fn show_placeholder(&self, placeholder: ListPlaceholder) {
        println!("  ({})", placeholder.text());
    }

    fn prepend_notification(&self, item: &NotificationItem) {
        print_item(item);
    }

    fn set_unread_badge(&self, badge: UnreadBadge) {
        if badge.visible {
            println!("[unread] {}", badge.count);
        } else {
            println!("[unread] none");
        }
    }

    fn set_dropdown_visible(&self, _visible: bool) {}

    fn insert_request_card(&self, card: &RequestCardView) {
        println!(
            "[request] {} {} {} -> {} ({}, {}) deadline {}",
            card.id_label,
            card.item_name,
            card.departure_port,
            card.arrival_port,
            card.incoterms,
            card.cbm_label,
            card.deadline
        );
    }

    fn refresh_deadline_timers(&self) {}

    fn complete_progress_steps(&self, request_id: RequestId, steps: &[ProgressStep]) {
        let labels: Vec<&str> = steps.iter().map(|step| step.label()).collect();
        println!("[shipment] request {request_id}: {}", labels.join(" > "));
    }

    fn update_offer_status(&self, offer: &OfferStatusView) {
        let resale = match offer.resale {
            ResaleAction::Show => " (resale available)",
            ResaleAction::Remove | ResaleAction::Unchanged => "",
        };
        println!("[offer] {}: {}{resale}", offer.offer_id, offer.badge_text);
    }

    fn update_bid_counter(&self, counter: &BidCounterView) {
        println!("[bids] request {}: {}", counter.request_id, counter.label);
    }

    fn set_bid_counter_scale(&self, _request_id: RequestId, _scale: f32) {}

    fn update_dashboard(&self, dashboard: &DashboardView) {
        println!(
            "[dashboard] requests {} | deals {} | forwarders {} | customers {} | pending {} | no bids {} | missed {}",
            dashboard.today_requests,
            dashboard.today_deals,
            dashboard.total_fwd_users,
            dashboard.total_cus_users,
            dashboard.pending_users,
            dashboard.no_bid_requests,
            dashboard.missed_confirmation_rate
        );
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn reload_page(&self) {
        info!("page reload requested");
    }

    fn navigate(&self, url: &str) {
        println!("-> {url}");
    }
}

fn print_item(item: &NotificationItem) {
    println!("* {}  {}", item.timestamp, item.message);
}

pub struct TerminalHistoryView {
    query: String,
    dates: Mutex<DateRange>,
    rows: Vec<TableRow>,
}

impl TerminalHistoryView {
    pub fn new(start: Option<String>, end: Option<String>, rows: Vec<TableRow>) -> Self {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(start) = &start {
            query.append_pair("startDate", start);
        }
        if let Some(end) = &end {
            query.append_pair("endDate", end);
        }
        Self {
            query: query.finish(),
            dates: Mutex::new(DateRange::new(
                start.unwrap_or_default(),
                end.unwrap_or_default(),
            )),
            rows,
        }
    }
}

impl HistoryView for TerminalHistoryView {
    fn has_region(&self, region: HistoryRegion) -> bool {
        matches!(
            region,
            HistoryRegion::SearchForm
                | HistoryRegion::CalculateButton
                | HistoryRegion::SummaryModal
        )
    }

    fn page_query(&self) -> String {
        self.query.clone()
    }

    fn date_inputs(&self) -> DateRange {
        self.dates
            .lock()
            .map(|dates| dates.clone())
            .unwrap_or_default()
    }

    fn set_date_inputs(&self, range: &DateRange) {
        if let Ok(mut dates) = self.dates.lock() {
            *dates = range.clone();
        }
    }

    fn transaction_rows(&self) -> Vec<TableRow> {
        self.rows.clone()
    }

    fn show_summary(&self, modal: &SummaryModalView) {
        println!("{}", modal.title);
        println!("{:<32} {:>20}", "Item", "Confirmed freight");
        for item in &modal.line_items {
            println!(
                "{:<32} {:>20}",
                item.item_name,
                format!("{} {}", item.formatted_amount, item.currency)
            );
        }
        println!();
        println!("{}", modal.totals_heading);
        for total in &modal.totals {
            println!("{:>53}", format!("{} {}", total.formatted_amount, total.currency));
        }
    }

    fn hide_summary(&self) {}

    fn show_rating_prompt(&self, prompt: &RatingPrompt) {
        println!("Rate {} for {}", prompt.forwarder_name, prompt.item_label);
    }

    fn hide_rating_modal(&self) {}

    fn mark_rated(&self, control: RateControlId) {
        info!(control = control.0, "rate control completed");
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}
