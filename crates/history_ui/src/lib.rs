use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub mod dates;
pub mod rating;
pub mod summary;

pub use dates::DateRange;
pub use rating::{
    Criterion, RateControl, RateControlId, RatingError, RatingModal, RatingPrompt,
    RatingSubmission, Stars,
};
pub use summary::{SummaryError, SummaryModalView, TableRow};

const RATING_SUBMITTED_MESSAGE: &str =
    "Your rating has been submitted. Thank you for your feedback!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryRegion {
    SearchForm,
    CalculateButton,
    SummaryModal,
    RatingModal,
    TransactionTable,
}

impl HistoryRegion {
    const REQUIRED: [HistoryRegion; 3] = [
        HistoryRegion::SearchForm,
        HistoryRegion::CalculateButton,
        HistoryRegion::SummaryModal,
    ];
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    #[error("history page is missing required region {0:?}")]
    MissingRegion(HistoryRegion),
}

pub trait HistoryView: Send + Sync {
    fn has_region(&self, region: HistoryRegion) -> bool;
    fn page_query(&self) -> String;
    fn date_inputs(&self) -> DateRange;
    fn set_date_inputs(&self, range: &DateRange);
    fn transaction_rows(&self) -> Vec<TableRow>;

    fn show_summary(&self, modal: &SummaryModalView);
    fn hide_summary(&self);

    fn show_rating_prompt(&self, prompt: &RatingPrompt);
    fn hide_rating_modal(&self);
    fn mark_rated(&self, control: RateControlId);

    fn alert(&self, message: &str);
}

pub struct HistoryPage {
    view: Arc<dyn HistoryView>,
    rating: Option<RatingModal>,
}

impl HistoryPage {
    pub fn mount(view: Arc<dyn HistoryView>, today: NaiveDate) -> Result<Self, MountError> {
        if let Some(missing) = HistoryRegion::REQUIRED
            .into_iter()
            .find(|region| !view.has_region(*region))
        {
            error!(region = ?missing, "required history page element not found");
            return Err(MountError::MissingRegion(missing));
        }

        if let Some(range) = dates::initial_range(&view.page_query(), today) {
            debug!(start = %range.start, end = %range.end, "applying default search range");
            view.set_date_inputs(&range);
        }

        let rating = (view.has_region(HistoryRegion::RatingModal)
            && view.has_region(HistoryRegion::TransactionTable))
        .then(RatingModal::new);

        Ok(Self { view, rating })
    }

    pub fn rating_enabled(&self) -> bool {
        self.rating.is_some()
    }

    pub fn request_summary(&self) -> Result<SummaryModalView, SummaryError> {
        let range = self.view.date_inputs();
        let result = if range.is_complete() {
            summary::summarize(&range, &self.view.transaction_rows())
        } else {
            Err(SummaryError::MissingDates)
        };

        match result {
            Ok(modal) => {
                info!(
                    rows = modal.line_items.len(),
                    currencies = modal.totals.len(),
                    "showing expense summary"
                );
                self.view.show_summary(&modal);
                Ok(modal)
            }
            Err(err) => {
                if let SummaryError::InvalidPrice { row, .. } = &err {
                    warn!(row, "unreadable price in transaction table");
                }
                self.view.alert(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn close_summary(&self) {
        self.view.hide_summary();
    }

    pub fn open_rating(&mut self, control: &RateControl) -> Result<(), RatingError> {
        let Some(modal) = self.rating.as_mut() else {
            debug!("page has no rating modal");
            return Err(RatingError::NotOpen);
        };
        let prompt = modal.open(control)?;
        self.view.show_rating_prompt(&prompt);
        Ok(())
    }

    pub fn select_rating(&mut self, criterion: Criterion, stars: u8) -> Result<(), RatingError> {
        self.rating
            .as_mut()
            .ok_or(RatingError::NotOpen)?
            .select(criterion, stars)
    }

    pub fn submit_rating(&mut self) -> Result<RatingSubmission, RatingError> {
        let modal = self.rating.as_mut().ok_or(RatingError::NotOpen)?;
        match modal.submit() {
            Ok(submission) => {
                info!(
                    control = submission.control.0,
                    forwarder = %submission.forwarder_name,
                    "forwarder rating submitted"
                );
                self.view.alert(RATING_SUBMITTED_MESSAGE);
                self.view.mark_rated(submission.control);
                self.view.hide_rating_modal();
                Ok(submission)
            }
            Err(err @ RatingError::Incomplete { .. }) => {
                self.view.alert(&err.to_string());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn close_rating(&mut self) {
        if let Some(modal) = self.rating.as_mut() {
            modal.close();
            self.view.hide_rating_modal();
        }
    }

    pub fn rating_modal(&self) -> Option<&RatingModal> {
        self.rating.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
