use chrono::{Datelike, NaiveDate};
use url::form_urlencoded;

const DATE_FORMAT: &str = "%Y-%m-%d";
const START_PARAM: &str = "startDate";
const END_PARAM: &str = "endDate";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.start.trim().is_empty() && !self.end.trim().is_empty()
    }
}

pub fn month_to_date(today: NaiveDate) -> DateRange {
    let first = today.with_day(1).unwrap_or(today);
    DateRange::new(
        first.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

pub fn query_has_range(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == START_PARAM || key == END_PARAM)
}

/// Range to prefill on page load, or `None` when the query already has one.
pub fn initial_range(query: &str, today: NaiveDate) -> Option<DateRange> {
    if query_has_range(query) {
        None
    } else {
        Some(month_to_date(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        assert_eq!(
            month_to_date(day(2025, 3, 17)),
            DateRange::new("2025-03-01", "2025-03-17")
        );
        assert_eq!(
            month_to_date(day(2024, 12, 1)),
            DateRange::new("2024-12-01", "2024-12-01")
        );
    }

    #[test]
    fn existing_query_range_is_kept() {
        let today = day(2025, 3, 17);
        assert_eq!(initial_range("?startDate=2025-01-01&endDate=2025-01-31", today), None);
        assert_eq!(initial_range("page=2&endDate=", today), None);
        assert_eq!(
            initial_range("?page=2&keyword=steel", today),
            Some(DateRange::new("2025-03-01", "2025-03-17"))
        );
        assert!(initial_range("", today).is_some());
    }

    #[test]
    fn blank_inputs_are_incomplete() {
        assert!(!DateRange::new("2025-03-01", "").is_complete());
        assert!(!DateRange::new(" ", "2025-03-17").is_complete());
        assert!(DateRange::new("2025-03-01", "2025-03-17").is_complete());
    }
}
