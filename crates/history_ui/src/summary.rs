use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::dates::DateRange;

const MAX_FRACTION_DIGITS: u32 = 3;
const TOTALS_HEADING: &str = "Total expenses";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Placeholder,
    Transaction {
        item_name: String,
        price_text: String,
    },
}

impl TableRow {
    pub fn transaction(item_name: impl Into<String>, price_text: impl Into<String>) -> Self {
        TableRow::Transaction {
            item_name: item_name.into(),
            price_text: price_text.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Select both a start and an end date to calculate the total.")]
    MissingDates,
    #[error("There is no data to calculate.")]
    NoData,
    #[error("Could not read the price of row {row} ('{item_name}'): \"{price_text}\"")]
    InvalidPrice {
        row: usize,
        item_name: String,
        price_text: String,
    },
    #[error("The {currency} total is too large to calculate.")]
    TotalOverflow { currency: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub amount: Decimal,
    pub currency: String,
}

impl Price {
    /// Parses `"<amount> <CURRENCY>"`, ignoring `,` group separators.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let amount = parts.next()?.replace(',', "");
        let currency = parts.next()?;
        let amount = Decimal::from_str(&amount)
            .or_else(|_| Decimal::from_scientific(&amount))
            .ok()?;
        Some(Self {
            amount,
            currency: currency.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub item_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub formatted_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTotal {
    pub currency: String,
    pub amount: Decimal,
    pub formatted_amount: String,
}

impl CurrencyTotal {
    fn new(currency: String, amount: Decimal) -> Self {
        Self {
            formatted_amount: format_amount(amount),
            currency,
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryModalView {
    pub title: String,
    pub line_items: Vec<LineItem>,
    pub totals_heading: &'static str,
    /// Positive totals only, in the order each currency first appeared.
    pub totals: Vec<CurrencyTotal>,
}

pub fn summarize(range: &DateRange, rows: &[TableRow]) -> Result<SummaryModalView, SummaryError> {
    if rows.is_empty() || matches!(rows, [TableRow::Placeholder]) {
        return Err(SummaryError::NoData);
    }

    let mut line_items = Vec::with_capacity(rows.len());
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let TableRow::Transaction {
            item_name,
            price_text,
        } = row
        else {
            continue;
        };
        let price = Price::parse(price_text).ok_or_else(|| SummaryError::InvalidPrice {
            row: index + 1,
            item_name: item_name.clone(),
            price_text: price_text.clone(),
        })?;

        match totals.iter_mut().find(|(currency, _)| *currency == price.currency) {
            Some((_, total)) => {
                *total = total.checked_add(price.amount).ok_or_else(|| {
                    SummaryError::TotalOverflow {
                        currency: price.currency.clone(),
                    }
                })?;
            }
            None => totals.push((price.currency.clone(), price.amount)),
        }
        line_items.push(LineItem {
            item_name: item_name.clone(),
            formatted_amount: format_amount(price.amount),
            amount: price.amount,
            currency: price.currency,
        });
    }

    Ok(SummaryModalView {
        title: format!("Expense summary ({} ~ {})", range.start, range.end),
        line_items,
        totals_heading: TOTALS_HEADING,
        totals: totals
            .into_iter()
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .map(|(currency, amount)| CurrencyTotal::new(currency, amount))
            .collect(),
    })
}

// en-US grouping, at most three fraction digits, no trailing zeros.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
#[path = "tests/summary_tests.rs"]
mod tests;
