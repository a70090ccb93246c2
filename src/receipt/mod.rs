//! Receipt field extractor: best-effort inference of a transaction's
//! title, amount, date, and category from raw OCR text.
//!
//! Each field has its own extraction strategy returning `Option`; the
//! strategies are independent and a failure in one never poisons the
//! others. The result is advisory: callers re-present it in an
//! editable form, never auto-submit.

mod amount;
mod category;
mod date;
mod title;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day/month ordering assumed when a numeric date like `12/01/2024` is
/// ambiguous. OCR receipts carry no locale, so this is a configuration
/// choice rather than a guess.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY`, matching the original JavaScript `Date` parse.
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY`.
    DayFirst,
}

/// Knobs for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub date_order: DateOrder,
}

/// Best-effort extraction result. Absent fields are a valid outcome;
/// `date` always carries a value, defaulting to the scan date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptDraft {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub date: NaiveDate,
    pub category: Option<String>,
}

/// Runs every extraction strategy over the OCR text.
///
/// `today` anchors the date plausibility window (not in the future, at
/// most one year old) and is the fallback when no candidate survives.
pub fn scan(text: &str, today: NaiveDate, options: &ScanOptions) -> ReceiptDraft {
    let draft = ReceiptDraft {
        title: title::extract(text),
        amount: amount::extract(text),
        date: date::extract(text, today, options.date_order).unwrap_or(today),
        category: category::extract(text),
    };
    tracing::debug!(
        title = draft.title.as_deref().unwrap_or(""),
        amount = draft.amount.unwrap_or(0.0),
        date = %draft.date,
        category = draft.category.as_deref().unwrap_or(""),
        "receipt scan complete"
    );
    draft
}

/// Renders an extracted amount the way the entry form expects: integral
/// values lose their fraction (`450.0` becomes `"450"`).
pub fn format_amount(amount: f64) -> String {
    if amount == amount.trunc() {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    #[test]
    fn scan_of_boilerplate_yields_empty_draft_with_default_date() {
        let draft = scan("INVOICE\nGrand Total\nReceipt", today(), &ScanOptions::default());
        assert_eq!(draft.title, None);
        assert_eq!(draft.amount, None);
        assert_eq!(draft.date, today());
        assert_eq!(draft.category, None);
    }

    #[test]
    fn scan_of_full_receipt_fills_every_field() {
        let text = "Sharma Dhaba\nInvoice 4411\n12 Jun 2025\nMeal for two\nTotal: ₹450.00";
        let draft = scan(text, today(), &ScanOptions::default());
        assert_eq!(draft.title.as_deref(), Some("Sharma Dhaba"));
        assert_eq!(draft.amount, Some(450.0));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert_eq!(draft.category.as_deref(), Some("Food"));
    }

    #[test]
    fn format_amount_trims_integral_fractions() {
        assert_eq!(format_amount(450.0), "450");
        assert_eq!(format_amount(123.45), "123.45");
        assert_eq!(format_amount(99.5), "99.5");
    }
}
