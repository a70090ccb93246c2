use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::DateOrder;

/// Date-shaped patterns, in trust order. All matches across all
/// patterns are collected; plausibility filtering decides the winner.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{4}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2}\b",
        r"(?i)\b\d{1,2}\s(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s\d{4}\b",
        r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s\d{1,2},?\s\d{4}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("date regex"))
    .collect()
});

static SHORT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2}$").expect("short year regex"));

/// Finds the most recent plausible date in the text.
///
/// Candidates in the future or more than one year before `today` are
/// discarded; individual parse failures are swallowed. `None` means the
/// caller should fall back to `today`.
pub(crate) fn extract(text: &str, today: NaiveDate, order: DateOrder) -> Option<NaiveDate> {
    let floor = one_year_before(today);
    DATE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .filter_map(|m| parse_candidate(m.as_str(), order))
        .filter(|date| *date <= today && *date >= floor)
        .max()
}

fn parse_candidate(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let slashed = raw.replace('-', "/");
    let normalized = if SHORT_YEAR.is_match(&slashed) {
        let (head, year) = slashed.rsplit_once('/')?;
        format!("{head}/20{year}")
    } else {
        slashed
    };
    if normalized.chars().any(|c| c.is_ascii_alphabetic()) {
        parse_named_month(&normalized)
    } else {
        parse_numeric(&normalized, order)
    }
}

fn parse_numeric(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        match order {
            DateOrder::MonthFirst => (parts[2], parts[0], parts[1]),
            DateOrder::DayFirst => (parts[2], parts[1], parts[0]),
        }
    };
    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
}

/// Handles `12 Jun 2025`, `June 12, 2025`, and truncated month names as
/// OCR tends to emit them.
fn parse_named_month(value: &str) -> Option<NaiveDate> {
    let cleaned = value.replace(',', " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() != 3 {
        return None;
    }
    let (day_token, month_token, year_token) = if tokens[0].chars().all(|c| c.is_ascii_digit()) {
        (tokens[0], tokens[1], tokens[2])
    } else {
        (tokens[1], tokens[0], tokens[2])
    };
    NaiveDate::from_ymd_opt(
        year_token.parse().ok()?,
        month_number(month_token)?,
        day_token.parse().ok()?,
    )
}

fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn one_year_before(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() - 1, date.month(), date.day())
        // Feb 29 rolls to Mar 1, like the calendar arithmetic upstream.
        .unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(date.year() - 1, 3, 1).unwrap_or(date)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn iso_date_parses_with_either_separator() {
        assert_eq!(
            extract("printed 2025-06-10", today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 10))
        );
        assert_eq!(
            extract("printed 2025/06/10", today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 10))
        );
    }

    #[test]
    fn short_year_is_expanded_with_20_prefix() {
        assert_eq!(
            extract("dated 10-06-25", today(), DateOrder::DayFirst),
            Some(ymd(2025, 6, 10))
        );
    }

    #[test]
    fn numeric_order_is_a_configuration_choice() {
        let text = "billed 03/04/2025";
        assert_eq!(
            extract(text, today(), DateOrder::MonthFirst),
            Some(ymd(2025, 3, 4))
        );
        assert_eq!(
            extract(text, today(), DateOrder::DayFirst),
            Some(ymd(2025, 4, 3))
        );
    }

    #[test]
    fn named_month_formats_parse() {
        assert_eq!(
            extract("12 Jun 2025", today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 12))
        );
        assert_eq!(
            extract("June 12, 2025", today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 12))
        );
    }

    #[test]
    fn future_and_stale_dates_are_discarded() {
        assert_eq!(extract("2025-12-31", today(), DateOrder::MonthFirst), None);
        assert_eq!(extract("2023-01-01", today(), DateOrder::MonthFirst), None);
    }

    #[test]
    fn most_recent_surviving_candidate_wins() {
        let text = "opened 2024-08-01 billed 2025-06-01 due 2025-05-01";
        assert_eq!(
            extract(text, today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 1))
        );
    }

    #[test]
    fn invalid_calendar_dates_are_swallowed() {
        // Month 13 never parses; the other candidate still wins.
        let text = "13/13/2025 and 2025-06-02";
        assert_eq!(
            extract(text, today(), DateOrder::MonthFirst),
            Some(ymd(2025, 6, 2))
        );
    }
}
