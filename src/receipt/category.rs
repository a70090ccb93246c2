use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword sets in priority order; the first set that matches anywhere
/// in the text decides the category.
static CATEGORY_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)uber|ola|bus|train|flight|ticket|travel", "Travel"),
        (r"(?i)restaurant|food|meal|dine|pizza|burger", "Food"),
        (r"(?i)medical|pharmacy|hospital|doctor", "Health"),
        (r"(?i)shopping|mall|store|clothes|apparel", "Shopping"),
        (r"(?i)electricity|water|gas|bill|recharge", "Utilities"),
    ]
    .iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("category regex"), *name))
    .collect()
});

/// Guesses a category name from the full text; `None` requires manual
/// selection upstream.
pub(crate) fn extract(text: &str) -> Option<String> {
    CATEGORY_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, name)| (*name).to_string())
}
