/// Words that mark a line as receipt boilerplate rather than a merchant
/// or purchase title.
const STOP_WORDS: [&str; 5] = ["invoice", "receipt", "bill", "total", "amount"];

/// Picks the first non-empty line free of boilerplate words.
pub(crate) fn extract(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let lowered = line.to_lowercase();
            !STOP_WORDS.iter().any(|word| lowered.contains(word))
        })
        .map(str::to_string)
}
