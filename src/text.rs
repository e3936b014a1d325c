/// Splits a sentence on whitespace, lowercasing every token unless
/// `keep_case` is set.
pub fn tokenize(input: &str, keep_case: bool) -> Vec<String> {
    input
        .split_whitespace()
        .map(|w| if keep_case { w.to_string() } else { w.to_lowercase() })
        .collect()
}
