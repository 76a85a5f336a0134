use std::sync::OnceLock;

use regex::Regex;

/// Price patterns, most specific first
fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)(\d+\.?\d*)\s*per\s+1M",
            r"(?i)(\d+\.?\d*)\s*/\s*1M",
            r"(?i)(\d+\.?\d*)\s*per\s+million",
            r"(?i)(\d+\.?\d*)\s*million",
            r"^(\d+\.?\d*)$",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("must be valid regex"))
        .collect()
    })
}

/// Pull a per-million-token price out of free text
///
/// Thousands separators and dollar signs are ignored. Returns the first
/// pattern match that parses as a number, or `None`.
pub fn extract_price(text: &str) -> Option<f64> {
    let cleaned = text.replace([',', '$'], "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return None;
    }

    patterns()
        .iter()
        .filter_map(|pattern| pattern.captures(cleaned))
        .find_map(|captures| captures[1].parse::<f64>().ok())
}
