/// Grouping key for free-text labels: trimmed and lowercased.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Capitalizes the first letter of every space-separated word and lowercases
/// the rest. Runs of spaces are kept as they are.
pub fn title_case_words(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Formats large counters for compact display (`1.2K`, `3.4M`).
///
/// One decimal is kept and halves round up, so 1250 shows as `1.3K`.
pub fn format_compact_number(value: i64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", round_tenths(value, 1_000_000))
    } else if value >= 1_000 {
        format!("{:.1}K", round_tenths(value, 1_000))
    } else {
        value.to_string()
    }
}

fn round_tenths(value: i64, unit: i64) -> f64 {
    (value as f64 * 10.0 / unit as f64).round() / 10.0
}

/// Picks the singular or plural noun for a count.
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}
