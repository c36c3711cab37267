/// Header text with invisible markers and surrounding whitespace removed.
pub(crate) fn clean_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folded header used for alias lookup.
pub(crate) fn normalize_header(value: &str) -> String {
    clean_header(value).to_ascii_lowercase()
}

/// Left-pad numeric codes with zeros up to `width` characters.
pub(crate) fn pad_code(value: &str, width: usize) -> String {
    let trimmed = value.trim();
    format!("{trimmed:0>width$}")
}
