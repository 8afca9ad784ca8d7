/// Clean raw model output so it can be handed to `serde_json`.
///
/// Models frequently wrap their JSON in markdown fences, emit literal `\n`
/// escapes outside of strings, or "helpfully" convert quotes to typographic
/// ones. This strips all of that. Empty input yields an empty string.
pub fn clean_json_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    raw.replace("```json", "")
        .replace("```", "")
        .replace("\\n", " ")
        .replace('\n', " ")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .trim()
        .to_string()
}

/// Canonical point-decimal form of a numeric answer (`"3,5"` -> `"3.5"`).
pub fn normalize_number(value: &str) -> String {
    value.trim().replace(',', ".")
}

/// Parse an answer as a float after normalization.
pub fn parse_number(value: &str) -> Option<f64> {
    normalize_number(value).parse::<f64>().ok()
}

pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}
