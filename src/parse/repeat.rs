use regex::Regex;
use std::sync::LazyLock;

/// Keywords recognised anywhere in a repeat rule, case-insensitively. The first match wins, so
/// `weekday` has to be checked before `weekly`.
const KEYWORD_REPEATERS: &[(&str, &str)] = &[
    ("daily", "+1d"),
    ("weekday", ".+1d"),
    ("weekly", "+1w"),
    ("monthly", "+1m"),
    ("yearly", "+1y"),
];

/// `2 days`, `3 weeks`, `1 month`, etc.
static NUMBERED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*(day|week|month|year)s?\b").unwrap());

/// `Monday`, `every Friday`, `every 2 Tuesdays`, etc.
static WEEKDAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:every\s+)?(?:(\d+)\s+)?(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?\b",
    )
    .unwrap()
});

/// Converts a repeat rule into an Org repeater cookie (e.g. `+1w`). Rules are free-form text
/// (anything from an RRULE to `every 2 days`), so this works through an ordered set of patterns
/// and hands back the rule untouched if none of them match. Empty rules produce `None`.
pub fn normalize_recurrence(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lower = raw.to_lowercase();
    if let Some((_, repeater)) = KEYWORD_REPEATERS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
    {
        return Some(repeater.to_string());
    }

    if let Some(caps) = NUMBERED_PATTERN.captures(raw) {
        let count = &caps[1];
        // Units all start with distinct letters, which are also Org's unit letters
        let unit = caps[2].to_lowercase();
        return Some(format!("+{count}{}", &unit[..1]));
    }

    if let Some(caps) = WEEKDAY_PATTERN.captures(raw) {
        let count = caps.get(1).map_or("1", |m| m.as_str());
        return Some(format!(".+{count}w"));
    }

    tracing::debug!(raw, "passing through unrecognised repeat rule");
    Some(raw.to_string())
}
