//! Text and number normalizers applied to raw size-grid cells.

use crate::domain::model::RangeValue;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CM_UNIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bcm\b").unwrap());
static INT_OR_DOT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());
static GROUPED_COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]{1,3}(?:\.[0-9]{3})*,[0-9]+$").unwrap());
static SIMPLE_COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+,[0-9]+$").unwrap());
static EMBEDDED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+(?:[.,][0-9]+)?").unwrap());
static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-\u{2013}\u{2014}]\s*").unwrap());

/// Lookup-table key: trimmed and lower-cased.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Header-safe form of a free-text label: all whitespace removed, case kept.
pub fn sanitize_header_name(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), "").into_owned()
}

/// Canonicalizes a numeric token written with a decimal comma, dotted
/// thousands groups, a `cm` unit or an inch mark.
///
/// `"1.234,5"` becomes `"1234.5"` and `"12,5cm"` becomes `"12.5"`. Text with
/// no digits comes back trimmed. Applying it twice gives the same result.
pub fn normalize_number_like(value: &str) -> String {
    let stripped = strip_units(value);
    let s = stripped.as_str();

    if INT_OR_DOT_DECIMAL.is_match(s) {
        return s.to_string();
    }

    if GROUPED_COMMA_DECIMAL.is_match(s) || SIMPLE_COMMA_DECIMAL.is_match(s) {
        return s.replace('.', "").replacen(',', ".", 1);
    }

    match EMBEDDED_NUMBER.find(s) {
        Some(m) => normalize_number_like(m.as_str()),
        None => s.to_string(),
    }
}

/// Removes `cm` tokens and inch marks until none are left. Dropping a quote
/// can join a new `cm` token (`c"m`), so one pass is not enough.
fn strip_units(value: &str) -> String {
    let mut current = value.trim().to_string();
    loop {
        let next = CM_UNIT.replace_all(&current, "").replace('"', "");
        let next = next.trim();
        if next == current {
            return current;
        }
        current = next.to_string();
    }
}

/// Splits a measurement cell such as `"80-85"` or `"80 – 85"` into its
/// bounds. A single value fills both bounds; only the first two parts of a
/// multi-part range are used.
pub fn parse_range_to_pair(raw: &str) -> RangeValue {
    parse_range_with(raw, true)
}

pub(crate) fn parse_range_with(raw: &str, normalize_numbers: bool) -> RangeValue {
    let s = raw.trim();
    if s.is_empty() {
        return RangeValue::empty();
    }

    let normalize = |part: &str| {
        if normalize_numbers {
            normalize_number_like(part)
        } else {
            part.trim().to_string()
        }
    };

    let mut parts = RANGE_SEPARATOR.split(s);
    match (parts.next(), parts.next()) {
        (Some(initial), Some(last)) => RangeValue::new(normalize(initial), normalize(last)),
        _ => {
            let value = normalize(s);
            RangeValue::new(value.clone(), value)
        }
    }
}
