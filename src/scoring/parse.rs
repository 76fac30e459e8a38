//! Lenient numeric parsing for form fields.
//!
//! Form inputs arrive as free text. The longest leading decimal number is
//! taken ("32 kg" reads as 32); anything without one, or a non-finite
//! result, yields the field's default. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

/// Leading decimal number: optional sign, fraction and exponent.
static RE_LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Parse `raw` or fall back to `default`.
pub fn parse_or(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(parse_leading_number)
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

fn parse_leading_number(raw: &str) -> Option<f64> {
    let caps = RE_LEADING_NUMBER.captures(raw)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}
