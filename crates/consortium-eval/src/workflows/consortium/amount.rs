//! Parsing of won amounts written with Korean denomination words, e.g.
//! `"1억 5,000만"` or `"32억"`, into a single numeric total.

use std::sync::OnceLock;

use regex::Regex;

const EOK: f64 = 100_000_000.0;
const MAN: f64 = 10_000.0;

fn eok_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([\d.]+)\s*억").expect("valid eok pattern"))
}

fn man_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([\d.]+)\s*만").expect("valid man pattern"))
}

/// Parse an amount string into won. Returns `None` for blank input or when
/// nothing positive can be recovered from it.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut rest: String = trimmed
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '억' | '만' | '백' | '십'))
        .collect();
    let mut total = 0.0;

    for (pattern, unit) in [(eok_pattern(), EOK), (man_pattern(), MAN)] {
        let Some(found) = pattern.captures(&rest) else {
            continue;
        };
        if let Ok(value) = found[1].parse::<f64>() {
            total += value * unit;
        }
        let matched = found[0].to_string();
        rest = rest.replacen(&matched, "", 1);
    }

    if !rest.is_empty() {
        if let Ok(value) = rest.parse::<f64>() {
            total += value;
        }
    }

    (total > 0.0).then_some(total)
}

/// Parse an optional roster cell, treating anything unusable as zero.
pub fn amount_or_zero(raw: Option<&str>) -> f64 {
    raw.and_then(parse_amount).unwrap_or(0.0)
}

/// Render won with thousands separators and no fractional part.
pub fn format_won(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
