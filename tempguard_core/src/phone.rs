//! Phone number normalization and structural heuristics

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Optional `+`, first digit 1-9, 9 to 12 digits in total
static E164_LITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{8,11}$").expect("phone shape regex"));

/// Reserved NANP prefix used for fictional numbers
const NANP_RESERVED_PREFIX: &str = "555";

/// Drop everything except digits and `+`
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check a cleaned number against the E.164-lite shape
pub fn is_e164_lite(cleaned: &str) -> bool {
    E164_LITE.is_match(cleaned)
}

/// Normalize a free-form phone number into its canonical national form.
///
/// NANP variants collapse: `+1` is dropped, and a bare leading `1` is dropped
/// when the cleaned number has exactly 11 digits. Any other `+` is stripped.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned = clean(raw);
    if !is_e164_lite(&cleaned) {
        return None;
    }

    if let Some(national) = cleaned.strip_prefix("+1") {
        return Some(national.to_string());
    }
    if cleaned.len() == 11 {
        if let Some(national) = cleaned.strip_prefix('1') {
            return Some(national.to_string());
        }
    }

    Some(cleaned.trim_start_matches('+').to_string())
}

/// Low-entropy or reserved-looking number.
///
/// Audit signal only: a number that trips this check is not considered
/// disposable unless it is also listed by a source.
pub fn structurally_suspicious(number: &str) -> bool {
    if is_single_repeated_digit(number) {
        return true;
    }

    let distinct: HashSet<char> = number.chars().collect();
    if distinct.len() <= 3 {
        return true;
    }

    number.starts_with(NANP_RESERVED_PREFIX)
}

fn is_single_repeated_digit(number: &str) -> bool {
    let mut chars = number.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => {
            number.len() >= 10 && chars.all(|c| c == first)
        }
        _ => false,
    }
}
