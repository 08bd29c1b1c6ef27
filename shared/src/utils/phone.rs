//! Phone number utilities
//!
//! All verification state is keyed by the canonical local form of a phone
//! number: exactly `key_len` digits with any recognized country prefix
//! removed. Normalization is pure and total; callers decide what to do with
//! a result of the wrong length.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").unwrap());

/// Normalize a raw phone number to its local digit form
///
/// Strips every non-digit character, removes a leading `country_prefix` when
/// the remainder is longer than `key_len`, and finally keeps only the last
/// `key_len` digits. The result has length `key_len` for any plausible
/// input; anything else means the input was not a valid subscriber number.
pub fn normalize_phone(raw: &str, country_prefix: &str, key_len: usize) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut digits = NON_DIGITS.replace_all(raw, "").into_owned();

    if digits.len() > key_len && digits.starts_with(country_prefix) {
        digits = digits[country_prefix.len()..].to_string();
    }

    if digits.len() > key_len {
        digits = digits[digits.len() - key_len..].to_string();
    }

    digits
}

/// Format a phone number for display (`+995 XXXXXXXXX`)
///
/// Falls back to the trimmed raw input when the digits do not form a local
/// key with or without the country prefix.
pub fn format_phone_display(raw: &str, country_prefix: &str, key_len: usize) -> String {
    let digits = NON_DIGITS.replace_all(raw, "");

    if digits.len() == country_prefix.len() + key_len && digits.starts_with(country_prefix) {
        return format!("+{} {}", country_prefix, &digits[country_prefix.len()..]);
    }

    if digits.len() == key_len {
        return format!("+{} {}", country_prefix, digits);
    }

    raw.trim().to_string()
}

/// Mask a phone number for logging (show only the last 4 digits)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        "****".to_string()
    } else {
        format!("***{}", &phone[phone.len() - 4..])
    }
}
