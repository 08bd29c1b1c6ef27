//! Canonical phone key value object

use av_shared::config::OtpConfig;
use av_shared::utils::phone::{mask_phone, normalize_phone};
use serde::{Deserialize, Serialize};

/// Canonical local phone identifier
///
/// Every piece of verification state (codes, proof tokens, rate counters) is
/// keyed by a `PhoneKey`, never by raw user input. The invariant is exactly
/// `OtpConfig::phone_key_length` digits; `parse` is the only constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    /// Normalize raw input into a canonical key
    ///
    /// Returns `None` when the normalized digits do not have exactly the
    /// configured length.
    pub fn parse(raw: &str, config: &OtpConfig) -> Option<Self> {
        let digits = normalize_phone(raw, &config.country_prefix, config.phone_key_length);
        if digits.len() == config.phone_key_length {
            Some(Self(digits))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// International form expected by the SMS provider (`995XXXXXXXXX`)
    pub fn international(&self, country_prefix: &str) -> String {
        format!("{}{}", country_prefix, self.0)
    }

    /// Masked form for logging; raw keys never go to logs
    pub fn masked(&self) -> String {
        mask_phone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OtpConfig {
        OtpConfig::default()
    }

    #[test]
    fn parses_local_and_international_forms_to_same_key() {
        let local = PhoneKey::parse("599620303", &config()).unwrap();
        let international = PhoneKey::parse("+995 599 62 03 03", &config()).unwrap();
        assert_eq!(local, international);
        assert_eq!(local.as_str(), "599620303");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(PhoneKey::parse("12345", &config()).is_none());
        assert!(PhoneKey::parse("", &config()).is_none());
        assert!(PhoneKey::parse("no digits here", &config()).is_none());
    }

    #[test]
    fn international_form_prepends_prefix() {
        let key = PhoneKey::parse("599620303", &config()).unwrap();
        assert_eq!(key.international("995"), "995599620303");
    }

    #[test]
    fn masked_hides_leading_digits() {
        let key = PhoneKey::parse("599620303", &config()).unwrap();
        assert_eq!(key.masked(), "***0303");
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = PhoneKey::parse("599620303", &config()).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"599620303\"");
    }
}
