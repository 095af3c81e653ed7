//! Sharing and contact-link helpers

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Public link for a card: `{base}/card/{id}`
pub fn share_url(base_url: &str, card_id: &str) -> String {
    format!("{}/card/{}", base_url.trim_end_matches('/'), card_id)
}

/// Title/text used when sharing a card
pub fn share_text(name: &str) -> String {
    format!("{}님의 디지털 명함", name)
}

/// Target encoded into a card's QR code; the same link as [`share_url`]
pub fn qr_target(base_url: &str, card_id: &str) -> String {
    share_url(base_url, card_id)
}

/// Format a Korean phone number with dashes.
///
/// 11 digits become `3-4-4`, 10 digits become `2-4-4` for Seoul (`02`)
/// numbers and `3-3-4` otherwise. Anything else is returned unchanged.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        11 => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
        10 if digits.starts_with("02") => {
            format!("{}-{}-{}", &digits[..2], &digits[2..6], &digits[6..])
        }
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => phone.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Website value as an absolute URL, adding `https://` when no scheme is given
pub fn normalize_website_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Whether `raw` is an http(s) URL, allowing the scheme to be omitted
pub fn is_valid_url(raw: &str) -> bool {
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    match Url::parse(&candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// `tel:` link keeping only digits and `+`
pub fn tel_uri(phone: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{}", cleaned)
}

pub fn mailto_uri(email: &str) -> String {
    format!("mailto:{}", email.trim())
}

/// Web map search link for an address
pub fn map_search_url(address: &str) -> String {
    match Url::parse_with_params(MAP_SEARCH_BASE, &[("api", "1"), ("query", address)]) {
        Ok(url) => url.into(),
        Err(_) => MAP_SEARCH_BASE.to_string(),
    }
}
