//! Phone number normalisation for outbound messaging.
//!
//! Outbound WhatsApp delivery requires E.164 numbers. Local ten-digit numbers
//! are assumed to be Nepali and prefixed with the country code.

/// Country prefix applied to bare ten-digit local numbers.
const LOCAL_COUNTRY_PREFIX: &str = "+977";

/// Strip separators and prefix the country code for local ten-digit numbers.
pub fn normalize_phone(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if stripped.len() == 10 && stripped.chars().all(|c| c.is_ascii_digit()) {
        let significant = stripped.trim_start_matches('0');
        return format!("{LOCAL_COUNTRY_PREFIX}{significant}");
    }
    stripped
}

/// Whether the string is a plausible E.164 number: `+` followed by 10 to 15
/// digits.
pub fn is_valid_e164(candidate: &str) -> bool {
    let Some(digits) = candidate.strip_prefix('+') else {
        return false;
    };
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
