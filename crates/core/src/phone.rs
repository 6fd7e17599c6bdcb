//! Phone number normalization and room-name extraction
//!
//! Outbound SMS addressing requires E.164-style numbers, so collected phone
//! numbers are normalized before storage. Inbound telephony rooms encode the
//! caller's number in the room name, which lets the agent skip phone
//! collection entirely for those calls.

use once_cell::sync::Lazy;
use regex::Regex;

/// Room names for inbound calls look like `call-_+15145859691_yZ35TYo5aNjy`.
static ROOM_PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"call-_(\+\d+)_").expect("valid room phone pattern"));

/// Normalize a free-form phone number to SMS-provider format (`+12223334444`).
///
/// Strips every non-digit character, then:
/// - 10 digits: prepend the "1" country code;
/// - 11 digits starting with "1": keep as-is;
/// - 11 digits not starting with "1": assume the country code is missing and
///   prepend "1" anyway. This yields a 12-digit number and is a known quirk
///   kept for parity with the deployed behavior (see DESIGN.md).
///
/// The result is prefixed with "+". An empty input is returned unchanged.
pub fn format_phone_number(phone: &str) -> String {
    if phone.is_empty() {
        return phone.to_string();
    }

    let mut digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        digits.insert(0, '1');
    } else if digits.len() == 11 && !digits.starts_with('1') {
        digits.insert(0, '1');
    }

    format!("+{}", digits)
}

/// Extract the caller phone number from an inbound call room name.
///
/// Returns `None` when the room name does not follow the
/// `call-_<phone>_<suffix>` pattern (for example web-originated sessions).
pub fn extract_phone_from_room_name(room_name: &str) -> Option<String> {
    ROOM_PHONE_PATTERN
        .captures(room_name)
        .map(|caps| caps[1].to_string())
}
