//! Phone number normalization into international dialing form.

/// Country calling code substituted for the local trunk prefix.
pub const DEFAULT_COUNTRY_CODE: &str = "+84";

/// Normalize a local-format phone number using [`DEFAULT_COUNTRY_CODE`].
///
/// - already international (`+...`): unchanged
/// - local trunk prefix (`0...`): the `0` is replaced by the country code
/// - anything else: unchanged, no validation is performed
///
/// # Examples
///
/// ```
/// use venuebook_core::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("0912345678"), "+84912345678");
/// assert_eq!(normalize_phone("+84912345678"), "+84912345678");
/// assert_eq!(normalize_phone("912345678"), "912345678");
/// ```
pub fn normalize_phone(number: &str) -> String {
    normalize_phone_with(number, DEFAULT_COUNTRY_CODE)
}

/// Same as [`normalize_phone`] with an explicit country calling code.
pub fn normalize_phone_with(number: &str, country_code: &str) -> String {
    if number.starts_with('+') {
        return number.to_string();
    }
    match number.strip_prefix('0') {
        Some(national) => format!("{country_code}{national}"),
        None => number.to_string(),
    }
}
