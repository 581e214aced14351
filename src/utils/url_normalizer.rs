//! Redirect target normalization.

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Ensures a redirect target declares a protocol.
///
/// Targets that already begin with `http://` or `https://` keep their
/// scheme. Anything else is prefixed with `https://`; the missing-protocol
/// case always defaults to the secure scheme.
///
/// ASCII control characters are percent-encoded, so the result is always
/// usable as a `Location` header value.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(ensure_protocol("example.com"), "https://example.com");
/// assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
/// ```
pub fn ensure_protocol(target: &str) -> String {
    let target = encode_control_chars(target);
    if target.starts_with(HTTP_PREFIX) || target.starts_with(HTTPS_PREFIX) {
        target
    } else {
        format!("{}{}", HTTPS_PREFIX, target)
    }
}

fn encode_control_chars(target: &str) -> String {
    let mut encoded = String::with_capacity(target.len());
    for c in target.chars() {
        if c.is_ascii_control() {
            encoded.push_str(&format!("%{:02X}", c as u8));
        } else {
            encoded.push(c);
        }
    }
    encoded
}
