//! Escaping for RediSearch query strings.
//!
//! RediSearch tokenizes on punctuation and treats characters such as `-`,
//! `|`, `@`, `{` and `}` as query operators. Any user-supplied value placed in
//! a query must go through [`escape_tag_value`] so it is matched as a literal.

/// Escapes `value` for use inside a TAG filter (`@field:{...}`).
///
/// Every character other than an ASCII letter, digit or underscore is
/// prefixed with a backslash. This covers the whole RediSearch punctuation
/// set, whitespace included.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(escape_tag_value("my-link"), r"my\-link");
/// assert_eq!(escape_tag_value("plain_alias"), "plain_alias");
/// ```
pub fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() * 2);

    for c in value.chars() {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Builds an exact-match TAG query for `value` on `field`.
pub fn tag_query(field: &str, value: &str) -> String {
    format!("@{}:{{{}}}", field, escape_tag_value(value))
}
