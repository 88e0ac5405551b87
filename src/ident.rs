//! Identifier normalization for JSON keys.
//!
//! The only place name sanitization lives; model building never re-derives
//! names on its own. `normalize` is pure and total: the result depends on the
//! input key alone, never on siblings or position, so regeneration is
//! diff-stable.

/// Placeholder for keys that are empty or all-whitespace.
pub const UNNAMED_PLACEHOLDER: &str = "UnnamedProperty";

/// Placeholder for keys left empty after stripping invalid characters.
pub const INVALID_NAME_PLACEHOLDER: &str = "InvalidNameProperty";

/// Map an arbitrary JSON key to a valid identifier.
///
/// Policy, in order: placeholder for blank keys; strip everything outside
/// `[A-Za-z0-9_]`; placeholder if nothing survives; prefix `_` on a leading
/// digit; upper-case the first character of whatever remains.
pub fn normalize(key: &str) -> String {
    if key.trim().is_empty() {
        return UNNAMED_PLACEHOLDER.to_string();
    }

    let mut sanitized: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if sanitized.is_empty() {
        return INVALID_NAME_PLACEHOLDER.to_string();
    }

    if sanitized.as_bytes()[0].is_ascii_digit() {
        sanitized.insert(0, '_');
    }

    // Sanitized text is pure ASCII at this point.
    if let Some(first) = sanitized.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    sanitized
}
