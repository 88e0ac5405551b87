//! Colon-delimited key-path lookup over a parsed value tree.
//!
//! The same path convention configuration-section binding uses
//! (`"Logging:Level"`), so hosts can probe a document without re-parsing.

use crate::value::ConfigValue;

/// Walk `key_path` through nested objects, returning the value it lands on.
///
/// `None` for blank paths, missing keys, or a non-object partway through.
pub fn read<'a>(root: &'a ConfigValue, key_path: &str) -> Option<&'a ConfigValue> {
    if key_path.trim().is_empty() {
        return None;
    }
    let mut current = root;
    for key in key_path.split(':') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn doc() -> ConfigValue {
        parser::parse(r#"{"A":{"B":{"C":42},"Flag":true},"Top":"x"}"#).unwrap()
    }

    #[test]
    fn walks_nested_sections() {
        let root = doc();
        assert_eq!(read(&root, "A:B:C"), Some(&ConfigValue::Integer(42)));
        assert_eq!(read(&root, "A:Flag"), Some(&ConfigValue::Boolean(true)));
        assert_eq!(read(&root, "Top"), Some(&ConfigValue::String("x".to_string())));
    }

    #[test]
    fn misses_return_none() {
        let root = doc();
        assert_eq!(read(&root, "A:Missing"), None);
        // "Top" is a string; descending into it is a miss, not an error.
        assert_eq!(read(&root, "Top:Deeper"), None);
        assert_eq!(read(&root, ""), None);
        assert_eq!(read(&root, "  "), None);
    }
}
