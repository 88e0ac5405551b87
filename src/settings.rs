//! Generator self-configuration.
//!
//! A configuration document may carry a reserved section that configures the
//! generator itself. That section is read here and excluded from model
//! building so it never turns into a generated class.

use serde::Serialize;

use crate::reader;
use crate::value::ConfigValue;

/// Name of the reserved section, matched case-insensitively.
pub const RESERVED_SECTION: &str = "Setgen";

/// Settings read from the reserved section, with defaults for absent or
/// wrongly-typed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorSettings {
    /// Whether the host should also emit options-pattern registration code.
    pub option_pattern_generation_enabled: bool,
    /// File name the host should locate the configuration document under.
    pub source_file: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            option_pattern_generation_enabled: true,
            source_file: "appsettings.json".to_string(),
        }
    }
}

impl GeneratorSettings {
    /// Extract settings from a parsed document, falling back to defaults for
    /// anything absent or of the wrong type.
    pub fn from_document(root: &ConfigValue) -> Self {
        let mut settings = Self::default();
        if let Some(enabled) =
            reader::read(root, &format!("{RESERVED_SECTION}:OptionPatternGenerationEnabled"))
                .and_then(ConfigValue::as_bool)
        {
            settings.option_pattern_generation_enabled = enabled;
        }
        if let Some(source_file) =
            reader::read(root, &format!("{RESERVED_SECTION}:SourceFile"))
                .and_then(ConfigValue::as_str)
        {
            settings.source_file = source_file.to_string();
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn defaults_when_section_is_absent() {
        let root = parser::parse(r#"{"App":{"Name":"x"}}"#).unwrap();
        let settings = GeneratorSettings::from_document(&root);
        assert_eq!(settings, GeneratorSettings::default());
        assert!(settings.option_pattern_generation_enabled);
        assert_eq!(settings.source_file, "appsettings.json");
    }

    #[test]
    fn reserved_section_overrides_defaults() {
        let root = parser::parse(
            r#"{"Setgen":{"OptionPatternGenerationEnabled":false,"SourceFile":"conf.json"}}"#,
        )
        .unwrap();
        let settings = GeneratorSettings::from_document(&root);
        assert!(!settings.option_pattern_generation_enabled);
        assert_eq!(settings.source_file, "conf.json");
    }

    #[test]
    fn wrongly_typed_entries_keep_defaults() {
        let root = parser::parse(
            r#"{"Setgen":{"OptionPatternGenerationEnabled":"no","SourceFile":7}}"#,
        )
        .unwrap();
        let settings = GeneratorSettings::from_document(&root);
        assert_eq!(settings, GeneratorSettings::default());
    }
}
