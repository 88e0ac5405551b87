//! Turn a JSON configuration document into a normalized, strongly-typed
//! schema model for generating settings classes.
//!
//! Pipeline: raw text → [`parser`] → [`ConfigValue`] tree → [`model`] →
//! ordered [`SchemaClass`] list. Rendering that list into target-language
//! source is a separate, replaceable step; this crate guarantees a renderer
//! never has to re-parse JSON or re-derive a name.
//!
//! The whole pipeline is a pure function of the input text: no I/O, no global
//! state, safe to run concurrently over different documents.

pub mod cli;
pub mod ident;
pub mod model;
pub mod parser;
pub mod reader;
pub mod settings;
pub mod value;

pub use model::{ModelBuilder, SchemaClass, SchemaProperty, TypeRef};
pub use parser::{FormatError, parse, parse_array};
pub use settings::GeneratorSettings;
pub use value::ConfigValue;

/// Parse `text` and build its class sequence in one shot.
///
/// Fails only on a malformed document; model building itself never fails.
/// There is no partial output: callers get the full sequence or the error.
pub fn build_model(text: &str) -> Result<Vec<SchemaClass>, FormatError> {
    let root = parser::parse(text)?;
    Ok(ModelBuilder::build(&root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_round_trip() {
        let classes = build_model(
            r#"{"Logging":{"Level":"Info"},"Ports":[80,443]}"#,
        )
        .unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, model::ROOT_CLASS_NAME);
        assert_eq!(classes[1].section_path, "Logging");
    }

    #[test]
    fn parse_failure_yields_no_partial_model() {
        let err = build_model(r#"{"Logging":{"Level":"Info"},}"#).unwrap_err();
        assert!(matches!(err, FormatError::TrailingCommaInObject { .. }));
    }
}
