//! Schema model and the builder that infers it from a parsed value tree.
//!
//! Strongly-typed output for the rendering stage. No `ConfigValue` leaks out
//! of here: a completed `SchemaClass` list owns all of its data and the value
//! tree can be dropped. Field and class order is stable for deterministic,
//! diff-friendly generated output.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::Serialize;

use crate::ident;
use crate::settings::RESERVED_SECTION;
use crate::value::ConfigValue;

/// Class name of the synthetic root.
pub const ROOT_CLASS_NAME: &str = "RootOptions";

/// Suffix distinguishing generated class names from plain property names.
const CLASS_NAME_SUFFIX: &str = "Options";

// ------------------------------- Model ------------------------------------ //

/// A property's inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    String,
    Int32,
    Int64,
    Double,
    Boolean,
    /// Catch-all for shapes the inference rules do not classify.
    Untyped,
    /// Reference to another class in the same model, by name.
    Class(String),
    List(Box<TypeRef>),
}

/// One field of a generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaProperty {
    /// The literal JSON key, unmodified. A renderer compares this against
    /// `normalized_name` to decide whether a key-mapping annotation is needed.
    pub original_key: String,
    pub normalized_name: String,
    pub type_ref: TypeRef,
}

/// One generated class: the shape of the root object, a nested object, or the
/// merged shape of items inside an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaClass {
    pub name: String,
    /// Colon-joined chain of original JSON keys from the document root to
    /// this class's data; empty for the root class.
    pub section_path: String,
    pub properties: Vec<SchemaProperty>,
    pub is_collection_element: bool,
}

// ------------------------------ Builder ------------------------------------ //

/// A scheduled class whose properties are not resolved yet.
struct PendingClass {
    name: String,
    section_path: String,
    is_collection_element: bool,
    source: IndexMap<String, ConfigValue>,
}

/// Breadth-first model builder over a parsed object tree.
///
/// An explicit work queue instead of call recursion keeps pathologically
/// nested documents off the stack. Classes are emitted in the order they are
/// discovered: root first, then first-level nested classes in key order, and
/// so on.
///
/// Class names are not deduplicated: two differently-pathed keys that
/// normalize to the same name yield two classes sharing that name, in a
/// deterministic order a renderer can resolve with its own policy.
pub struct ModelBuilder {
    queue: VecDeque<PendingClass>,
    completed: Vec<SchemaClass>,
}

impl ModelBuilder {
    /// Infer the ordered class sequence for a document root.
    ///
    /// Never fails: anything the inference rules cannot classify degrades to
    /// `TypeRef::Untyped`, and a non-object root yields a root class with no
    /// properties. Only the upstream parser rejects documents.
    pub fn build(root: &ConfigValue) -> Vec<SchemaClass> {
        let source = root.as_object().cloned().unwrap_or_default();
        let mut builder = Self { queue: VecDeque::new(), completed: Vec::new() };
        builder.queue.push_back(PendingClass {
            name: ROOT_CLASS_NAME.to_string(),
            section_path: String::new(),
            is_collection_element: false,
            source,
        });

        while let Some(pending) = builder.queue.pop_front() {
            let mut properties = Vec::with_capacity(pending.source.len());
            for (key, value) in &pending.source {
                // The generator's own settings section never becomes a property.
                if key.eq_ignore_ascii_case(RESERVED_SECTION) {
                    continue;
                }
                properties.push(SchemaProperty {
                    original_key: key.clone(),
                    normalized_name: ident::normalize(key),
                    type_ref: builder.infer_type(&pending.section_path, key, value),
                });
            }
            builder.completed.push(SchemaClass {
                name: pending.name,
                section_path: pending.section_path,
                properties,
                is_collection_element: pending.is_collection_element,
            });
        }

        builder.completed
    }

    fn infer_type(&mut self, parent_path: &str, key: &str, value: &ConfigValue) -> TypeRef {
        match value {
            ConfigValue::String(_) => TypeRef::String,
            ConfigValue::Integer(_) => TypeRef::Int32,
            ConfigValue::LongInteger(_) => TypeRef::Int64,
            ConfigValue::Float(_) => TypeRef::Double,
            ConfigValue::Boolean(_) => TypeRef::Boolean,
            ConfigValue::Null => TypeRef::Untyped,
            ConfigValue::Object(obj) => {
                let name = self.schedule_class(parent_path, key, key, obj.clone(), false);
                TypeRef::Class(name)
            }
            ConfigValue::Array(items) => self.infer_list_type(parent_path, key, items),
        }
    }

    fn infer_list_type(
        &mut self,
        parent_path: &str,
        key: &str,
        items: &[ConfigValue],
    ) -> TypeRef {
        if items.is_empty() {
            return TypeRef::List(Box::new(TypeRef::Untyped));
        }

        // Any object element means the array holds records: merge every object
        // element into one synthetic shape (union of keys, later values win)
        // and type the field as a list of that class.
        if items.iter().any(ConfigValue::is_object) {
            let merged = merge_object_elements(items);
            let name_key = format!("{key}Item");
            let name = self.schedule_class(parent_path, key, &name_key, merged, true);
            return TypeRef::List(Box::new(TypeRef::Class(name)));
        }

        // Primitive arrays type from the first element only; later elements
        // of a different type are ignored.
        let element = match &items[0] {
            ConfigValue::String(_) => TypeRef::String,
            ConfigValue::Integer(_) => TypeRef::Int32,
            ConfigValue::LongInteger(_) => TypeRef::Int64,
            ConfigValue::Float(_) => TypeRef::Double,
            ConfigValue::Boolean(_) => TypeRef::Boolean,
            _ => TypeRef::Untyped,
        };
        TypeRef::List(Box::new(element))
    }

    /// Queue a nested class and return its name for the referencing field.
    fn schedule_class(
        &mut self,
        parent_path: &str,
        key: &str,
        name_key: &str,
        source: IndexMap<String, ConfigValue>,
        is_collection_element: bool,
    ) -> String {
        let section_path = if parent_path.is_empty() {
            key.to_string()
        } else {
            format!("{parent_path}:{key}")
        };
        let name = format!("{}{CLASS_NAME_SUFFIX}", ident::normalize(name_key));
        self.queue.push_back(PendingClass {
            name: name.clone(),
            section_path,
            is_collection_element,
            source,
        });
        name
    }
}

/// Union-merge the object elements of an array, consistent with duplicate-key
/// semantics during parsing: later values override, first-seen key positions
/// are kept. Non-object elements contribute nothing.
fn merge_object_elements(items: &[ConfigValue]) -> IndexMap<String, ConfigValue> {
    let mut merged = IndexMap::new();
    for item in items {
        if let ConfigValue::Object(obj) = item {
            for (key, value) in obj {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

// -------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn build_from(text: &str) -> Vec<SchemaClass> {
        ModelBuilder::build(&parser::parse(text).unwrap())
    }

    fn property<'a>(class: &'a SchemaClass, key: &str) -> &'a SchemaProperty {
        class
            .properties
            .iter()
            .find(|p| p.original_key == key)
            .unwrap_or_else(|| panic!("no property for key {key:?}"))
    }

    #[test]
    fn primitive_properties_map_to_primitive_types() {
        let classes = build_from(
            r#"{"Name":"x","Port":8080,"Big":2147483648,"Ratio":0.5,"On":true,"Gone":null}"#,
        );
        assert_eq!(classes.len(), 1);
        let root = &classes[0];
        assert_eq!(root.name, ROOT_CLASS_NAME);
        assert_eq!(root.section_path, "");
        assert!(!root.is_collection_element);
        assert_eq!(property(root, "Name").type_ref, TypeRef::String);
        assert_eq!(property(root, "Port").type_ref, TypeRef::Int32);
        assert_eq!(property(root, "Big").type_ref, TypeRef::Int64);
        assert_eq!(property(root, "Ratio").type_ref, TypeRef::Double);
        assert_eq!(property(root, "On").type_ref, TypeRef::Boolean);
        assert_eq!(property(root, "Gone").type_ref, TypeRef::Untyped);
    }

    #[test]
    fn nested_object_produces_exactly_two_classes() {
        let classes = build_from(r#"{"Logging":{"Level":"Info"}}"#);
        assert_eq!(classes.len(), 2);

        let root = &classes[0];
        assert_eq!(
            property(root, "Logging").type_ref,
            TypeRef::Class("LoggingOptions".to_string())
        );

        let nested = &classes[1];
        assert_eq!(nested.name, "LoggingOptions");
        assert_eq!(nested.section_path, "Logging");
        assert!(!nested.is_collection_element);
        assert_eq!(nested.properties.len(), 1);
        assert_eq!(property(nested, "Level").type_ref, TypeRef::String);
    }

    #[test]
    fn section_paths_join_original_keys() {
        let classes = build_from(r#"{"my-app":{"sub section":{"Value":1}}}"#);
        assert_eq!(classes.len(), 3);
        // Paths keep the raw keys; only class and property names normalize.
        assert_eq!(classes[1].section_path, "my-app");
        assert_eq!(classes[1].name, "MyappOptions");
        assert_eq!(classes[2].section_path, "my-app:sub section");
        assert_eq!(classes[2].name, "SubsectionOptions");
    }

    #[test]
    fn array_of_objects_merges_by_key_union() {
        let classes = build_from(r#"{"Endpoints":[{"Name":"A"},{"Url":"http://x"}]}"#);
        assert_eq!(classes.len(), 2);

        let root = &classes[0];
        assert_eq!(
            property(root, "Endpoints").type_ref,
            TypeRef::List(Box::new(TypeRef::Class("EndpointsItemOptions".to_string())))
        );

        let item = &classes[1];
        assert_eq!(item.name, "EndpointsItemOptions");
        assert_eq!(item.section_path, "Endpoints");
        assert!(item.is_collection_element);
        assert_eq!(property(item, "Name").type_ref, TypeRef::String);
        assert_eq!(property(item, "Url").type_ref, TypeRef::String);
    }

    #[test]
    fn merged_repeated_keys_take_the_later_value() {
        let classes = build_from(r#"{"Xs":[{"P":1,"Q":true},{"P":"s"}]}"#);
        let item = &classes[1];
        // Later element's value for "P" wins; the key keeps first position.
        assert_eq!(item.properties[0].original_key, "P");
        assert_eq!(item.properties[0].type_ref, TypeRef::String);
        assert_eq!(property(item, "Q").type_ref, TypeRef::Boolean);
    }

    #[test]
    fn mixed_arrays_merge_only_object_elements() {
        let classes = build_from(r#"{"Xs":[1,{"A":true},"s",{"B":2}]}"#);
        assert_eq!(classes.len(), 2);
        let item = &classes[1];
        assert!(item.is_collection_element);
        assert_eq!(item.properties.len(), 2);
        assert_eq!(property(item, "A").type_ref, TypeRef::Boolean);
        assert_eq!(property(item, "B").type_ref, TypeRef::Int32);
    }

    #[test]
    fn primitive_arrays_type_from_first_element_only() {
        let classes = build_from(r#"{"Xs":[1,"a",true]}"#);
        assert_eq!(classes.len(), 1);
        assert_eq!(
            property(&classes[0], "Xs").type_ref,
            TypeRef::List(Box::new(TypeRef::Int32))
        );
    }

    #[test]
    fn empty_and_unclassifiable_arrays_fall_back_to_untyped() {
        let classes = build_from(r#"{"Empty":[],"Jagged":[[1,2],[3]]}"#);
        let root = &classes[0];
        assert_eq!(
            property(root, "Empty").type_ref,
            TypeRef::List(Box::new(TypeRef::Untyped))
        );
        // Array-of-arrays has no special rule; it degrades rather than fails.
        assert_eq!(
            property(root, "Jagged").type_ref,
            TypeRef::List(Box::new(TypeRef::Untyped))
        );
    }

    #[test]
    fn classes_emit_in_breadth_first_order() {
        let classes = build_from(
            r#"{
                "A": {"Deep": {"X": 1}},
                "B": {"Y": 2},
                "C": [{"Z": 3}]
            }"#,
        );
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        // Root, then first-level classes in key order, then second-level.
        assert_eq!(
            names,
            vec![
                ROOT_CLASS_NAME,
                "AOptions",
                "BOptions",
                "CItemOptions",
                "DeepOptions"
            ]
        );
        assert_eq!(classes[4].section_path, "A:Deep");
    }

    #[test]
    fn reserved_settings_section_is_skipped() {
        let classes = build_from(
            r#"{"Setgen":{"SourceFile":"conf.json"},"App":{"Name":"x"}}"#,
        );
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![ROOT_CLASS_NAME, "AppOptions"]);
        assert_eq!(classes[0].properties.len(), 1);
        // Case-insensitive match, anywhere in the tree.
        let classes = build_from(r#"{"App":{"SETGEN":1,"Name":"x"}}"#);
        assert_eq!(classes[1].properties.len(), 1);
    }

    #[test]
    fn colliding_class_names_are_not_deduplicated() {
        let classes = build_from(r#"{"Server":{"A":1},"Outer":{"Server":{"B":2}}}"#);
        let server_classes: Vec<&SchemaClass> = classes
            .iter()
            .filter(|c| c.name == "ServerOptions")
            .collect();
        assert_eq!(server_classes.len(), 2);
        assert_eq!(server_classes[0].section_path, "Server");
        assert_eq!(server_classes[1].section_path, "Outer:Server");
    }

    #[test]
    fn normalized_names_sit_next_to_original_keys() {
        let classes = build_from(r#"{"retry-count":3,"1st":true,"":null}"#);
        let root = &classes[0];
        assert_eq!(property(root, "retry-count").normalized_name, "Retrycount");
        assert_eq!(property(root, "1st").normalized_name, "_1st");
        assert_eq!(property(root, "").normalized_name, "UnnamedProperty");
    }

    #[test]
    fn build_is_deterministic() {
        let text = r#"{
            "Logging": {"Level": "Info", "Sinks": [{"Kind": "console"}, {"Path": "/x"}]},
            "Limits": {"Max": 10, "Weights": [0.5, 1]}
        }"#;
        let first = build_from(text);
        let second = build_from(text);
        assert_eq!(first, second);
    }

    #[test]
    fn non_object_root_degrades_to_an_empty_root_class() {
        let classes = ModelBuilder::build(&ConfigValue::Null);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, ROOT_CLASS_NAME);
        assert!(classes[0].properties.is_empty());
    }
}
