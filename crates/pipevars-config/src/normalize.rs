//! Variable extraction and key flattening.
//!
//! A loaded document is turned into a [`FlatMapping`] in two steps:
//!
//! 1. If the document is a pipeline definition with a top-level `variables`
//!    entry, only that entry is kept. Both the mapping form and the list form
//!    are accepted:
//!
//!    ```yaml
//!    variables:
//!      image: app
//!    # or
//!    variables:
//!      - name: image
//!        value: app
//!    ```
//!
//! 2. Nested mappings are flattened, joining keys with a separator
//!    (`a.b.c` becomes `a__b__c` by default).

use crate::loader::RawDocument;
use indexmap::IndexMap;
use pipevars_core::{DEFAULT_SEPARATOR, FlatMapping, Value};

const VARIABLES_KEY: &str = "variables";

/// Select the variable set of a document.
///
/// The result is always a mapping. Documents whose root is not a mapping
/// yield an empty one.
pub fn extract_variables(document: RawDocument) -> Value {
    let mut root = match document {
        RawDocument::Flat(vars) => {
            return Value::Mapping(
                vars.into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            );
        }
        RawDocument::Tree(Value::Mapping(root)) => root,
        RawDocument::Tree(_) => return Value::empty_mapping(),
    };

    match take_variables(&mut root) {
        Some(Value::Mapping(vars)) => Value::Mapping(vars),
        Some(Value::Sequence(items)) => Value::Mapping(named_variables(items)),
        _ => Value::Mapping(root),
    }
}

/// Remove the `variables` entry if it has a usable shape.
fn take_variables(root: &mut IndexMap<String, Value>) -> Option<Value> {
    match root.get(VARIABLES_KEY)? {
        Value::Mapping(_) | Value::Sequence(_) => root.shift_remove(VARIABLES_KEY),
        _ => None,
    }
}

/// Collect `{name, value}` records. Records missing either field are skipped.
fn named_variables(items: Vec<Value>) -> IndexMap<String, Value> {
    let mut vars = IndexMap::new();
    for item in items {
        let Value::Mapping(mut record) = item else {
            continue;
        };
        let (Some(name), Some(value)) = (record.shift_remove("name"), record.shift_remove("value"))
        else {
            continue;
        };
        vars.insert(name.to_env_string(), value);
    }
    vars
}

/// Flatten with the default `__` separator.
pub fn flatten(value: Value) -> FlatMapping {
    flatten_with(value, DEFAULT_SEPARATOR)
}

/// Flatten nested mappings into one level, depth-first and in source order.
///
/// Non-mapping values, including sequences, are leaves. Empty nested
/// mappings produce no entry. A non-mapping root produces an empty result.
pub fn flatten_with(value: Value, separator: &str) -> FlatMapping {
    let mut out = FlatMapping::new();
    if let Value::Mapping(map) = value {
        flatten_into(map, None, separator, &mut out);
    }
    out
}

fn flatten_into(
    map: IndexMap<String, Value>,
    parent: Option<&str>,
    separator: &str,
    out: &mut FlatMapping,
) {
    for (key, value) in map {
        let full_key = match parent {
            Some(parent) => format!("{parent}{separator}{key}"),
            None => key,
        };
        match value {
            Value::Mapping(children) => {
                flatten_into(children, Some(full_key.as_str()), separator, out);
            }
            leaf => {
                out.insert(full_key, leaf);
            }
        }
    }
}

/// Extract and flatten a loaded document.
pub fn normalize(document: RawDocument, separator: &str) -> FlatMapping {
    flatten_with(extract_variables(document), separator)
}
