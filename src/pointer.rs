//! Reference paths into the lookup table.
//!
//! `#/definitions/Pet` addresses `{"definitions": {"Pet": ...}}`. The root
//! marker is optional, segments are separated by `/`, and JSON pointer
//! escapes (`~1` for `/`, `~0` for `~`) are decoded. Array segments are
//! addressed by index.

use serde_json::Value;
use std::fmt;

const ROOT_MARKER: &str = "#/";

/// Suffix tried before the bare path, for tables that wrap each schema
/// (e.g. `{"responses": {"Pet": {"schema": {...}}}}`).
const SCHEMA_SUFFIX: &str = "schema";

/// A parsed `$ref` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPath {
    segments: Vec<String>,
}

impl RefPath {
    /// Parse a reference string. Never fails; an unknown path simply finds
    /// nothing at lookup time.
    pub fn parse(reference: &str) -> Self {
        let path = reference.replacen(ROOT_MARKER, "", 1);
        let segments = path.split('/').map(unescape).collect();
        Self { segments }
    }

    /// Path segments, decoded.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Find the referenced schema in `table`, preferring `<path>/schema` over
    /// `<path>`. `null` counts as not found.
    pub fn lookup<'v>(&self, table: &'v Value) -> Option<&'v Value> {
        let target = get(table, &self.segments)?;
        Some(get(target, &[SCHEMA_SUFFIX]).unwrap_or(target))
    }
}

impl fmt::Display for RefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ROOT_MARKER, self.segments.join("/"))
    }
}

fn get<'v, S: AsRef<str>>(mut current: &'v Value, segments: &[S]) -> Option<&'v Value> {
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(object) => object.get(segment)?,
            Value::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// A lookup table with nothing in it disables resolution entirely.
///
/// Only non-empty objects, arrays and strings count as content.
pub fn is_empty_table(table: &Value) -> bool {
    match table {
        Value::Object(object) => object.is_empty(),
        Value::Array(array) => array.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_strips_root_marker() {
        let path = RefPath::parse("#/definitions/Pet");
        assert_eq!(path.segments(), ["definitions", "Pet"]);
        assert_eq!(path.to_string(), "#/definitions/Pet");
    }

    #[test]
    fn test_parse_without_root_marker() {
        let path = RefPath::parse("definitions/Pet");
        assert_eq!(path.segments(), ["definitions", "Pet"]);
    }

    #[test]
    fn test_parse_unescapes_pointer_tokens() {
        let path = RefPath::parse("#/paths/~1pets~1{id}/a~0b");
        assert_eq!(path.segments(), ["paths", "/pets/{id}", "a~b"]);
    }

    #[test]
    fn test_lookup_bare_path() {
        let table = json!({ "definitions": { "Pet": { "type": "object" } } });
        let found = RefPath::parse("#/definitions/Pet").lookup(&table);
        assert_eq!(found, Some(&json!({ "type": "object" })));
    }

    #[test]
    fn test_lookup_prefers_schema_suffix() {
        let table = json!({
            "responses": {
                "Pet": { "description": "A pet", "schema": { "type": "string" } }
            }
        });
        let found = RefPath::parse("#/responses/Pet").lookup(&table);
        assert_eq!(found, Some(&json!({ "type": "string" })));
    }

    #[test]
    fn test_lookup_array_index() {
        let table = json!({ "schemas": [{ "type": "string" }, { "type": "number" }] });
        let found = RefPath::parse("#/schemas/1").lookup(&table);
        assert_eq!(found, Some(&json!({ "type": "number" })));
    }

    #[test]
    fn test_lookup_missing() {
        let table = json!({ "definitions": {} });
        assert_eq!(RefPath::parse("#/definitions/Missing").lookup(&table), None);
        assert_eq!(RefPath::parse("#/definitions/x/y").lookup(&table), None);
    }

    #[test]
    fn test_lookup_null_is_missing() {
        let table = json!({ "definitions": { "Nothing": null } });
        assert_eq!(RefPath::parse("#/definitions/Nothing").lookup(&table), None);
    }

    #[test]
    fn test_lookup_falsy_values_are_found() {
        let table = json!({ "definitions": { "Never": false, "Zero": 0, "Blank": "" } });
        for (name, expected) in [("Never", json!(false)), ("Zero", json!(0)), ("Blank", json!(""))] {
            let reference = format!("#/definitions/{}", name);
            assert_eq!(RefPath::parse(&reference).lookup(&table), Some(&expected));
        }
    }

    #[test]
    fn test_empty_tables() {
        assert!(is_empty_table(&json!({})));
        assert!(is_empty_table(&json!([])));
        assert!(is_empty_table(&Value::Null));
        assert!(is_empty_table(&json!(true)));
        assert!(!is_empty_table(&json!({ "definitions": {} })));
    }
}
