//! Structured documents and the YAML codec.
//!
//! A [`Document`] is the in-memory form exchanged with the codec: a mapping
//! from string keys to scalars, sequences or nested mappings. Keys are kept
//! sorted, which is also the order the encoder emits them in.

use crate::error::{HostError, HostResult};
use std::collections::BTreeMap;

/// Top-level structured document.
pub type Document = BTreeMap<String, Value>;

/// A value inside a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Encode a document as YAML text.
pub fn encode(doc: &Document) -> HostResult<String> {
    let yaml = serde_yaml::Value::Mapping(mapping_to_yaml(doc));
    serde_yaml::to_string(&yaml).map_err(|e| HostError::Encoding(e.to_string()))
}

/// Decode YAML text into a document.
///
/// Empty input and an explicit `null` decode to an empty document; any other
/// non-mapping top level is rejected.
pub fn decode(text: &str) -> HostResult<Document> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    match untag(yaml) {
        serde_yaml::Value::Null => Ok(Document::new()),
        serde_yaml::Value::Mapping(mapping) => mapping_from_yaml(mapping),
        other => Err(HostError::Decode {
            message: format!("expected a mapping at the top level, found {}", kind_of(&other)),
            line: None,
            column: None,
        }),
    }
}

fn mapping_to_yaml(map: &BTreeMap<String, Value>) -> serde_yaml::Mapping {
    let mut mapping = serde_yaml::Mapping::new();
    for (key, value) in map {
        mapping.insert(serde_yaml::Value::String(key.clone()), value_to_yaml(value));
    }
    mapping
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(i) => serde_yaml::Value::Number((*i).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect())
        }
        Value::Mapping(map) => serde_yaml::Value::Mapping(mapping_to_yaml(map)),
    }
}

fn mapping_from_yaml(mapping: serde_yaml::Mapping) -> HostResult<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    for (key, value) in mapping {
        map.insert(key_from_yaml(key)?, value_from_yaml(value)?);
    }
    Ok(map)
}

fn key_from_yaml(key: serde_yaml::Value) -> HostResult<String> {
    match untag(key) {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(HostError::Decode {
            message: format!("unsupported mapping key: {}", kind_of(&other)),
            line: None,
            column: None,
        }),
    }
}

fn value_from_yaml(value: serde_yaml::Value) -> HostResult<Value> {
    Ok(match untag(value) {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(value_from_yaml)
                .collect::<HostResult<_>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => Value::Mapping(mapping_from_yaml(mapping)?),
        serde_yaml::Value::Tagged(_) => unreachable!("tags are stripped by untag"),
    })
}

/// Strip YAML tags, keeping the tagged value.
fn untag(value: serde_yaml::Value) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn kind_of(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_encode_simple() {
        let mut doc = Document::new();
        doc.insert("version".into(), Value::Int(3));
        assert_eq!(encode(&doc).unwrap(), "version: 3\n");
    }

    #[test]
    fn test_decode_simple() {
        let doc = decode("version: 3").unwrap();
        assert_eq!(doc.get("version"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_keys_are_sorted_on_encode() {
        let mut doc = Document::new();
        doc.insert("b".into(), Value::Int(2));
        doc.insert("a".into(), Value::Int(1));
        assert_eq!(encode(&doc).unwrap(), "a: 1\nb: 2\n");
    }

    #[test]
    fn test_nested_round_trip() {
        let mut inner = BTreeMap::new();
        inner.insert("name".to_string(), Value::from("nuv"));
        inner.insert("enabled".to_string(), Value::Bool(true));

        let mut doc = Document::new();
        doc.insert("package".into(), Value::Mapping(inner));
        doc.insert(
            "items".into(),
            Value::Sequence(vec![Value::Int(1), Value::Float(2.5), Value::Null]),
        );

        let text = encode(&doc).unwrap();
        assert_eq!(decode(&text).unwrap(), doc);
    }

    #[test]
    fn test_scalar_type_inference() {
        let doc = decode("a: 1\nb: '1'\nc: 1.5\nd: true\ne: ~\n").unwrap();
        assert_eq!(doc["a"], Value::Int(1));
        assert_eq!(doc["b"], Value::String("1".into()));
        assert_eq!(doc["c"], Value::Float(1.5));
        assert_eq!(doc["d"], Value::Bool(true));
        assert_eq!(doc["e"], Value::Null);
    }

    #[test]
    fn test_empty_input_is_empty_document() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("null").unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_top_level() {
        let err = decode("- a\n- b\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_malformed_reports_location() {
        let err = decode("a: [1, 2\nb: 3\n").unwrap_err();
        match err {
            HostError::Decode { line, .. } => assert!(line.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let doc = decode("1: one\ntrue: yes\n").unwrap();
        assert_eq!(doc["1"], Value::from("one"));
        assert_eq!(doc["true"], Value::from("yes"));
    }
}
