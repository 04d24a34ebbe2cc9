//! # Document Codec
//!
//! Converts between the loosely-typed wire document returned by the page
//! metadata RPC and the typed [`ValueNode`] tree.
//!
//! ## Decode rules
//!
//! | wire value                | node                               |
//! |---------------------------|------------------------------------|
//! | string                    | `Leaf` (string)                    |
//! | array of strings          | `List`                             |
//! | object                    | `Section` (recursive)              |
//! | number / bool / null      | `Leaf` tagged with its scalar kind |
//! | any other array           | `Leaf` (opaque JSON text)          |
//!
//! Decoding never fails. The editor has to be able to show whatever the
//! backend returned, so odd input degrades to the closest shape instead.
//!
//! Encoding is the inverse. Tagged leaves re-emit their original type as
//! long as the (possibly edited) text still parses as that type.

use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::document::Document;
use crate::value::{Fields, ScalarKind, ValueNode};

/// Decode a wire document. `None` stands for an absent metadata block.
pub fn decode(wire: Option<&Value>) -> Document {
    match wire {
        None | Some(Value::Null) => Document::new(),
        Some(Value::Object(map)) => Document::from_fields(decode_object(map)),
        Some(other) => {
            warn!(
                wire_type = wire_type_name(other),
                "Front matter root is not an object - starting from an empty document"
            );
            Document::new()
        }
    }
}

/// Decode front matter from JSON text
pub fn decode_str(source: &str) -> Result<Document, serde_json::Error> {
    let value: Value = serde_json::from_str(source)?;
    Ok(decode(Some(&value)))
}

/// Encode a document back to its wire form
pub fn encode(doc: &Document) -> Value {
    Value::Object(encode_fields(doc.fields()))
}

/// Decode a single wire value
pub fn decode_value(value: &Value) -> ValueNode {
    match value {
        Value::String(s) => ValueNode::string(s.clone()),
        Value::Array(elements) => match string_items(elements) {
            Some(items) => ValueNode::List { items },
            None => {
                warn!(
                    len = elements.len(),
                    "Array contains non-string elements - keeping it as opaque text"
                );
                ValueNode::scalar(value.to_string(), ScalarKind::Opaque)
            }
        },
        Value::Object(map) => ValueNode::Section {
            fields: decode_object(map),
        },
        Value::Number(n) => ValueNode::scalar(n.to_string(), ScalarKind::Number),
        Value::Bool(b) => ValueNode::scalar(b.to_string(), ScalarKind::Bool),
        Value::Null => ValueNode::scalar(String::new(), ScalarKind::Null),
    }
}

/// Encode a single node
pub fn encode_value(node: &ValueNode) -> Value {
    match node {
        ValueNode::Leaf { value, kind } => encode_scalar(value, *kind),
        ValueNode::List { items } => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        ValueNode::Section { fields } => Value::Object(encode_fields(fields)),
    }
}

fn decode_object(map: &Map<String, Value>) -> Fields {
    map.iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, node)| (key.clone(), encode_value(node)))
        .collect()
}

fn string_items(elements: &[Value]) -> Option<Vec<String>> {
    elements
        .iter()
        .map(|element| element.as_str().map(str::to_string))
        .collect()
}

/// Typed value for a tagged leaf. Text with surrounding whitespace stays a
/// string, and an opaque leaf only re-emits an array.
fn encode_scalar(value: &str, kind: ScalarKind) -> Value {
    if value.trim() != value {
        return Value::String(value.to_string());
    }

    let typed = match kind {
        ScalarKind::String => None,
        ScalarKind::Number => serde_json::from_str::<Number>(value).ok().map(Value::Number),
        ScalarKind::Bool => match value {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ScalarKind::Null => value.is_empty().then_some(Value::Null),
        ScalarKind::Opaque => serde_json::from_str::<Value>(value)
            .ok()
            .filter(Value::is_array),
    };

    typed.unwrap_or_else(|| Value::String(value.to_string()))
}

fn wire_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
