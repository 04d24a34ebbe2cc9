//! # Front-Matter Values
//!
//! Tagged-union representation of a front-matter value.
//!
//! ```text
//! ValueNode
//!   ├── Leaf    { value, kind }   scalar field (string/number/bool/null/opaque)
//!   ├── List    { items }         ordered array of string leaves
//!   └── Section { fields }        ordered key → ValueNode mapping
//! ```
//!
//! Equality is structural. Two sections with the same entries in a
//! different order are *not* equal, since order is part of the document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered entries of a section
pub type Fields = IndexMap<String, ValueNode>;

/// Original wire type of a leaf, kept so encode can re-emit it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    #[default]
    String,
    Number,
    Bool,
    Null,
    /// Wire value the editor cannot model (e.g. a mixed array), held as JSON text
    Opaque,
}

/// A single front-matter value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueNode {
    Leaf {
        value: String,
        #[serde(default)]
        kind: ScalarKind,
    },
    List {
        items: Vec<String>,
    },
    Section {
        fields: Fields,
    },
}

/// Entry-by-entry comparison. `IndexMap` equality ignores order.
pub(crate) fn fields_eq(a: &Fields, b: &Fields) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

impl PartialEq for ValueNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ValueNode::Leaf { value, kind },
                ValueNode::Leaf {
                    value: other_value,
                    kind: other_kind,
                },
            ) => value == other_value && kind == other_kind,
            (ValueNode::List { items }, ValueNode::List { items: other_items }) => {
                items == other_items
            }
            (ValueNode::Section { fields }, ValueNode::Section { fields: other_fields }) => {
                fields_eq(fields, other_fields)
            }
            _ => false,
        }
    }
}

impl ValueNode {
    /// String leaf
    pub fn string(value: impl Into<String>) -> Self {
        ValueNode::Leaf {
            value: value.into(),
            kind: ScalarKind::String,
        }
    }

    /// Leaf with an explicit wire type
    pub fn scalar(value: impl Into<String>, kind: ScalarKind) -> Self {
        ValueNode::Leaf {
            value: value.into(),
            kind,
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueNode::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn section(fields: Fields) -> Self {
        ValueNode::Section { fields }
    }

    pub fn empty_section() -> Self {
        ValueNode::Section {
            fields: Fields::new(),
        }
    }

    /// Short name of the variant, used in logs and editor rows
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueNode::Leaf { .. } => "leaf",
            ValueNode::List { .. } => "list",
            ValueNode::Section { .. } => "section",
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            ValueNode::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ValueNode::List { items } => Some(items),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Fields> {
        match self {
            ValueNode::Section { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ValueNode::Leaf { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueNode::List { .. })
    }

    pub fn is_section(&self) -> bool {
        matches!(self, ValueNode::Section { .. })
    }
}
