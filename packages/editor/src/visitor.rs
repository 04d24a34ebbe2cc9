//! # Tree Traversal
//!
//! Read-only visitor over a front-matter document, plus the flattened row
//! view the editing UI renders as its tree.

use serde::Serialize;

use crate::document::Document;
use crate::path::KeyPath;
use crate::value::{Fields, ScalarKind, ValueNode};

/// Visitor pattern for traversing a document immutably
///
/// Default implementations walk the whole tree in document order.
/// Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_node(&mut self, path: &KeyPath, node: &ValueNode) {
        walk_node(self, path, node);
    }

    fn visit_leaf(&mut self, _path: &KeyPath, _value: &str, _kind: ScalarKind) {
        // Leaf node, no children to walk
    }

    fn visit_list(&mut self, _path: &KeyPath, _items: &[String]) {
        // Items are plain strings, no children to walk
    }

    fn visit_section(&mut self, path: &KeyPath, fields: &Fields) {
        walk_section(self, path, fields);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    walk_section(visitor, &KeyPath::root(), doc.fields());
}

pub fn walk_node<V: Visitor>(visitor: &mut V, path: &KeyPath, node: &ValueNode) {
    match node {
        ValueNode::Leaf { value, kind } => visitor.visit_leaf(path, value, *kind),
        ValueNode::List { items } => visitor.visit_list(path, items),
        ValueNode::Section { fields } => visitor.visit_section(path, fields),
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, path: &KeyPath, fields: &Fields) {
    for (key, node) in fields {
        visitor.visit_node(&path.child(key.as_str()), node);
    }
}

/// One rendered line of the editable tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRow {
    pub path: KeyPath,
    pub depth: usize,
    pub key: String,
    pub content: RowContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowContent {
    Leaf { value: String, kind: ScalarKind },
    List { items: Vec<String> },
    /// Section header; its fields follow as deeper rows
    Section { len: usize },
}

/// Flatten a document into rows, depth first in document order
pub fn editor_rows(doc: &Document) -> Vec<EditorRow> {
    let mut collector = RowCollector { rows: Vec::new() };
    collector.visit_document(doc);
    collector.rows
}

struct RowCollector {
    rows: Vec<EditorRow>,
}

impl RowCollector {
    fn push(&mut self, path: &KeyPath, content: RowContent) {
        self.rows.push(EditorRow {
            path: path.clone(),
            depth: path.depth().saturating_sub(1),
            key: path.last().unwrap_or_default().to_string(),
            content,
        });
    }
}

impl Visitor for RowCollector {
    fn visit_leaf(&mut self, path: &KeyPath, value: &str, kind: ScalarKind) {
        self.push(
            path,
            RowContent::Leaf {
                value: value.to_string(),
                kind,
            },
        );
    }

    fn visit_list(&mut self, path: &KeyPath, items: &[String]) {
        self.push(
            path,
            RowContent::List {
                items: items.to_vec(),
            },
        );
    }

    fn visit_section(&mut self, path: &KeyPath, fields: &Fields) {
        self.push(path, RowContent::Section { len: fields.len() });
        walk_section(self, path, fields);
    }
}

/// Shape summary of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub leaves: usize,
    pub lists: usize,
    pub list_items: usize,
    pub sections: usize,
    pub max_depth: usize,
}

impl DocumentStats {
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self::default();
        stats.visit_document(doc);
        stats
    }

    fn reach(&mut self, path: &KeyPath) {
        self.max_depth = self.max_depth.max(path.depth());
    }
}

impl Visitor for DocumentStats {
    fn visit_leaf(&mut self, path: &KeyPath, _value: &str, _kind: ScalarKind) {
        self.leaves += 1;
        self.reach(path);
    }

    fn visit_list(&mut self, path: &KeyPath, items: &[String]) {
        self.lists += 1;
        self.list_items += items.len();
        self.reach(path);
    }

    fn visit_section(&mut self, path: &KeyPath, fields: &Fields) {
        self.sections += 1;
        self.reach(path);
        walk_section(self, path, fields);
    }
}
