//! # Document
//!
//! A front-matter document is the root section of a value tree. It has no
//! key of its own; every other node is addressed by a [`KeyPath`] from here.
//!
//! Documents are treated as values: mutations clone the tree, change the
//! clone and hand it back, so a document observed by the UI never changes
//! underneath it.

use serde::{Deserialize, Serialize};

use crate::mutations::MutationError;
use crate::path::KeyPath;
use crate::value::{fields_eq, Fields, ValueNode};

/// Root section of a front-matter tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Fields,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        fields_eq(&self.fields, &other.fields)
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Top-level keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The whole document as a section node
    pub fn to_node(&self) -> ValueNode {
        ValueNode::section(self.fields.clone())
    }

    /// Look up a node, returning `None` for any unresolvable path
    pub fn get(&self, path: &KeyPath) -> Option<&ValueNode> {
        self.node(path).ok()
    }

    /// Resolve the section at `path` (the root for an empty path)
    pub fn section(&self, path: &KeyPath) -> Result<&Fields, MutationError> {
        let mut fields = &self.fields;
        for (depth, key) in path.keys().enumerate() {
            match fields.get(key) {
                Some(ValueNode::Section { fields: inner }) => fields = inner,
                Some(_) => return Err(MutationError::NotASection(path.prefix(depth + 1))),
                None => return Err(MutationError::PathNotFound(path.prefix(depth + 1))),
            }
        }
        Ok(fields)
    }

    pub(crate) fn section_mut(&mut self, path: &KeyPath) -> Result<&mut Fields, MutationError> {
        let mut fields = &mut self.fields;
        for (depth, key) in path.keys().enumerate() {
            match fields.get_mut(key) {
                Some(ValueNode::Section { fields: inner }) => fields = inner,
                Some(_) => return Err(MutationError::NotASection(path.prefix(depth + 1))),
                None => return Err(MutationError::PathNotFound(path.prefix(depth + 1))),
            }
        }
        Ok(fields)
    }

    /// Resolve the node at a non-empty path
    pub fn node(&self, path: &KeyPath) -> Result<&ValueNode, MutationError> {
        let (key, parent) = path
            .split_last()
            .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
        self.section(&parent)?
            .get(key)
            .ok_or_else(|| MutationError::PathNotFound(path.clone()))
    }

    pub(crate) fn node_mut(&mut self, path: &KeyPath) -> Result<&mut ValueNode, MutationError> {
        let (key, parent) = path
            .split_last()
            .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
        self.section_mut(&parent)?
            .get_mut(key)
            .ok_or_else(|| MutationError::PathNotFound(path.clone()))
    }

    /// Resolve the list items at `path`
    pub fn list(&self, path: &KeyPath) -> Result<&[String], MutationError> {
        match self.node(path)? {
            ValueNode::List { items } => Ok(items),
            _ => Err(MutationError::NotAList(path.clone())),
        }
    }

    pub(crate) fn list_mut(&mut self, path: &KeyPath) -> Result<&mut Vec<String>, MutationError> {
        match self.node_mut(path)? {
            ValueNode::List { items } => Ok(items),
            _ => Err(MutationError::NotAList(path.clone())),
        }
    }
}

impl From<Fields> for Document {
    fn from(fields: Fields) -> Self {
        Self::from_fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut inventory = Fields::new();
        inventory.insert("container".to_string(), ValueNode::string("lab_small_parts"));
        inventory.insert("items".to_string(), ValueNode::list(["a", "b"]));

        let mut fields = Fields::new();
        fields.insert("title".to_string(), ValueNode::string("Inventory Item"));
        fields.insert("inventory".to_string(), ValueNode::section(inventory));
        Document::from_fields(fields)
    }

    #[test]
    fn test_resolve_nested_node() {
        let doc = sample();
        let items = doc.list(&KeyPath::from(["inventory", "items"])).unwrap();
        assert_eq!(items, &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_resolve_root_section() {
        let doc = sample();
        assert_eq!(doc.section(&KeyPath::root()).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_intermediate_key_reports_prefix() {
        let doc = sample();
        let err = doc.node(&KeyPath::from(["nope", "items"])).unwrap_err();
        assert_eq!(err, MutationError::PathNotFound(KeyPath::from(["nope"])));
    }

    #[test]
    fn test_walking_through_leaf_is_not_a_section() {
        let doc = sample();
        let err = doc.section(&KeyPath::from(["title", "x"])).unwrap_err();
        assert_eq!(err, MutationError::NotASection(KeyPath::from(["title"])));
    }

    #[test]
    fn test_list_kind_mismatch() {
        let doc = sample();
        let err = doc.list(&KeyPath::from(["title"])).unwrap_err();
        assert_eq!(err, MutationError::NotAList(KeyPath::from(["title"])));
    }
}
