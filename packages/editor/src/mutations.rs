//! # Front-Matter Mutations
//!
//! Semantic edit operations on a front-matter [`Document`].
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation takes a document and returns a new one; the
//!    input is never touched
//! 2. **Validated**: a failed operation returns an error and no document
//! 3. **Order-preserving**: sibling order only changes where the operation
//!    says so (append on add, removal on remove)
//! 4. **Observable**: each effective edit returns a [`Change`] describing the
//!    affected path with its old and new value
//!
//! ## Mutation Semantics
//!
//! ### SetLeaf / SetListItem
//! - Atomic replacement of the text, scalar kind is kept
//! - Writing the current value is a no-op with no change event
//!
//! ### RenameKey
//! - New key is trimmed before comparison and storage
//! - Empty key → `InvalidKey`, collision with a sibling → `DuplicateKey`
//! - Entry keeps its ordinal position and its value
//!
//! ### AddField
//! - Appends an empty leaf, list or section under a placeholder key that is
//!   unique within the section (`new_field`, `new_field_1`, ...)
//!
//! ### RemoveField
//! - Missing key is a no-op, siblings keep their order

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::keys::{self, RenamePlan};
use crate::path::KeyPath;
use crate::value::ValueNode;

/// Kind of entry created by `AddField`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Field,
    Array,
    Section,
}

impl FieldKind {
    /// Empty node of this kind
    pub fn empty_node(self) -> ValueNode {
        match self {
            FieldKind::Field => ValueNode::string(""),
            FieldKind::Array => ValueNode::List { items: Vec::new() },
            FieldKind::Section => ValueNode::empty_section(),
        }
    }
}

/// Semantic mutations issued by the editing UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Replace the text of an existing leaf
    SetLeaf { path: KeyPath, value: String },

    /// Rename a key inside a section without moving it
    RenameKey {
        section: KeyPath,
        old_key: String,
        new_key: String,
    },

    /// Append an empty item to a list
    AddListItem { list: KeyPath },

    /// Remove the item at `index`
    RemoveListItem { list: KeyPath, index: usize },

    /// Replace the item at `index`
    SetListItem {
        list: KeyPath,
        index: usize,
        value: String,
    },

    /// Append a new empty entry under a placeholder key
    AddField { section: KeyPath, kind: FieldKind },

    /// Delete an entry (no-op when absent)
    RemoveField { section: KeyPath, key: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Invalid key {key:?} in section {section}")]
    InvalidKey { section: KeyPath, key: String },

    #[error("Duplicate key {key:?} in section {section}")]
    DuplicateKey { section: KeyPath, key: String },

    #[error("Path not found: {0}")]
    PathNotFound(KeyPath),

    #[error("Node is not a leaf: {0}")]
    NotALeaf(KeyPath),

    #[error("Node is not a list: {0}")]
    NotAList(KeyPath),

    #[error("Node is not a section: {0}")]
    NotASection(KeyPath),

    #[error("Index {index} out of range for list {path} (len {len})")]
    IndexOutOfRange {
        path: KeyPath,
        index: usize,
        len: usize,
    },
}

impl MutationError {
    /// Errors a UI can recover from by reverting or ignoring the edit.
    ///
    /// Everything else means the caller issued a mutation that does not
    /// match the tree it rendered.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MutationError::InvalidKey { .. }
                | MutationError::DuplicateKey { .. }
                | MutationError::IndexOutOfRange { .. }
        )
    }
}

/// What an applied mutation did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangeKind {
    LeafSet,
    KeyRenamed { from: String, to: String },
    ItemAdded { index: usize },
    ItemRemoved { index: usize },
    ItemSet { index: usize },
    FieldAdded { key: String },
    FieldRemoved { key: String },
    /// Whole document swapped by undo/redo
    Restored,
}

/// Change notification for the UI.
///
/// `path` addresses the node whose value changed. `old_value` is `None` for
/// created entries and `new_value` is `None` for removed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub path: KeyPath,
    pub kind: ChangeKind,
    pub old_value: Option<ValueNode>,
    pub new_value: Option<ValueNode>,
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Document after the mutation (equal to the input for no-ops)
    pub document: Document,

    /// `None` when the mutation had no effect
    pub change: Option<Change>,
}

impl MutationOutcome {
    fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            change: None,
        }
    }

    fn changed(document: Document, change: Change) -> Self {
        Self {
            document,
            change: Some(change),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.change.is_none()
    }
}

impl Mutation {
    /// Apply the mutation to `doc`, returning the new document
    pub fn apply(
        &self,
        doc: &Document,
        config: &EditorConfig,
    ) -> Result<MutationOutcome, MutationError> {
        let outcome = match self {
            Mutation::SetLeaf { path, value } => set_leaf(doc, path, value),

            Mutation::RenameKey {
                section,
                old_key,
                new_key,
            } => rename_key(doc, section, old_key, new_key),

            Mutation::AddListItem { list } => add_list_item(doc, list),

            Mutation::RemoveListItem { list, index } => remove_list_item(doc, list, *index),

            Mutation::SetListItem { list, index, value } => {
                set_list_item(doc, list, *index, value)
            }

            Mutation::AddField { section, kind } => {
                add_field(doc, section, *kind, config.placeholder_for(*kind))
            }

            Mutation::RemoveField { section, key } => remove_field(doc, section, key),
        }?;

        if outcome.is_noop() {
            debug!(op = self.name(), target = %self.target(), "Mutation had no effect");
        } else {
            debug!(op = self.name(), target = %self.target(), "Mutation applied");
        }

        Ok(outcome)
    }

    /// Debug name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetLeaf { .. } => "setLeaf",
            Mutation::RenameKey { .. } => "renameKey",
            Mutation::AddListItem { .. } => "addListItem",
            Mutation::RemoveListItem { .. } => "removeListItem",
            Mutation::SetListItem { .. } => "setListItem",
            Mutation::AddField { .. } => "addField",
            Mutation::RemoveField { .. } => "removeField",
        }
    }

    /// Path of the node the mutation addresses
    pub fn target(&self) -> &KeyPath {
        match self {
            Mutation::SetLeaf { path, .. } => path,
            Mutation::RenameKey { section, .. }
            | Mutation::AddField { section, .. }
            | Mutation::RemoveField { section, .. } => section,
            Mutation::AddListItem { list }
            | Mutation::RemoveListItem { list, .. }
            | Mutation::SetListItem { list, .. } => list,
        }
    }
}

/// Replace the text of the leaf at `path`
pub fn set_leaf(
    doc: &Document,
    path: &KeyPath,
    value: &str,
) -> Result<MutationOutcome, MutationError> {
    match doc.node(path)? {
        ValueNode::Leaf { value: current, .. } if current == value => {
            return Ok(MutationOutcome::unchanged(doc))
        }
        ValueNode::Leaf { .. } => {}
        _ => return Err(MutationError::NotALeaf(path.clone())),
    }

    let mut next = doc.clone();
    let node = next.node_mut(path)?;
    let old_value = node.clone();
    if let ValueNode::Leaf { value: current, .. } = &mut *node {
        *current = value.to_string();
    }
    let new_value = node.clone();

    Ok(MutationOutcome::changed(
        next,
        Change {
            path: path.clone(),
            kind: ChangeKind::LeafSet,
            old_value: Some(old_value),
            new_value: Some(new_value),
        },
    ))
}

/// Rename `old_key` in the section at `section_path`, keeping its position
pub fn rename_key(
    doc: &Document,
    section_path: &KeyPath,
    old_key: &str,
    new_key: &str,
) -> Result<MutationOutcome, MutationError> {
    let section = doc.section(section_path)?;
    let new_key = match keys::plan_rename(section, section_path, old_key, new_key)? {
        RenamePlan::Unchanged => return Ok(MutationOutcome::unchanged(doc)),
        RenamePlan::Rename(key) => key,
    };
    let old_value = ValueNode::section(section.clone());

    let mut next = doc.clone();
    let fields = next.section_mut(section_path)?;
    keys::rename_in_place(fields, old_key, &new_key);
    let new_value = ValueNode::section(fields.clone());

    Ok(MutationOutcome::changed(
        next,
        Change {
            path: section_path.clone(),
            kind: ChangeKind::KeyRenamed {
                from: old_key.to_string(),
                to: new_key,
            },
            old_value: Some(old_value),
            new_value: Some(new_value),
        },
    ))
}

/// Append an empty item to the list at `list_path`
pub fn add_list_item(doc: &Document, list_path: &KeyPath) -> Result<MutationOutcome, MutationError> {
    let mut next = doc.clone();
    let items = next.list_mut(list_path)?;
    let before = items.clone();
    items.push(String::new());
    let index = items.len() - 1;

    let after = next.list(list_path)?.to_vec();
    Ok(MutationOutcome::changed(
        next,
        list_change(list_path, ChangeKind::ItemAdded { index }, before, &after),
    ))
}

/// Remove the item at `index` from the list at `list_path`
pub fn remove_list_item(
    doc: &Document,
    list_path: &KeyPath,
    index: usize,
) -> Result<MutationOutcome, MutationError> {
    let mut next = doc.clone();
    let items = next.list_mut(list_path)?;
    check_index(list_path, index, items.len())?;

    let before = items.clone();
    items.remove(index);

    let after = next.list(list_path)?.to_vec();
    Ok(MutationOutcome::changed(
        next,
        list_change(list_path, ChangeKind::ItemRemoved { index }, before, &after),
    ))
}

/// Replace the item at `index` in the list at `list_path`
pub fn set_list_item(
    doc: &Document,
    list_path: &KeyPath,
    index: usize,
    value: &str,
) -> Result<MutationOutcome, MutationError> {
    let items = doc.list(list_path)?;
    check_index(list_path, index, items.len())?;
    if items[index] == value {
        return Ok(MutationOutcome::unchanged(doc));
    }

    let before = items.to_vec();
    let mut next = doc.clone();
    next.list_mut(list_path)?[index] = value.to_string();

    let after = next.list(list_path)?.to_vec();
    Ok(MutationOutcome::changed(
        next,
        list_change(list_path, ChangeKind::ItemSet { index }, before, &after),
    ))
}

/// Append an empty entry of `kind` under a unique key derived from `base_key`
pub fn add_field(
    doc: &Document,
    section_path: &KeyPath,
    kind: FieldKind,
    base_key: &str,
) -> Result<MutationOutcome, MutationError> {
    if !keys::is_valid_key(base_key) {
        return Err(MutationError::InvalidKey {
            section: section_path.clone(),
            key: base_key.to_string(),
        });
    }

    let mut next = doc.clone();
    let fields = next.section_mut(section_path)?;
    let key = keys::allocate_unique_key(fields, base_key);
    let node = kind.empty_node();
    fields.insert(key.clone(), node.clone());

    Ok(MutationOutcome::changed(
        next,
        Change {
            path: section_path.child(key.clone()),
            kind: ChangeKind::FieldAdded { key },
            old_value: None,
            new_value: Some(node),
        },
    ))
}

/// Delete `key` from the section at `section_path`
pub fn remove_field(
    doc: &Document,
    section_path: &KeyPath,
    key: &str,
) -> Result<MutationOutcome, MutationError> {
    if !doc.section(section_path)?.contains_key(key) {
        return Ok(MutationOutcome::unchanged(doc));
    }

    let mut next = doc.clone();
    let removed = next.section_mut(section_path)?.shift_remove(key);

    Ok(MutationOutcome::changed(
        next,
        Change {
            path: section_path.child(key),
            kind: ChangeKind::FieldRemoved {
                key: key.to_string(),
            },
            old_value: removed,
            new_value: None,
        },
    ))
}

fn check_index(path: &KeyPath, index: usize, len: usize) -> Result<(), MutationError> {
    if index < len {
        Ok(())
    } else {
        Err(MutationError::IndexOutOfRange {
            path: path.clone(),
            index,
            len,
        })
    }
}

fn list_change(path: &KeyPath, kind: ChangeKind, before: Vec<String>, after: &[String]) -> Change {
    Change {
        path: path.clone(),
        kind,
        old_value: Some(ValueNode::List { items: before }),
        new_value: Some(ValueNode::List {
            items: after.to_vec(),
        }),
    }
}
