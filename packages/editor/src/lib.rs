//! # Wikiedit Editor
//!
//! Structured front-matter editing engine for wiki pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ metadata RPC: page front matter as JSON     │
//! └─────────────────────────────────────────────┘
//!                     ↓ codec::decode
//! ┌─────────────────────────────────────────────┐
//! │ editor: working copy + mutations            │
//! │  - Typed value tree (leaf/list/section)     │
//! │  - Validated, order-preserving mutations    │
//! │  - Change events for the UI                 │
//! │  - Undo/redo history                        │
//! └─────────────────────────────────────────────┘
//!                     ↓ codec::encode
//! ┌─────────────────────────────────────────────┐
//! │ persistence: replace metadata RPC           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Typed at the boundary**: untyped wire values stop at the codec
//! 2. **Documents are values**: each edit produces a new tree
//! 3. **Order is content**: sibling order survives every unrelated edit
//! 4. **One owner**: the session holds the only working copy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wikiedit_editor::{EditSession, EditorConfig, KeyPath, Mutation};
//!
//! let mut session = EditSession::new("page-editor", EditorConfig::default());
//! session.open(Some(&wire));
//!
//! let change = session.apply(Mutation::AddListItem {
//!     list: KeyPath::from(["inventory", "items"]),
//! })?;
//!
//! let wire = session.snapshot()?;
//! session.close();
//! ```

pub mod codec;
mod config;
mod document;
mod errors;
pub mod keys;
pub mod lookup;
mod mutations;
mod path;
mod session;
mod undo_stack;
mod value;
pub mod visitor;

pub use codec::{decode, encode};
pub use config::{EditorConfig, PlaceholderKeys};
pub use document::Document;
pub use errors::EditorError;
pub use mutations::{
    add_field, add_list_item, remove_field, remove_list_item, rename_key, set_leaf,
    set_list_item, Change, ChangeKind, FieldKind, Mutation, MutationError, MutationOutcome,
};
pub use path::KeyPath;
pub use session::{EditSession, Generation, SessionState, WorkingCopy};
pub use undo_stack::{HistoryEntry, MutationBatch, UndoStack};
pub use value::{Fields, ScalarKind, ValueNode};
pub use visitor::{editor_rows, DocumentStats, EditorRow, RowContent, Visitor};
