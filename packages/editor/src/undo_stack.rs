//! # Undo/Redo Stack
//!
//! Edit history for a session working copy.
//!
//! ## Design
//!
//! - Documents are replaced, never edited in place, so each entry keeps the
//!   document before and after its mutation
//! - Undo restores the state before the most recent batch
//! - Redo restores the state after it
//! - Recording a mutation drops everything that was undone
//! - A batch groups several mutations into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let outcome = mutation.apply(&doc, &config)?;
//! stack.record(mutation, doc.clone(), outcome.document.clone());
//! doc = outcome.document;
//!
//! // Undo
//! stack.undo(&mut doc);
//!
//! // Redo
//! stack.redo(&mut doc);
//! ```

use crate::{Document, Mutation};

/// One applied mutation with the documents on either side of it
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mutation: Mutation,
    pub before: Document,
    pub after: Document,
}

/// Mutations undone and redone as one step
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The entries in this batch (in application order)
    pub entries: Vec<HistoryEntry>,

    /// Label shown for the undo/redo entry
    pub description: Option<String>,
}

impl MutationBatch {
    /// Batch holding just `entry`
    pub fn single(entry: HistoryEntry) -> Self {
        Self {
            entries: vec![entry],
            description: None,
        }
    }

    /// Attach a label
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mutations in application order
    pub fn mutations(&self) -> impl Iterator<Item = &Mutation> {
        self.entries.iter().map(|entry| &entry.mutation)
    }

    fn before(&self) -> Option<&Document> {
        self.entries.first().map(|entry| &entry.before)
    }

    fn after(&self) -> Option<&Document> {
        self.entries.last().map(|entry| &entry.after)
    }
}

/// Bounded undo/redo history
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Undo depth, 0 for unbounded
    max_levels: usize,

    /// Open batch, if any
    current_batch: Option<MutationBatch>,

    /// Number of unmatched `begin_batch` calls
    batch_depth: usize,
}

impl UndoStack {
    /// History with the default depth of 100
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// History keeping at most `max_levels` steps
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            batch_depth: 0,
        }
    }

    /// Record an applied mutation
    pub fn record(&mut self, mutation: Mutation, before: Document, after: Document) {
        let entry = HistoryEntry {
            mutation,
            before,
            after,
        };

        if let Some(batch) = &mut self.current_batch {
            batch.entries.push(entry);
            // Anything undone before the batch started is no longer reachable
            self.redo_stack.clear();
        } else {
            self.push_batch(MutationBatch::single(entry));
        }
    }

    /// Open a batch; mutations recorded until the matching `end_batch` undo
    /// together. A nested call joins the batch already open.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
        if self.current_batch.is_none() {
            self.current_batch = Some(MutationBatch {
                entries: Vec::new(),
                description: None,
            });
        }
    }

    /// Close one batch level. The outermost close pushes the batch; empty
    /// batches are dropped.
    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            self.flush_batch();
        }
    }

    fn flush_batch(&mut self) {
        self.batch_depth = 0;
        if let Some(batch) = self.current_batch.take() {
            if !batch.entries.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Label the open batch
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Returns false if there was nothing to undo.
    ///
    /// An open batch is closed first so it can be undone as a unit.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        self.flush_batch();

        let Some(batch) = self.undo_stack.pop() else {
            return false;
        };
        if let Some(before) = batch.before() {
            *doc = before.clone();
        }
        self.redo_stack.push(batch);
        true
    }

    /// Redo the most recently undone batch. Returns false if there was nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(batch) = self.redo_stack.pop() else {
            return false;
        };
        if let Some(after) = batch.after() {
            *doc = after.clone();
        }
        self.undo_stack.push(batch);
        true
    }

    /// Something to undo, including an unclosed batch
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
            || self
                .current_batch
                .as_ref()
                .is_some_and(|batch| !batch.entries.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Closed batches available to undo
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history, including an open batch
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
        self.batch_depth = 0;
    }

    /// Label of the batch `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Label of the batch `redo` would re-apply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
