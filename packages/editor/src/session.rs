//! # Edit Session Management
//!
//! Owns the working copy of one page's front matter while its editor is
//! open.
//!
//! ```text
//!            open(wire)                 close()
//!   Empty ─────────────────▶ Loaded ─────────────────▶ Empty
//!                             │  ▲
//!                             └──┘ apply / undo / redo
//! ```
//!
//! The session is the only holder of the document. Every accepted edit
//! replaces it wholesale and bumps the session [`Generation`], which
//! asynchronous lookups use to detect that their result went stale.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::codec;
use crate::lookup::LookupGuard;
use crate::visitor::DocumentStats;
use crate::{Change, ChangeKind, Document, EditorConfig, EditorError, KeyPath, Mutation, UndoStack};

/// Monotonic counter of session state changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn bump(&mut self) {
        self.0 += 1;
    }
}

/// Document held by a loaded session
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    /// Current edited document
    pub document: Document,

    /// Document as last opened or saved
    pub saved: Document,

    /// Number of accepted edits since open
    pub version: u64,
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Loaded(WorkingCopy),
}

/// Single front-matter editing session
#[derive(Debug)]
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    config: EditorConfig,
    state: SessionState,
    generation: Generation,
    history: UndoStack,
}

impl EditSession {
    /// Create new, empty edit session
    pub fn new(id: impl Into<String>, config: EditorConfig) -> Self {
        let history = UndoStack::with_max_levels(config.undo_levels);
        Self {
            id: id.into(),
            config,
            state: SessionState::Empty,
            generation: Generation::default(),
            history,
        }
    }

    /// Decode `wire` and make it the working copy, discarding any previous one
    pub fn open(&mut self, wire: Option<&Value>) {
        self.load(codec::decode(wire));
    }

    /// Make an already decoded document the working copy
    pub fn load(&mut self, document: Document) {
        let stats = DocumentStats::collect(&document);
        self.history.clear();
        self.generation.bump();
        info!(
            session = %self.id,
            generation = self.generation.value(),
            fields = document.len(),
            sections = stats.sections,
            lists = stats.lists,
            "Front matter opened"
        );

        self.state = SessionState::Loaded(WorkingCopy {
            saved: document.clone(),
            document,
            version: 0,
        });
    }

    /// Drop the working copy without persisting it
    pub fn close(&mut self) -> bool {
        let was_open = matches!(self.state, SessionState::Loaded(_));
        if was_open {
            self.generation.bump();
            info!(session = %self.id, generation = self.generation.value(), "Front matter closed");
        }
        self.state = SessionState::Empty;
        self.history.clear();
        was_open
    }

    /// Apply a mutation to the working copy.
    ///
    /// Returns the change event for the UI, or `None` for a no-op. On error
    /// the working copy is left untouched.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<Change>, EditorError> {
        let copy = match &mut self.state {
            SessionState::Loaded(copy) => copy,
            SessionState::Empty => return Err(EditorError::NotOpen),
        };

        let outcome = mutation.apply(&copy.document, &self.config)?;
        let Some(change) = outcome.change else {
            return Ok(None);
        };

        let before = std::mem::replace(&mut copy.document, outcome.document);
        copy.version += 1;
        self.history.record(mutation, before, copy.document.clone());
        self.generation.bump();

        debug!(
            session = %self.id,
            version = copy.version,
            path = %change.path,
            "Working copy updated"
        );
        Ok(Some(change))
    }

    /// Current document in wire form, ready to hand to persistence
    pub fn snapshot(&self) -> Result<Value, EditorError> {
        Ok(codec::encode(self.document()?))
    }

    /// Record that the current document was persisted
    pub fn mark_saved(&mut self) -> Result<(), EditorError> {
        let copy = self.working_copy_mut()?;
        copy.saved = copy.document.clone();
        Ok(())
    }

    /// Revert the most recent edit (or batch)
    pub fn undo(&mut self) -> Result<Option<Change>, EditorError> {
        self.restore(|history, doc| history.undo(doc))
    }

    /// Re-apply the most recently undone edit (or batch)
    pub fn redo(&mut self) -> Result<Option<Change>, EditorError> {
        self.restore(|history, doc| history.redo(doc))
    }

    fn restore(
        &mut self,
        step: impl FnOnce(&mut UndoStack, &mut Document) -> bool,
    ) -> Result<Option<Change>, EditorError> {
        let copy = match &mut self.state {
            SessionState::Loaded(copy) => copy,
            SessionState::Empty => return Err(EditorError::NotOpen),
        };

        let old_value = copy.document.to_node();
        if !step(&mut self.history, &mut copy.document) {
            return Ok(None);
        }
        copy.version += 1;
        self.generation.bump();

        Ok(Some(Change {
            path: KeyPath::root(),
            kind: ChangeKind::Restored,
            old_value: Some(old_value),
            new_value: Some(copy.document.to_node()),
        }))
    }

    /// Group following edits into one undo step.
    ///
    /// Batches nest; the outermost one labels the step.
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        let nested = self.history.is_batching();
        self.history.begin_batch();
        if !nested {
            self.history.set_batch_description(description);
        }
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn document(&self) -> Result<&Document, EditorError> {
        match &self.state {
            SessionState::Loaded(copy) => Ok(&copy.document),
            SessionState::Empty => Err(EditorError::NotOpen),
        }
    }

    fn working_copy_mut(&mut self) -> Result<&mut WorkingCopy, EditorError> {
        match &mut self.state {
            SessionState::Loaded(copy) => Ok(copy),
            SessionState::Empty => Err(EditorError::NotOpen),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    /// Working copy differs from the last opened/saved document
    pub fn is_dirty(&self) -> bool {
        match &self.state {
            SessionState::Loaded(copy) => copy.document != copy.saved,
            SessionState::Empty => false,
        }
    }

    /// Number of accepted edits since open (0 when empty)
    pub fn version(&self) -> u64 {
        match &self.state {
            SessionState::Loaded(copy) => copy.version,
            SessionState::Empty => 0,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Guard for an asynchronous lookup started now
    pub fn lookup_guard(&self) -> LookupGuard {
        LookupGuard::new(self.id.clone(), self.generation)
    }
}
