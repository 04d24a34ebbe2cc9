//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No document is open in this session")]
    NotOpen,

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// True for edits the UI should reject locally (revert the input)
    pub fn is_recoverable(&self) -> bool {
        match self {
            EditorError::Mutation(e) => e.is_recoverable(),
            _ => false,
        }
    }
}
