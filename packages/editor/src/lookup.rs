//! # Identifier Lookups
//!
//! Title → identifier suggestions come from an external service and arrive
//! asynchronously. The editor never cancels an in-flight request; instead
//! each lookup carries a [`LookupGuard`] recording the session generation
//! it started at, and a result is only accepted if the session has not
//! changed since.
//!
//! With the `lookup` feature, [`DebouncedLookup`] adds the keystroke
//! debounce on top: scheduling a new lookup drops the pending one.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::session::{EditSession, Generation};

/// Page that already owns an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    pub identifier: String,
    pub title: String,
}

/// Identifier proposed for a piece of free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierCandidate {
    pub identifier: String,
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<PageRef>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Identifier lookup failed: {0}")]
    Failed(String),
}

/// Session state a lookup was started against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupGuard {
    session_id: String,
    generation: Generation,
}

impl LookupGuard {
    pub fn new(session_id: String, generation: Generation) -> Self {
        Self {
            session_id,
            generation,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Session is still open and unchanged since the guard was taken
    pub fn is_current(&self, session: &EditSession) -> bool {
        session.is_open()
            && session.id == self.session_id
            && session.generation() == self.generation
    }

    /// Pass `result` through only if it is not stale
    pub fn accept<T>(&self, session: &EditSession, result: T) -> Option<T> {
        if self.is_current(session) {
            Some(result)
        } else {
            warn!(
                session = %self.session_id,
                started_at = self.generation.value(),
                now = session.generation().value(),
                "Discarding stale lookup result"
            );
            None
        }
    }
}

#[cfg(feature = "lookup")]
pub use debounce::{DebouncedLookup, IdentifierService, LookupResponse};

#[cfg(feature = "lookup")]
mod debounce {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::task::JoinHandle;
    use tracing::debug;

    use super::{IdentifierCandidate, LookupError, LookupGuard};

    /// Identifier generation collaborator
    #[async_trait]
    pub trait IdentifierService: Send + Sync {
        async fn suggest(&self, text: &str) -> Result<IdentifierCandidate, LookupError>;
    }

    /// Completed lookup, to be checked with its guard before use
    #[derive(Debug)]
    pub struct LookupResponse {
        pub guard: LookupGuard,
        pub text: String,
        pub result: Result<IdentifierCandidate, LookupError>,
    }

    /// Runs at most one pending lookup, started after a quiet period
    pub struct DebouncedLookup<S: IdentifierService + 'static> {
        service: Arc<S>,
        delay: Duration,
        pending: Option<JoinHandle<LookupResponse>>,
    }

    impl<S: IdentifierService + 'static> DebouncedLookup<S> {
        pub fn new(service: Arc<S>, delay: Duration) -> Self {
            Self {
                service,
                delay,
                pending: None,
            }
        }

        /// Schedule a lookup for `text`, replacing any pending one
        pub fn schedule(&mut self, text: impl Into<String>, guard: LookupGuard) {
            self.cancel();

            let text = text.into();
            let service = Arc::clone(&self.service);
            let delay = self.delay;
            debug!(text = %text, generation = guard.generation().value(), "Scheduling identifier lookup");

            self.pending = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let result = service.suggest(&text).await;
                LookupResponse {
                    guard,
                    text,
                    result,
                }
            }));
        }

        /// Drop the pending lookup, if any
        pub fn cancel(&mut self) {
            if let Some(handle) = self.pending.take() {
                handle.abort();
            }
        }

        pub fn is_pending(&self) -> bool {
            self.pending.is_some()
        }

        /// Wait for the pending lookup. `None` if nothing is scheduled.
        pub async fn next(&mut self) -> Option<LookupResponse> {
            let handle = self.pending.take()?;
            match handle.await {
                Ok(response) => Some(response),
                Err(e) => {
                    debug!(error = %e, "Identifier lookup task did not complete");
                    None
                }
            }
        }
    }

    impl<S: IdentifierService + 'static> Drop for DebouncedLookup<S> {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}


#[cfg(all(test, feature = "lookup"))]
mod debounce_tests {
    use super::*;
    use crate::{EditorConfig, KeyPath, Mutation};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct SnakeCaseService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentifierService for SnakeCaseService {
        async fn suggest(&self, text: &str) -> Result<IdentifierCandidate, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let identifier = text.trim().to_lowercase().replace(' ', "_");
            Ok(IdentifierCandidate {
                is_unique: identifier != "taken",
                identifier,
                conflict: None,
            })
        }
    }

    fn open_session() -> EditSession {
        let mut session = EditSession::new("client-1", EditorConfig::default());
        session.open(Some(&json!({ "title": "" })));
        session
    }

    #[tokio::test]
    async fn test_debounce_keeps_only_latest_lookup() {
        let service = Arc::new(SnakeCaseService::default());
        let mut lookup = DebouncedLookup::new(Arc::clone(&service), Duration::from_millis(20));
        let session = open_session();

        lookup.schedule("Inv", session.lookup_guard());
        lookup.schedule("Inv Item", session.lookup_guard());

        let response = lookup.next().await.unwrap();
        assert_eq!(response.text, "Inv Item");
        assert_eq!(response.result.unwrap().identifier, "inv_item");
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert!(lookup.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let service = Arc::new(SnakeCaseService::default());
        let mut lookup = DebouncedLookup::new(service, Duration::from_millis(5));
        let mut session = open_session();

        lookup.schedule("Inventory Item", session.lookup_guard());
        session
            .apply(Mutation::SetLeaf {
                path: KeyPath::from(["title"]),
                value: "Inventory Item".to_string(),
            })
            .unwrap();

        let response = lookup.next().await.unwrap();
        assert!(response.guard.accept(&session, response.result).is_none());
    }

    #[tokio::test]
    async fn test_cancel_drops_pending() {
        let service = Arc::new(SnakeCaseService::default());
        let mut lookup = DebouncedLookup::new(Arc::clone(&service), Duration::from_millis(50));
        let session = open_session();

        lookup.schedule("x", session.lookup_guard());
        assert!(lookup.is_pending());
        lookup.cancel();

        assert!(lookup.next().await.is_none());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }
}
