//! In-memory conversation registry.
//!
//! Maps conversation ids to [`Session`]s. The registry is an explicitly
//! owned object handed to request handlers by reference -- no process-wide
//! singleton. Internal synchronization comes from `DashMap`; sessions are
//! created on explicit client request and removed only by explicit
//! deletion (no TTL or eviction policy).

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use wayfarer_types::error::SessionError;

use super::Session;

/// Owns every live conversation session, keyed by conversation id.
#[derive(Default)]
pub struct ConversationRegistry {
    sessions: DashMap<String, Arc<Session>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a session under the given id.
    ///
    /// Duplicate ids are rejected rather than overwritten: overwriting
    /// would silently drop an in-flight conversation's log and channel.
    pub fn create(&self, id: impl Into<String>) -> Result<Arc<Session>, SessionError> {
        let id = id.into();
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(_) => Err(SessionError::DuplicateId(id)),
            Entry::Vacant(entry) => {
                let session = Arc::new(Session::new(id));
                entry.insert(session.clone());
                Ok(session)
            }
        }
    }

    /// Create a session under a fresh time-sortable id.
    pub fn create_with_generated_id(&self) -> (String, Arc<Session>) {
        // UUIDv7 collisions are not a practical concern; the expect
        // documents the invariant rather than handling it.
        let id = Uuid::now_v7().to_string();
        let session = self
            .create(id.clone())
            .expect("freshly generated UUIDv7 collided");
        (id, session)
    }

    /// Look up a session. Absence is a recoverable condition for callers.
    pub fn get(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::NotFound)
    }

    /// Remove a session, cancelling any in-flight turn. No-op when absent.
    pub fn delete(&self, id: &str) {
        if let Some((_, session)) = self.sessions.remove(id) {
            session.cancel();
            tracing::info!(conversation_id = %id, "conversation deleted");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        assert_eq!(session.id(), "conv-1");

        let looked_up = registry.get("conv-1").unwrap();
        assert_eq!(looked_up.id(), "conv-1");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = ConversationRegistry::new();
        registry.create("conv-1").unwrap();
        let err = registry.create("conv-1").unwrap_err();
        assert!(matches!(err, SessionError::DuplicateId(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_generated_ids_never_collide() {
        let registry = ConversationRegistry::new();
        let (a, _) = registry.create_with_generated_id();
        let (b, _) = registry.create_with_generated_id();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let registry = ConversationRegistry::new();
        assert!(matches!(
            registry.get("never-created"),
            Err(SessionError::NotFound)
        ));
    }

    #[test]
    fn test_get_after_delete_is_not_found() {
        let registry = ConversationRegistry::new();
        registry.create("conv-1").unwrap();
        registry.delete("conv-1");
        assert!(matches!(registry.get("conv-1"), Err(SessionError::NotFound)));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let registry = ConversationRegistry::new();
        registry.delete("ghost");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_delete_cancels_session() {
        let registry = ConversationRegistry::new();
        let session = registry.create("conv-1").unwrap();
        let token = session.cancellation_token();
        assert!(!token.is_cancelled());
        registry.delete("conv-1");
        assert!(token.is_cancelled());
    }
}
