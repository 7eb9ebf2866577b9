use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An authenticated session: the opaque backend token plus the identity it
/// was issued for. Read-only once established.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: String,
}

impl Session {
    pub fn new(token: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            identity: identity.into(),
        }
    }
}

/// Shared holder for the current session.
///
/// The authentication collaborator calls [`establish`](Self::establish) after
/// a successful login and [`clear`](Self::clear) on logout; the orchestrator
/// calls [`invalidate`](Self::invalidate) when the backend rejects the token.
/// Everything else only reads.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session produced by a successful authentication.
    pub fn establish(&self, token: impl Into<String>, identity: impl Into<String>) {
        let mut slot = self.write();
        *slot = Some(Session::new(token, identity));
    }

    /// The current token, or `Unauthenticated` when no session is held.
    pub fn token(&self) -> Result<String> {
        self.read()
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(CoreError::Unauthenticated)
    }

    pub fn identity(&self) -> Option<String> {
        self.read().as_ref().map(|session| session.identity.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Drop the session on logout.
    pub fn clear(&self) {
        let mut slot = self.write();
        *slot = None;
    }

    /// Drop the session because a request reported the token invalid. The
    /// caller is expected to redirect to re-authentication.
    pub fn invalidate(&self) {
        self.clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        f.debug_struct("SessionStore")
            .field("identity", &self.identity())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_is_unauthenticated() {
        let store = SessionStore::new();

        assert!(!store.is_authenticated());
        assert!(matches!(store.token(), Err(CoreError::Unauthenticated)));
        assert!(store.identity().is_none());
    }

    #[test]
    fn test_establish_and_read() {
        let store = SessionStore::new();
        store.establish("JSESSIONID-abc", "2021302181234");

        assert!(store.is_authenticated());
        assert_eq!(store.token().unwrap(), "JSESSIONID-abc");
        assert_eq!(store.identity().as_deref(), Some("2021302181234"));
    }

    #[test]
    fn test_clear_drops_session() {
        let store = SessionStore::new();
        store.establish("tok", "user");

        store.clear();

        assert!(matches!(store.token(), Err(CoreError::Unauthenticated)));
    }

    #[test]
    fn test_invalidate_drops_session() {
        let store = SessionStore::new();
        store.establish("tok", "user");

        store.invalidate();

        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let view = store.clone();

        store.establish("tok", "user");
        assert_eq!(view.token().unwrap(), "tok");

        view.invalidate();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::new();
        store.establish("super-secret", "user");

        let printed = format!("{:?}", store);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("user"));
    }
}
