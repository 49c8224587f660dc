//! Client-side session marker. The marker only lets protected pages skip a
//! round trip before redirecting to login; the server stays authoritative.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub username: String,
}

impl SessionMarker {
    /// Blank usernames never produce a marker.
    pub fn new(username: &str) -> Option<Self> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
        })
    }
}

pub trait SessionStore {
    type Error: std::fmt::Display;

    fn load_marker(&self) -> Result<Option<SessionMarker>, Self::Error>;
    fn persist_marker(&self, marker: &SessionMarker) -> Result<(), Self::Error>;
    fn clear_marker(&self) -> Result<(), Self::Error>;
}

/// Session state owned by the page controller. Loaded once at startup and
/// replaced only through [`SessionContext::establish`] and [`SessionContext::end`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    marker: Option<SessionMarker>,
}

impl SessionContext {
    pub fn load<S: SessionStore>(store: &S) -> Self {
        match store.load_marker() {
            Ok(marker) => Self { marker },
            Err(error) => {
                tracing::warn!(%error, "session marker unavailable; treating as signed out");
                Self::default()
            }
        }
    }

    pub fn marker(&self) -> Option<&SessionMarker> {
        self.marker.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.marker.is_some()
    }

    pub fn establish<S: SessionStore>(&mut self, store: &S, marker: SessionMarker) {
        if let Err(error) = store.persist_marker(&marker) {
            tracing::warn!(%error, "failed to persist session marker");
        }
        tracing::info!(username = %marker.username, "session established");
        self.marker = Some(marker);
    }

    pub fn end<S: SessionStore>(&mut self, store: &S) {
        if let Err(error) = store.clear_marker() {
            tracing::warn!(%error, "failed to clear session marker");
        }
        if self.marker.take().is_some() {
            tracing::info!("session ended");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySessionStore;

    #[test]
    fn blank_username_is_not_a_marker() {
        assert_eq!(SessionMarker::new("   "), None);
        assert_eq!(
            SessionMarker::new(" alice "),
            Some(SessionMarker {
                username: "alice".to_string()
            })
        );
    }

    #[test]
    fn establish_and_end_keep_store_in_sync() {
        let store = MemorySessionStore::default();
        let mut session = SessionContext::load(&store);
        assert!(!session.is_present());

        session.establish(
            &store,
            SessionMarker::new("alice").expect("non-blank username"),
        );
        assert!(session.is_present());
        assert_eq!(
            store.stored().map(|marker| marker.username),
            Some("alice".to_string())
        );

        session.end(&store);
        assert!(!session.is_present());
        assert_eq!(store.stored(), None);
    }

    #[test]
    fn unreadable_store_means_signed_out() {
        let store = MemorySessionStore::failing();
        let session = SessionContext::load(&store);
        assert!(!session.is_present());
    }

    #[test]
    fn failed_persist_still_updates_context() {
        let store = MemorySessionStore::failing();
        let mut session = SessionContext::default();
        session.establish(&store, SessionMarker::new("bob").expect("non-blank"));
        assert_eq!(
            session.marker().map(|marker| marker.username.as_str()),
            Some("bob")
        );
    }
}
