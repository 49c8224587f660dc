use docscan_client_core::{ClientError, SessionMarker, SessionStore};
use web_sys::Storage;

/// Session marker kept in `localStorage` as the bare username.
pub(super) struct LocalStorageSessionStore {
    key: String,
}

impl LocalStorageSessionStore {
    pub(super) fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage(&self) -> Result<Storage, ClientError> {
        let window = web_sys::window()
            .ok_or_else(|| ClientError::Storage("window is unavailable".to_string()))?;
        window
            .local_storage()
            .map_err(|_| ClientError::Storage("localStorage access was denied".to_string()))?
            .ok_or_else(|| ClientError::Storage("localStorage is unavailable".to_string()))
    }
}

impl SessionStore for LocalStorageSessionStore {
    type Error = ClientError;

    fn load_marker(&self) -> Result<Option<SessionMarker>, ClientError> {
        let raw = self
            .storage()?
            .get_item(&self.key)
            .map_err(|_| ClientError::Storage(format!("failed to read `{}`", self.key)))?;
        Ok(raw.as_deref().and_then(SessionMarker::new))
    }

    fn persist_marker(&self, marker: &SessionMarker) -> Result<(), ClientError> {
        self.storage()?
            .set_item(&self.key, &marker.username)
            .map_err(|_| ClientError::Storage(format!("failed to write `{}`", self.key)))
    }

    fn clear_marker(&self) -> Result<(), ClientError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|_| ClientError::Storage(format!("failed to remove `{}`", self.key)))
    }
}
