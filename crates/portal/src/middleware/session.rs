//! Session layer and the key-value adapter over it.
//!
//! Sessions live in the tower-sessions in-memory store: restarting the
//! portal signs everyone out, like it resets every record.

use std::future::Future;

use schoolcom_core::{KeyValueStore, StorageError};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::PortalConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "schoolcom_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &PortalConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// [`KeyValueStore`] backed by the request's tower-sessions [`Session`].
///
/// Values are stored as JSON strings under their own keys.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

fn unavailable(err: &tower_sessions::session::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        let session = self.session.clone();
        let key = key.to_owned();
        async move {
            session
                .get::<String>(&key)
                .await
                .map_err(|e| unavailable(&e))
        }
    }

    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        let session = self.session.clone();
        let key = key.to_owned();
        async move {
            session
                .insert(&key, value)
                .await
                .map_err(|e| unavailable(&e))
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        let session = self.session.clone();
        let key = key.to_owned();
        async move {
            session
                .remove::<String>(&key)
                .await
                .map(|_| ())
                .map_err(|e| unavailable(&e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_session_storage_round_trip() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let storage = SessionStorage::new(session);

        assert_eq!(storage.get("schoolcom.role").await.unwrap(), None);
        storage
            .set("schoolcom.role", "teacher".to_string())
            .await
            .unwrap();
        assert_eq!(
            storage.get("schoolcom.role").await.unwrap().as_deref(),
            Some("teacher")
        );
        storage.remove("schoolcom.role").await.unwrap();
        storage.remove("schoolcom.role").await.unwrap();
        assert_eq!(storage.get("schoolcom.role").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_through_session_storage() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let storage = SessionStorage::new(session);
        let directory = crate::auth::IdentityDirectory::new();
        crate::auth::login(&storage, &directory, "school.admin", None)
            .await
            .unwrap();
        let restored = crate::auth::hydrate(&storage).await.unwrap();
        assert_eq!(restored.role, schoolcom_core::Role::SchoolAdmin);
    }

    #[test]
    fn test_session_layer_builds() {
        let _layer = create_session_layer(&PortalConfig::local());
    }
}
