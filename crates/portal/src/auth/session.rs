//! Signed-in session state and its persistence.
//!
//! A session is two storage entries: the role wire name under [`ROLE_KEY`]
//! and a `{displayName, email}` profile under [`PROFILE_KEY`]. Both must be
//! present and readable for the visitor to count as signed in.

use schoolcom_core::{Email, KeyValueStore, Role, StorageError};
use serde::{Deserialize, Serialize};

use super::directory::IdentityDirectory;
use super::error::AuthError;

/// Storage key holding the role wire name.
pub const ROLE_KEY: &str = "schoolcom.role";

/// Storage key holding the JSON profile.
pub const PROFILE_KEY: &str = "schoolcom.user";

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub display_name: String,
    pub email: Email,
}

/// Persisted profile half of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProfile {
    display_name: String,
    email: Email,
}

/// Where a request stands with respect to authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Session storage has not been made available yet.
    Loading,
    /// No one is signed in.
    Anonymous,
    Active(Session),
}

impl SessionState {
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Active(session) => Some(session),
            Self::Loading | Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session().map(|s| s.role)
    }
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        session.map_or(Self::Anonymous, Self::Active)
    }
}

/// Resolve `identifier` and persist the resulting session.
///
/// Nothing is written when resolution fails.
///
/// # Errors
///
/// Returns `AuthError` from the directory, or `AuthError::Storage` if the
/// session cannot be written.
pub async fn login<S: KeyValueStore>(
    storage: &S,
    directory: &IdentityDirectory,
    identifier: &str,
    secret: Option<&str>,
) -> Result<Session, AuthError> {
    let session = directory.resolve(identifier, secret)?;
    persist(storage, &session).await?;
    tracing::info!(role = %session.role, email = %session.email, "signed in");
    Ok(session)
}

/// Write both session entries.
///
/// # Errors
///
/// Returns `StorageError` if either write fails.
pub async fn persist<S: KeyValueStore>(storage: &S, session: &Session) -> Result<(), StorageError> {
    let profile = StoredProfile {
        display_name: session.display_name.clone(),
        email: session.email.clone(),
    };
    let json = serde_json::to_string(&profile).map_err(|e| StorageError::Malformed {
        key: PROFILE_KEY.to_string(),
        message: e.to_string(),
    })?;
    storage.set(PROFILE_KEY, json).await?;
    storage.set(ROLE_KEY, session.role.as_str().to_owned()).await
}

/// Remove both session entries.
///
/// # Errors
///
/// Returns `StorageError` if a removal fails.
pub async fn logout<S: KeyValueStore>(storage: &S) -> Result<(), StorageError> {
    storage.remove(ROLE_KEY).await?;
    storage.remove(PROFILE_KEY).await
}

/// Read the session back from storage.
///
/// Absent or unreadable entries mean nobody is signed in; storage failures
/// are logged and treated the same way.
pub async fn hydrate<S: KeyValueStore>(storage: &S) -> Option<Session> {
    match read(storage).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "failed to restore session, treating as signed out");
            None
        }
    }
}

async fn read<S: KeyValueStore>(storage: &S) -> Result<Option<Session>, StorageError> {
    let Some(role) = storage.get(ROLE_KEY).await? else {
        return Ok(None);
    };
    let Some(profile) = storage.get(PROFILE_KEY).await? else {
        return Ok(None);
    };

    let role = role.parse::<Role>().map_err(|e| StorageError::Malformed {
        key: ROLE_KEY.to_string(),
        message: e.to_string(),
    })?;
    let profile: StoredProfile =
        serde_json::from_str(&profile).map_err(|e| StorageError::Malformed {
            key: PROFILE_KEY.to_string(),
            message: e.to_string(),
        })?;

    Ok(Some(Session {
        role,
        display_name: profile.display_name,
        email: profile.email,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use schoolcom_core::MemoryStorage;

    use super::*;

    /// Storage whose every call fails.
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(
            &self,
            _key: &str,
        ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
            async { Err(StorageError::Unavailable("down".to_string())) }
        }

        fn set(
            &self,
            _key: &str,
            _value: String,
        ) -> impl Future<Output = Result<(), StorageError>> + Send {
            async { Err(StorageError::Unavailable("down".to_string())) }
        }

        fn remove(&self, _key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
            async { Err(StorageError::Unavailable("down".to_string())) }
        }
    }

    #[tokio::test]
    async fn test_login_persists_and_hydrates() {
        let storage = MemoryStorage::new();
        let directory = IdentityDirectory::new();

        let session = login(&storage, &directory, "parent@example.com", None)
            .await
            .unwrap();
        assert_eq!(session.role, Role::Parent);
        assert_eq!(session.role.landing_route(), "/parent");

        assert_eq!(
            storage.get(ROLE_KEY).await.unwrap().as_deref(),
            Some("parent")
        );
        let profile = storage.get(PROFILE_KEY).await.unwrap().unwrap();
        assert!(profile.contains("\"displayName\""));

        assert_eq!(hydrate(&storage).await, Some(session));
    }

    #[tokio::test]
    async fn test_failed_login_stores_nothing() {
        let storage = MemoryStorage::new();
        let result = login(&storage, &IdentityDirectory::new(), "visitor", None).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_both_entries() {
        let storage = MemoryStorage::new();
        login(&storage, &IdentityDirectory::new(), "teacher", None)
            .await
            .unwrap();
        logout(&storage).await.unwrap();
        assert!(storage.is_empty());
        assert_eq!(hydrate(&storage).await, None);
    }

    #[tokio::test]
    async fn test_partial_or_corrupt_entries_mean_signed_out() {
        let storage = MemoryStorage::new();
        storage.set(ROLE_KEY, "teacher".to_string()).await.unwrap();
        assert_eq!(hydrate(&storage).await, None);

        storage
            .set(PROFILE_KEY, "{not json".to_string())
            .await
            .unwrap();
        assert_eq!(hydrate(&storage).await, None);

        storage
            .set(
                PROFILE_KEY,
                r#"{"displayName":"T","email":"t@school.edu"}"#.to_string(),
            )
            .await
            .unwrap();
        storage.set(ROLE_KEY, "janitor".to_string()).await.unwrap();
        assert_eq!(hydrate(&storage).await, None);
    }

    #[tokio::test]
    async fn test_storage_failure_means_signed_out() {
        assert_eq!(hydrate(&BrokenStorage).await, None);
        let result = login(&BrokenStorage, &IdentityDirectory::new(), "parent", None).await;
        assert!(matches!(result, Err(AuthError::Storage(_))));
    }

    #[test]
    fn test_session_state_from_option() {
        assert_eq!(SessionState::from(None), SessionState::Anonymous);
        assert_eq!(SessionState::Loading.role(), None);
    }
}
