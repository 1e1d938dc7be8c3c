//! One-shot messages carried across a redirect.
//!
//! A handler stores a flash before redirecting; the next page that renders
//! takes it out of the session and shows it as a toast.

use schoolcom_core::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Session key holding the pending flash.
pub const FLASH_KEY: &str = "schoolcom.flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// An already-translated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, FlashKind::Error)
    }
}

/// Store a flash for the next page. Failures are logged, not returned.
pub async fn set_flash<S: KeyValueStore>(storage: &S, flash: &Flash) {
    let result = match serde_json::to_string(flash) {
        Ok(json) => storage.set(FLASH_KEY, json).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(error) = result {
        tracing::warn!(%error, "failed to store flash message");
    }
}

/// Remove and return the pending flash, if any.
pub async fn take_flash<S: KeyValueStore>(storage: &S) -> Option<Flash> {
    let raw = match storage.get(FLASH_KEY).await {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read flash message");
            return None;
        }
    };
    if let Err(e) = storage.remove(FLASH_KEY).await {
        tracing::warn!(error = %e, "failed to clear flash message");
    }
    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use schoolcom_core::MemoryStorage;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let storage = MemoryStorage::new();
        set_flash(&storage, &Flash::success("School created")).await;

        let flash = take_flash(&storage).await.unwrap();
        assert_eq!(flash.message, "School created");
        assert!(!flash.is_error());
        assert_eq!(take_flash(&storage).await, None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_flash_is_dropped() {
        let storage = MemoryStorage::new();
        storage.set(FLASH_KEY, "nope".to_string()).await.unwrap();
        assert_eq!(take_flash(&storage).await, None);
        assert!(storage.is_empty());
    }
}
