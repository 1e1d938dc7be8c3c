//! Application state shared across handlers.

use std::sync::Arc;

use schoolcom_core::Language;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ai::ClaudeClient;
use crate::auth::IdentityDirectory;
use crate::config::PortalConfig;
use crate::i18n::{Catalog, Translator};
use crate::models::PortalData;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    catalog: Arc<Catalog>,
    directory: IdentityDirectory,
    claude: Option<ClaudeClient>,
    data: RwLock<PortalData>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: PortalConfig,
        catalog: Catalog,
        directory: IdentityDirectory,
        claude: Option<ClaudeClient>,
        data: PortalData,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(catalog),
                directory,
                claude,
                data: RwLock::new(data),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn translator(&self, language: Language) -> Translator {
        Translator::new(Arc::clone(&self.inner.catalog), language)
    }

    #[must_use]
    pub fn directory(&self) -> &IdentityDirectory {
        &self.inner.directory
    }

    /// `None` when no API key is configured.
    #[must_use]
    pub fn claude(&self) -> Option<&ClaudeClient> {
        self.inner.claude.as_ref()
    }

    pub async fn data(&self) -> RwLockReadGuard<'_, PortalData> {
        self.inner.data.read().await
    }

    pub async fn data_mut(&self) -> RwLockWriteGuard<'_, PortalData> {
        self.inner.data.write().await
    }
}
