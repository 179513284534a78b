//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::directory::StoreDirectory;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the store directory.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    directory: StoreDirectory,
}

impl AppState {
    /// Create application state, building the directory from `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let directory = StoreDirectory::from_config(&config);
        Self::with_directory(config, directory)
    }

    /// Create application state around an existing directory.
    #[must_use]
    pub fn with_directory(config: StorefrontConfig, directory: StoreDirectory) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, directory }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store directory.
    #[must_use]
    pub fn directory(&self) -> &StoreDirectory {
        &self.inner.directory
    }
}
