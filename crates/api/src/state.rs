//! Application state shared across handlers.

use std::sync::Arc;

use tally_core::CustomerStore;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the customer store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: CustomerStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `store` - Customer store the handlers read and write
    #[must_use]
    pub fn new(config: ApiConfig, store: CustomerStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the customer store.
    #[must_use]
    pub fn store(&self) -> &CustomerStore {
        &self.inner.store
    }
}
