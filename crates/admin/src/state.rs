//! Application state shared across handlers.

use std::sync::Arc;

use crate::client::{ClientError, UsersClient};
use crate::config::AdminConfig;
use crate::store::{InMemoryUserStore, UserStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// record store (served by the JSON API) and the API client (used by the
/// dashboard to reach that API over HTTP).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn UserStore>,
    users_api: UsersClient,
}

impl AppState {
    /// Create application state with a fresh in-memory store built from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config.api_url`.
    pub fn new(config: AdminConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn UserStore> = if config.seed {
            Arc::new(InMemoryUserStore::seeded(config.id_strategy))
        } else {
            Arc::new(InMemoryUserStore::new(config.id_strategy))
        };
        Self::with_store(config, store)
    }

    /// Create application state around an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config.api_url`.
    pub fn with_store(config: AdminConfig, store: Arc<dyn UserStore>) -> Result<Self, ClientError> {
        let users_api = UsersClient::new(&config.api_url, config.client_timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                users_api,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the record store.
    #[must_use]
    pub fn store(&self) -> &dyn UserStore {
        self.inner.store.as_ref()
    }

    /// Get the user API client used by the dashboard.
    #[must_use]
    pub fn users_api(&self) -> &UsersClient {
        &self.inner.users_api
    }
}
