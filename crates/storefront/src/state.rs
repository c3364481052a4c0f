//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::store::{SnapshotStorage, Store};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store sits behind a mutex purely as
/// plumbing: all mutations happen synchronously inside a single handler
/// invocation and the lock is never held across an await point.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    store: Mutex<Store>,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Restores the persisted cart/cache snapshot from
    /// `config.state_path` if one exists.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let store = Store::with_storage(SnapshotStorage::new(&config.state_path));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store: Mutex::new(store),
            }),
        }
    }

    /// Create state with an in-memory store, for tests.
    #[must_use]
    pub fn new_ephemeral(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store: Mutex::new(Store::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Lock and return the client state store.
    ///
    /// A poisoned lock is recovered rather than propagated: the store's
    /// invariants hold after every individual mutation, so state left by a
    /// panicking handler is still consistent.
    #[must_use]
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
