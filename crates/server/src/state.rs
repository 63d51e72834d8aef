//! Shared application state.

use std::ops::Deref;
use std::sync::Arc;

use crate::config::AltoConfig;
use crate::storage::Storage;

/// Application state shared across all request handlers.
///
/// Cheap to clone; the inner data lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

pub struct Inner {
    /// Server configuration
    pub config: AltoConfig,
    /// Storage backend (memory or Postgres, chosen at startup)
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AltoConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            inner: Arc::new(Inner { config, storage }),
        }
    }
}

impl Deref for AppState {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
