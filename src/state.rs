//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::clients::{EngineClient, ProblemCatalogClient};
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Client for the evaluation engine
    pub engine: Arc<dyn EngineClient>,

    /// Client for the problem catalog
    pub catalog: Arc<dyn ProblemCatalogClient>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        engine: Arc<dyn EngineClient>,
        catalog: Arc<dyn ProblemCatalogClient>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine,
                catalog,
                config,
            }),
        }
    }

    /// Get a reference to the evaluation engine client
    pub fn engine(&self) -> &dyn EngineClient {
        self.inner.engine.as_ref()
    }

    /// Get a reference to the problem catalog client
    pub fn catalog(&self) -> &dyn ProblemCatalogClient {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
