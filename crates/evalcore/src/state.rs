//! Shared application state passed to every handler via axum's `State`
//! extractor.

use std::sync::Arc;

use crate::config::Config;
use crate::workspace::InFlightRegistry;

/// Cheaply cloneable handle shared across requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    registry: InFlightRegistry,
}

impl std::ops::Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AppStateInner {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry: InFlightRegistry::new(),
            }),
        }
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        let base = tempfile::tempdir().expect("tempdir for test state");
        let mut config = Config::from_env();
        config.storage.base_dir = base.path().to_path_buf();
        // Leak the tempdir so it outlives the handler call in tests that
        // exercise it; unit tests only ever hit /health, which never
        // touches storage.
        std::mem::forget(base);
        Self::new(config)
    }
}
