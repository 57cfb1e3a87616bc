//! Service container for dependency injection
//!
//! Wires the tree builder to its process-information source.

use std::sync::Arc;

use crate::application::services::TreeBuilder;
use crate::config::Settings;
use crate::infrastructure::traits::{ProcFs, ProcSource};

/// Container holding application services.
pub struct ServiceContainer {
    /// Process-information source
    pub source: Arc<dyn ProcSource>,
}

impl ServiceContainer {
    /// Create a new service container reading from `settings.proc_root`.
    pub fn new(settings: &Settings) -> Self {
        let source =
            ProcFs::new(settings.proc_root.clone()).with_name_limit(settings.max_name_len);
        Self::with_deps(Arc::new(source))
    }

    /// Create a service container with a custom source (for testing).
    pub fn with_deps(source: Arc<dyn ProcSource>) -> Self {
        Self { source }
    }

    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(Arc::clone(&self.source))
    }
}
