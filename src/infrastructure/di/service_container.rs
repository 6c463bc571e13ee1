//! Service container for dependency injection
//!
//! Wires up adapters and the session with their dependencies.

use std::sync::Arc;

use crate::application::{
    AdminGate, FamilySession, JsonFileStore, Language, PersistenceAdapter, RenderOptions,
    RenderStyle, TermTreeRenderer, TextExporter,
};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Tree storage
    pub store: Arc<dyn PersistenceAdapter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let store = Arc::new(JsonFileStore::new(
            fs.clone(),
            &settings.data_dir,
            &settings.storage_key,
        ));
        Self {
            settings: Arc::new(settings),
            fs,
            store,
        }
    }

    /// Load the stored tree into a fresh read-only session.
    pub fn session(&self) -> InfraResult<FamilySession> {
        Ok(FamilySession::open(self.store.clone())?)
    }

    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.settings.admin_code.clone())
    }

    pub fn renderer(&self, style: RenderStyle, show_ids: bool) -> TermTreeRenderer {
        TermTreeRenderer::new(RenderOptions { style, show_ids })
    }

    pub fn exporter(&self) -> TextExporter {
        TextExporter::new(self.settings.export.lines_per_page)
    }

    pub fn language(&self) -> Language {
        Language::from_code(&self.settings.language)
    }
}
