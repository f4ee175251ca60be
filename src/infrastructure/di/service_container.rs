//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::EditorService;
use crate::config::Settings;
use crate::domain::Material;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies shared by services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Material a fresh session starts from (seeded example or empty).
    pub fn initial_material(&self) -> Material {
        if self.settings.seed_example {
            Material::seeded()
        } else {
            Material::empty()
        }
    }

    /// Editor service over `material`, formatted per settings.
    pub fn editor(&self, material: Material) -> EditorService {
        EditorService::new(Arc::clone(&self.fs), material, self.settings.indent)
    }
}
