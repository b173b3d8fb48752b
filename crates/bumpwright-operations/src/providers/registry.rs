use std::path::{Path, PathBuf};

use bumpwright_registry::{Registry, discover_registry, load_registry};

use crate::Result;
use crate::traits::RegistryProvider;

/// Discovers `bumpwright.toml` upward from the start path, or loads an
/// explicit file when one is configured.
pub struct FileSystemRegistryProvider {
    config_path: Option<PathBuf>,
}

impl FileSystemRegistryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self { config_path: None }
    }

    #[must_use]
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }
}

impl Default for FileSystemRegistryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryProvider for FileSystemRegistryProvider {
    fn load_registry(&self, start_path: &Path) -> Result<Registry> {
        let registry = match &self.config_path {
            Some(path) => load_registry(path)?,
            None => discover_registry(start_path)?,
        };
        Ok(registry)
    }
}
