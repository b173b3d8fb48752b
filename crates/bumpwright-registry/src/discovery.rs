use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::Registry;
use crate::REGISTRY_FILE_NAME;

/// Walks from `start_dir` upward to the first directory holding a
/// `bumpwright.toml`, which becomes the project root.
///
/// # Errors
///
/// Returns [`RegistryError::NotFound`] if no registry file exists in any
/// ancestor, or any error raised while reading or validating it.
pub fn discover_registry(start_dir: &Path) -> Result<Registry, RegistryError> {
    let start_dir = canonical(start_dir)?;
    let config_path = find_registry_file(&start_dir)?;
    load_registry(&config_path)
}

/// Loads an explicit registry file; its parent directory is the project root.
///
/// # Errors
///
/// Returns a [`RegistryError`] if the file cannot be read or fails
/// validation.
pub fn load_registry(path: &Path) -> Result<Registry, RegistryError> {
    let path = canonical(path)?;
    let content = std::fs::read_to_string(&path).map_err(|source| RegistryError::Read {
        path: path.clone(),
        source,
    })?;
    let root = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    debug!(path = %path.display(), root = %root.display(), "loading registry");

    let config: RegistryConfig =
        toml::from_str(&content).map_err(|source| RegistryError::Parse {
            path: path.clone(),
            source,
        })?;
    Registry::from_config(root, config)
}

/// Parses registry contents already in memory.
///
/// # Errors
///
/// Returns a [`RegistryError`] if the contents are not valid TOML or fail
/// validation.
pub fn parse_registry(root: impl Into<PathBuf>, content: &str) -> Result<Registry, RegistryError> {
    let root = root.into();
    let config: RegistryConfig =
        toml::from_str(content).map_err(|source| RegistryError::Parse {
            path: root.join(REGISTRY_FILE_NAME),
            source,
        })?;
    Registry::from_config(root, config)
}

fn find_registry_file(start_dir: &Path) -> Result<PathBuf, RegistryError> {
    let mut current = Some(start_dir);

    while let Some(dir) = current {
        let candidate = dir.join(REGISTRY_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        current = dir.parent();
    }

    Err(RegistryError::NotFound {
        start_dir: start_dir.to_path_buf(),
    })
}

fn canonical(path: &Path) -> Result<PathBuf, RegistryError> {
    dunce::canonicalize(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })
}
