use std::path::{Path, PathBuf};

use crate::Result;

/// Enumerates changed paths. Returned paths are absolute or relative to
/// `project_root`.
pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or the index
    /// cannot be diffed.
    fn staged_files(&self, project_root: &Path) -> Result<Vec<PathBuf>>;

    /// Files changed on `HEAD` since it diverged from `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or diffed.
    fn files_since(&self, project_root: &Path, base: &str) -> Result<Vec<PathBuf>>;
}
