use std::path::Path;

use bumpwright_manifest::ManifestDocument;

use crate::Result;

pub trait ManifestStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    fn read(&self, path: &Path) -> Result<ManifestDocument>;

    /// Replaces the manifest at `path` with `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}
