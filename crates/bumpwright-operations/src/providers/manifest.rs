use std::path::Path;

use bumpwright_manifest::ManifestDocument;

use crate::Result;
use crate::traits::ManifestStore;

pub struct FileSystemManifestStore;

impl FileSystemManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for FileSystemManifestStore {
    fn read(&self, path: &Path) -> Result<ManifestDocument> {
        Ok(bumpwright_manifest::read_document(path)?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        Ok(bumpwright_manifest::write_atomic(path, content)?)
    }
}
