use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::document::ManifestDocument;
use crate::error::ManifestError;

/// Replaces `path` with `content` through a temporary file in the same
/// directory, so readers never observe a half-written manifest. Existing
/// file permissions are carried over.
///
/// # Errors
///
/// Returns `ManifestError::Write` if the temporary file cannot be created,
/// written, or renamed into place.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ManifestError> {
    let write_err = |source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_err)?;
    }

    temp.persist(path).map_err(|err| write_err(err.error))?;
    debug!(path = %path.display(), bytes = content.len(), "manifest written");
    Ok(())
}

/// Renders `doc` and writes it back to its own path.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_document(doc: &ManifestDocument) -> Result<(), ManifestError> {
    let content = doc.render()?;
    write_atomic(doc.path(), &content)
}
