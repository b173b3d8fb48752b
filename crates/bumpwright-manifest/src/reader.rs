use std::path::Path;

use bumpwright_core::FieldPath;

use crate::document::ManifestDocument;
use crate::error::ManifestError;

/// # Errors
///
/// Returns `ManifestError::Read` if the file cannot be read, or a parse
/// error if its contents are malformed.
pub fn read_document(path: &Path) -> Result<ManifestDocument, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    ManifestDocument::parse(path, &content)
}

/// Reads a single string field, failing if it is absent.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if the
/// field is missing or not a string.
pub fn read_field(path: &Path, field: &FieldPath) -> Result<String, ManifestError> {
    let doc = read_document(path)?;
    doc.require_str(field).map(str::to_string)
}
