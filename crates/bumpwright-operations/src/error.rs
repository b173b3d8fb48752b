use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Registry(#[from] bumpwright_registry::RegistryError),

    #[error(transparent)]
    Git(#[from] bumpwright_git::GitError),

    #[error(transparent)]
    Manifest(#[from] bumpwright_manifest::ManifestError),

    #[error("failed to parse version of package '{package}' in '{path}'")]
    VersionParse {
        package: String,
        path: PathBuf,
        #[source]
        source: bumpwright_version::VersionError,
    },

    #[error(
        "failed to write '{}' after updating {} manifest(s); earlier writes were kept",
        failed.display(),
        written.len()
    )]
    PartialWrite {
        written: Vec<PathBuf>,
        failed: PathBuf,
        #[source]
        source: Box<OperationError>,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;
