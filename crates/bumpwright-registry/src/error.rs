use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors. All of them are raised while the registry is being
/// built, before any change is classified.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no bumpwright.toml found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to read registry at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("registry declares no packages")]
    NoPackages,

    #[error("invalid package id '{id}'")]
    InvalidPackageId {
        id: String,
        #[source]
        source: bumpwright_core::CoreError,
    },

    #[error("unknown package '{id}' (available: {available})")]
    UnknownPackage { id: String, available: String },

    #[error("package '{package}' has manifests but no source directories")]
    MissingSourceDirs { package: String },

    #[error("package '{package}' declares no manifest holding its version")]
    MissingManifest { package: String },

    #[error("package '{package}' has invalid source directory '{dir}': {reason}")]
    InvalidSourceDir {
        package: String,
        dir: String,
        reason: &'static str,
    },

    #[error("package '{package}' references unregistered package '{dependency}'")]
    UnknownDependency { package: String, dependency: String },

    #[error("package '{package}' references itself")]
    SelfDependency { package: String },

    #[error(
        "version field '{field}' in '{path}' is claimed by both '{first}' and '{second}'"
    )]
    DuplicateVersionField {
        path: PathBuf,
        field: String,
        first: String,
        second: String,
    },

    #[error("invalid glob pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
