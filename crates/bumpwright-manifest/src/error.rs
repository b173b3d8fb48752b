use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON at '{path}'")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML at '{path}'")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("failed to serialize JSON for '{path}'")]
    SerializeJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field '{field}' in '{path}'")]
    MissingField { path: PathBuf, field: String },

    #[error("field '{field}' in '{path}' is not a string")]
    NotAString { path: PathBuf, field: String },

    #[error("unsupported manifest format for '{path}' (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },
}
