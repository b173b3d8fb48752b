use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{version}': expected major.minor.patch")]
    Parse { version: String },

    #[error("patch component of '{version}' cannot be incremented")]
    Overflow { version: String },

    #[error("dependency reference '{reference}' does not pin a version")]
    UnpinnedReference { reference: String },
}
