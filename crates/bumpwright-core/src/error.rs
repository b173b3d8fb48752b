use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("package id cannot be empty")]
    EmptyPackageId,

    #[error("package id '{0}' contains whitespace")]
    InvalidPackageId(String),

    #[error("field path cannot be empty")]
    EmptyFieldPath,

    #[error("field path '{0}' contains an empty segment")]
    EmptyFieldSegment(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
