mod arithmetic;
mod error;
mod reference;

pub use arithmetic::{bump_patch, major_minor, parse_core};
pub use error::VersionError;
pub use reference::VersionReference;

pub type Result<T> = std::result::Result<T, VersionError>;
