mod document;
mod error;
mod format;
mod reader;
mod writer;

pub use document::ManifestDocument;
pub use error::ManifestError;
pub use format::ManifestFormat;
pub use reader::{read_document, read_field};
pub use writer::{write_atomic, write_document};

pub type Result<T> = std::result::Result<T, ManifestError>;
