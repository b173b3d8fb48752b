mod git;
mod manifest;
mod registry;

pub use git::Git2Provider;
pub use manifest::FileSystemManifestStore;
pub use registry::FileSystemRegistryProvider;
