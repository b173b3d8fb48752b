mod git_provider;
mod manifest_store;
mod registry_provider;

pub use git_provider::GitProvider;
pub use manifest_store::ManifestStore;
pub use registry_provider::RegistryProvider;
