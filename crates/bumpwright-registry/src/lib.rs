mod classify;
mod config;
mod discovery;
mod error;
mod graph;
mod registry;

pub const REGISTRY_FILE_NAME: &str = "bumpwright.toml";
pub const DEFAULT_BASE: &str = "origin/main";

pub use classify::{Classification, classify, is_source_change, normalize_change_path};
pub use config::{ManifestConfig, PackageConfig, RegistryConfig, SettingsConfig};
pub use discovery::{discover_registry, load_registry, parse_registry};
pub use error::RegistryError;
pub use graph::DependencyGraph;
pub use registry::{DependencyReference, ManifestTarget, PackageSpec, Registry, Settings};

pub type Result<T> = std::result::Result<T, RegistryError>;
