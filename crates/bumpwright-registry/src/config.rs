use std::path::PathBuf;

use bumpwright_core::FieldPath;
use indexmap::IndexMap;
use serde::Deserialize;

/// Raw contents of `bumpwright.toml`, before validation.
///
/// This is a data transfer object with intentionally public fields; turn it
/// into a [`crate::Registry`] with [`crate::Registry::from_config`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub packages: IndexMap<String, PackageConfig>,
}

impl RegistryConfig {
    #[must_use]
    pub fn with_package(mut self, id: impl Into<String>, package: PackageConfig) -> Self {
        self.packages.insert(id.into(), package);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SettingsConfig) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsConfig {
    #[serde(default)]
    pub ignored_files: Vec<String>,
    pub default_base: Option<String>,
    pub respect_manual_bumps: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageConfig {
    #[serde(default)]
    pub source_dirs: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub manifests: Vec<ManifestConfig>,
}

impl PackageConfig {
    #[must_use]
    pub fn new<I, S>(source_dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_dirs: source_dirs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest: ManifestConfig) -> Self {
        self.manifests.push(manifest);
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ManifestConfig {
    pub path: PathBuf,
    pub version_field: Option<FieldPath>,
    #[serde(default)]
    pub dependencies: IndexMap<String, FieldPath>,
}

impl ManifestConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version_field: None,
            dependencies: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_version_field(mut self, field: FieldPath) -> Self {
        self.version_field = Some(field);
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, id: impl Into<String>, field: FieldPath) -> Self {
        self.dependencies.insert(id.into(), field);
        self
    }
}
