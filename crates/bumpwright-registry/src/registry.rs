use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use bumpwright_core::{FieldPath, PackageId};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;

use crate::classify::normalize_relative;
use crate::config::{ManifestConfig, PackageConfig, RegistryConfig, SettingsConfig};
use crate::error::RegistryError;

/// A manifest file and the fields inside it that this tool maintains.
#[derive(Debug, Clone)]
pub struct ManifestTarget {
    path: PathBuf,
    version_field: FieldPath,
    dependencies: IndexMap<PackageId, FieldPath>,
}

impl ManifestTarget {
    /// Path relative to the project root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn version_field(&self) -> &FieldPath {
        &self.version_field
    }

    #[must_use]
    pub fn dependencies(&self) -> &IndexMap<PackageId, FieldPath> {
        &self.dependencies
    }

    #[must_use]
    pub fn dependency_field(&self, id: &str) -> Option<&FieldPath> {
        self.dependencies.get(id)
    }
}

#[derive(Debug, Clone)]
pub struct PackageSpec {
    id: PackageId,
    source_dirs: Vec<String>,
    exclude: GlobSet,
    primary: ManifestTarget,
    additional: Vec<ManifestTarget>,
    depends_on: Vec<PackageId>,
}

impl PackageSpec {
    #[must_use]
    pub fn id(&self) -> &PackageId {
        &self.id
    }

    /// Normalised source prefixes, each ending with `/`.
    #[must_use]
    pub fn source_dirs(&self) -> &[String] {
        &self.source_dirs
    }

    /// The manifest whose version field is the package's current version.
    #[must_use]
    pub fn primary_manifest(&self) -> &ManifestTarget {
        &self.primary
    }

    pub fn manifests(&self) -> impl Iterator<Item = &ManifestTarget> {
        std::iter::once(&self.primary).chain(self.additional.iter())
    }

    /// Packages this one depends on without a version field to rewrite.
    #[must_use]
    pub fn depends_on(&self) -> &[PackageId] {
        &self.depends_on
    }

    /// Expects a normalised, project-relative path.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.is_match(path)
    }

    /// Expects a normalised, project-relative path.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.source_dirs.iter().any(|dir| path.starts_with(dir.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    ignored_files: GlobSet,
    default_base: String,
    respect_manual_bumps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignored_files: GlobSet::empty(),
            default_base: crate::DEFAULT_BASE.to_string(),
            respect_manual_bumps: true,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_files.is_match(path)
    }

    #[must_use]
    pub fn default_base(&self) -> &str {
        &self.default_base
    }

    #[must_use]
    pub fn respect_manual_bumps(&self) -> bool {
        self.respect_manual_bumps
    }
}

/// A manifest field recording the version of another package.
#[derive(Debug, Clone, Copy)]
pub struct DependencyReference<'a> {
    pub owner: &'a PackageId,
    pub manifest: &'a ManifestTarget,
    pub dependency: &'a PackageId,
    pub field: &'a FieldPath,
}

/// Validated, immutable package registry for one project.
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
    settings: Settings,
    packages: IndexMap<PackageId, PackageSpec>,
}

impl Registry {
    /// Validates `config` and builds the registry rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] describing the first incomplete or
    /// inconsistent entry.
    pub fn from_config(
        root: impl Into<PathBuf>,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        if config.packages.is_empty() {
            return Err(RegistryError::NoPackages);
        }

        let mut known = HashSet::new();
        for id in config.packages.keys() {
            known.insert(parse_id(id)?);
        }

        let mut packages = IndexMap::with_capacity(config.packages.len());
        for (id, package) in config.packages {
            let id = parse_id(&id)?;
            let spec = build_package(id.clone(), package, &known)?;
            packages.insert(id, spec);
        }

        check_version_field_ownership(&packages)?;

        Ok(Self {
            root: root.into(),
            settings: build_settings(config.settings)?,
            packages,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPackage`] if `id` is not registered.
    pub fn lookup(&self, id: &str) -> Result<&PackageSpec, RegistryError> {
        self.packages
            .get(id)
            .ok_or_else(|| RegistryError::UnknownPackage {
                id: id.to_string(),
                available: self
                    .packages
                    .keys()
                    .map(PackageId::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PackageSpec> {
        self.packages.get(id)
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageSpec> {
        self.packages.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PackageId> {
        self.packages.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Position of a package in registry order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.packages.get_index_of(id)
    }

    #[must_use]
    pub fn manifest_path(&self, manifest: &ManifestTarget) -> PathBuf {
        self.root.join(&manifest.path)
    }

    /// Every dependency field declared anywhere in the registry.
    pub fn references(&self) -> impl Iterator<Item = DependencyReference<'_>> {
        self.packages.values().flat_map(|spec| {
            spec.manifests().flat_map(move |manifest| {
                manifest
                    .dependencies
                    .iter()
                    .map(move |(dependency, field)| DependencyReference {
                        owner: &spec.id,
                        manifest,
                        dependency,
                        field,
                    })
            })
        })
    }

    /// Dependency fields that record the version of `id`.
    pub fn references_to<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = DependencyReference<'a>> + 'a {
        self.references()
            .filter(move |reference| reference.dependency.as_str() == id)
    }
}

fn parse_id(id: &str) -> Result<PackageId, RegistryError> {
    PackageId::new(id).map_err(|source| RegistryError::InvalidPackageId {
        id: id.to_string(),
        source,
    })
}

fn check_reference(
    package: &PackageId,
    dependency: &str,
    known: &HashSet<PackageId>,
) -> Result<PackageId, RegistryError> {
    if dependency == package.as_str() {
        return Err(RegistryError::SelfDependency {
            package: package.to_string(),
        });
    }
    if !known.contains(dependency) {
        return Err(RegistryError::UnknownDependency {
            package: package.to_string(),
            dependency: dependency.to_string(),
        });
    }
    parse_id(dependency)
}

fn build_package(
    id: PackageId,
    config: PackageConfig,
    known: &HashSet<PackageId>,
) -> Result<PackageSpec, RegistryError> {
    if config.manifests.is_empty() {
        return Err(RegistryError::MissingManifest {
            package: id.to_string(),
        });
    }
    if config.source_dirs.is_empty() {
        return Err(RegistryError::MissingSourceDirs {
            package: id.to_string(),
        });
    }

    let source_dirs = config
        .source_dirs
        .iter()
        .map(|dir| normalize_source_dir(&id, dir))
        .collect::<Result<Vec<_>, _>>()?;

    let exclude = build_glob_set(&config.exclude)?;

    let depends_on = config
        .depends_on
        .iter()
        .map(|dep| check_reference(&id, dep, known))
        .collect::<Result<Vec<_>, _>>()?;

    let mut manifests = config
        .manifests
        .into_iter()
        .map(|manifest| build_manifest(&id, manifest, known))
        .collect::<Result<Vec<_>, _>>()?;
    let additional = manifests.split_off(1);
    let primary = manifests
        .pop()
        .ok_or_else(|| RegistryError::MissingManifest {
            package: id.to_string(),
        })?;

    Ok(PackageSpec {
        id,
        source_dirs,
        exclude,
        primary,
        additional,
        depends_on,
    })
}

fn build_manifest(
    owner: &PackageId,
    config: ManifestConfig,
    known: &HashSet<PackageId>,
) -> Result<ManifestTarget, RegistryError> {
    let mut dependencies = IndexMap::with_capacity(config.dependencies.len());
    for (dependency, field) in config.dependencies {
        let dependency = check_reference(owner, &dependency, known)?;
        dependencies.insert(dependency, field);
    }

    Ok(ManifestTarget {
        path: config.path,
        version_field: config.version_field.unwrap_or_else(FieldPath::version),
        dependencies,
    })
}

fn normalize_source_dir(package: &PackageId, dir: &str) -> Result<String, RegistryError> {
    let invalid = |reason| RegistryError::InvalidSourceDir {
        package: package.to_string(),
        dir: dir.to_string(),
        reason,
    };

    let normalized = normalize_relative(dir);
    if normalized.starts_with('/') || Path::new(dir).is_absolute() {
        return Err(invalid("must be relative to the project root"));
    }
    if normalized.split('/').any(|segment| segment == "..") {
        return Err(invalid("must not leave the project root"));
    }
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        return Err(invalid("must name a directory below the project root"));
    }

    Ok(format!("{trimmed}/"))
}

fn check_version_field_ownership(
    packages: &IndexMap<PackageId, PackageSpec>,
) -> Result<(), RegistryError> {
    let mut owners: HashMap<(&Path, &FieldPath), &PackageId> = HashMap::new();
    for spec in packages.values() {
        for manifest in spec.manifests() {
            let key = (manifest.path.as_path(), &manifest.version_field);
            if let Some(first) = owners.insert(key, &spec.id) {
                if first != &spec.id {
                    return Err(RegistryError::DuplicateVersionField {
                        path: manifest.path.clone(),
                        field: manifest.version_field.to_string(),
                        first: first.to_string(),
                        second: spec.id.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn build_settings(config: SettingsConfig) -> Result<Settings, RegistryError> {
    let defaults = Settings::default();
    Ok(Settings {
        ignored_files: build_glob_set(&config.ignored_files)?,
        default_base: config.default_base.unwrap_or(defaults.default_base),
        respect_manual_bumps: config
            .respect_manual_bumps
            .unwrap_or(defaults.respect_manual_bumps),
    })
}

pub(crate) fn build_glob_set(patterns: &[String]) -> Result<GlobSet, RegistryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| RegistryError::GlobPattern {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| RegistryError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}
