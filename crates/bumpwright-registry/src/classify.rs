use std::path::Path;

use bumpwright_core::{ChangeSet, PackageId};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::RegistryError;
use crate::registry::Registry;

/// Result of attributing a change set to packages.
///
/// This is a data transfer object with intentionally public fields for direct access.
#[derive(Debug, Default)]
pub struct Classification {
    /// Source files per package, in registry order. Packages without
    /// matching files are absent.
    pub package_files: IndexMap<PackageId, Vec<String>>,
    /// Files that belong to no package.
    pub unmatched: Vec<String>,
    /// Files matching the project-wide ignore patterns.
    pub ignored: Vec<String>,
}

impl Classification {
    pub fn changed_packages(&self) -> impl Iterator<Item = &PackageId> {
        self.package_files.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.package_files.is_empty()
    }
}

pub(crate) fn normalize_relative(raw: &str) -> String {
    let mut path = raw.replace('\\', "/");
    while let Some(stripped) = path.strip_prefix("./") {
        path = stripped.to_string();
    }
    path
}

/// Converts a changed path into the project-relative, `/`-separated form
/// used for matching. Returns `None` for absolute paths outside `root`.
#[must_use]
pub fn normalize_change_path(root: &Path, raw: &str) -> Option<String> {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        let relative = candidate.strip_prefix(root).ok()?;
        return Some(normalize_relative(&relative.to_string_lossy()));
    }
    Some(normalize_relative(raw))
}

fn matches_package(registry: &Registry, path: &str, id: &PackageId) -> bool {
    registry
        .get(id.as_str())
        .is_some_and(|spec| spec.contains_path(path) && !spec.is_excluded(path))
}

/// Whether `changed_path` is a source change for `package_id`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownPackage`] if the package is not registered.
pub fn is_source_change(
    registry: &Registry,
    changed_path: &str,
    package_id: &str,
) -> Result<bool, RegistryError> {
    let spec = registry.lookup(package_id)?;

    let Some(path) = normalize_change_path(registry.root(), changed_path) else {
        return Ok(false);
    };

    if registry.settings().is_ignored(&path) {
        return Ok(false);
    }

    Ok(matches_package(registry, &path, spec.id()))
}

/// Attributes every changed path to the packages whose sources it touches.
///
/// A path inside the source directories of several packages counts for all
/// of them.
#[must_use]
pub fn classify(registry: &Registry, changes: &ChangeSet) -> Classification {
    let mut package_files: IndexMap<PackageId, Vec<String>> = IndexMap::new();
    let mut unmatched = Vec::new();
    let mut ignored = Vec::new();

    for raw in changes.iter() {
        let Some(path) = normalize_change_path(registry.root(), raw) else {
            debug!(path = raw, "change lies outside the project root");
            unmatched.push(raw.to_string());
            continue;
        };

        if registry.settings().is_ignored(&path) {
            ignored.push(path);
            continue;
        }

        let mut matched = false;
        for id in registry.ids() {
            if matches_package(registry, &path, id) {
                package_files
                    .entry(id.clone())
                    .or_default()
                    .push(path.clone());
                matched = true;
            }
        }

        if !matched {
            unmatched.push(path);
        }
    }

    package_files.sort_by(|a, _, b, _| {
        registry
            .position(a.as_str())
            .cmp(&registry.position(b.as_str()))
    });

    Classification {
        package_files,
        unmatched,
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ManifestConfig, PackageConfig, RegistryConfig, SettingsConfig};

    fn registry() -> Registry {
        let config = RegistryConfig::default()
            .with_settings(SettingsConfig {
                ignored_files: vec!["**/*.snap".to_string()],
                ..SettingsConfig::default()
            })
            .with_package(
                "sdk",
                PackageConfig::new(["sdk/js/src/"])
                    .with_exclude("**/__fixtures__/**")
                    .with_manifest(ManifestConfig::new("sdk/js/package.json")),
            )
            .with_package(
                "cli",
                PackageConfig::new(["cli/src/"])
                    .with_manifest(ManifestConfig::new("cli/package.json")),
            )
            .with_package(
                "plugin-core",
                PackageConfig::new([
                    "plugins/core/agents/",
                    "plugins/core/commands/",
                    "plugins/core/skills/",
                    "plugins/core/config/",
                ])
                .with_manifest(ManifestConfig::new(
                    "plugins/core/.claude-plugin/plugin.json",
                )),
            );
        Registry::from_config("/repo", config).expect("valid registry")
    }

    #[test]
    fn sdk_source_file_is_source_change() {
        let registry = registry();

        let changed =
            is_source_change(&registry, "sdk/js/src/work/index.ts", "sdk").expect("sdk known");

        assert!(changed);
    }

    #[test]
    fn readme_matches_no_package() {
        let registry = registry();

        for id in ["sdk", "cli", "plugin-core"] {
            assert!(!is_source_change(&registry, "README.md", id).expect("package known"));
        }
    }

    #[test]
    fn tests_outside_source_tree_are_not_source_changes() {
        let registry = registry();

        assert!(
            !is_source_change(&registry, "sdk/js/__tests__/work.test.ts", "sdk")
                .expect("sdk known")
        );
    }

    #[test]
    fn excluded_paths_inside_source_tree_are_not_source_changes() {
        let registry = registry();

        assert!(
            !is_source_change(&registry, "sdk/js/src/__fixtures__/data.json", "sdk")
                .expect("sdk known")
        );
    }

    #[test]
    fn ignored_files_are_never_source_changes() {
        let registry = registry();

        assert!(
            !is_source_change(&registry, "cli/src/__snapshots__/out.snap", "cli")
                .expect("cli known")
        );
    }

    #[test]
    fn unknown_package_is_error() {
        let registry = registry();

        assert!(matches!(
            is_source_change(&registry, "mcp/server/src/index.ts", "mcp"),
            Err(RegistryError::UnknownPackage { .. })
        ));
    }

    #[test]
    fn normalizes_dot_slash_and_backslashes() {
        let registry = registry();

        assert!(is_source_change(&registry, "./cli/src/index.ts", "cli").expect("cli known"));
        assert!(is_source_change(&registry, "cli\\src\\index.ts", "cli").expect("cli known"));
    }

    #[test]
    fn absolute_paths_are_made_relative_to_root() {
        let registry = registry();

        assert!(is_source_change(&registry, "/repo/cli/src/index.ts", "cli").expect("cli known"));
        assert!(!is_source_change(&registry, "/other/cli/src/index.ts", "cli").expect("cli known"));
    }

    #[test]
    fn classify_groups_files_by_package() {
        let registry = registry();
        let changes: ChangeSet = [
            "plugins/core/agents/configurator.md",
            "sdk/js/src/work/index.ts",
            "README.md",
            "sdk/js/src/repo/index.ts",
            "cli/src/__snapshots__/out.snap",
        ]
        .into_iter()
        .collect();

        let classification = classify(&registry, &changes);

        let ids: Vec<_> = classification
            .changed_packages()
            .map(PackageId::as_str)
            .collect();
        assert_eq!(ids, vec!["sdk", "plugin-core"]);
        assert_eq!(classification.package_files["sdk"].len(), 2);
        assert_eq!(classification.unmatched, vec!["README.md"]);
        assert_eq!(classification.ignored, vec!["cli/src/__snapshots__/out.snap"]);
    }

    #[test]
    fn overlapping_source_dirs_fan_out_to_every_package() {
        let config = RegistryConfig::default()
            .with_package(
                "outer",
                PackageConfig::new(["shared/"]).with_manifest(ManifestConfig::new("outer.json")),
            )
            .with_package(
                "inner",
                PackageConfig::new(["shared/inner/"])
                    .with_manifest(ManifestConfig::new("inner.json")),
            );
        let registry = Registry::from_config("/repo", config).expect("valid registry");
        let changes: ChangeSet = ["shared/inner/mod.ts"].into_iter().collect();

        let classification = classify(&registry, &changes);

        assert_eq!(classification.package_files.len(), 2);
    }

    #[test]
    fn empty_change_set_classifies_nothing() {
        let classification = classify(&registry(), &ChangeSet::new());

        assert!(classification.is_empty());
        assert!(classification.unmatched.is_empty());
    }
}
