use std::path::PathBuf;

use bumpwright_core::{BumpPlan, FieldPath, PackageId};
use bumpwright_manifest::ManifestDocument;
use bumpwright_registry::{DependencyReference, Registry};
use bumpwright_version::{VersionError, VersionReference};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

use crate::traits::ManifestStore;
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    OwnVersion,
    Dependency { dependency: PackageId },
}

/// A single field rewrite inside one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub package: PackageId,
    /// Manifest path relative to the project root.
    pub manifest: PathBuf,
    pub field: FieldPath,
    pub old_value: String,
    pub new_value: String,
    pub kind: EditKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingField,
    Unpinned,
    Unparseable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingField => "field not present",
            Self::Unpinned => "reference does not pin a version",
            Self::Unparseable => "reference is not a version",
        };
        f.write_str(s)
    }
}

/// A dependency field that was declared in the registry but left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
    pub owner: PackageId,
    pub dependency: PackageId,
    pub manifest: PathBuf,
    pub field: FieldPath,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct PreparedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Every manifest rewrite for a plan, serialized but not yet written.
#[derive(Debug, Clone, Default)]
pub struct PreparedUpdate {
    pub files: Vec<PreparedFile>,
    pub edits: Vec<FieldEdit>,
    pub skipped: Vec<SkippedReference>,
}

impl PreparedUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

struct LoadedManifest {
    document: ManifestDocument,
    dirty: bool,
}

/// Applies a [`BumpPlan`] to manifests in two phases: everything is read and
/// transformed in memory first, and only then written.
pub struct ManifestUpdater<'a, M> {
    store: &'a M,
}

impl<'a, M> ManifestUpdater<'a, M>
where
    M: ManifestStore,
{
    pub fn new(store: &'a M) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns an error if a touched manifest cannot be read, parsed, or
    /// serialized, or if a planned package's version field is missing.
    pub fn prepare(&self, registry: &Registry, plan: &BumpPlan) -> Result<PreparedUpdate> {
        let mut loaded: IndexMap<PathBuf, LoadedManifest> = IndexMap::new();
        let mut edits = Vec::new();
        let mut skipped = Vec::new();

        for (id, bump) in plan.pending() {
            let spec = registry.lookup(id.as_str())?;
            let new_value = bump.new_version.to_string();

            for manifest in spec.manifests() {
                let entry = self.load(&mut loaded, registry.manifest_path(manifest))?;
                let field = manifest.version_field();
                let old_value = entry.document.require_str(field)?.to_string();

                if entry.document.set_str(field, &new_value)? {
                    entry.dirty = true;
                    edits.push(FieldEdit {
                        package: id.clone(),
                        manifest: manifest.path().to_path_buf(),
                        field: field.clone(),
                        old_value,
                        new_value: new_value.clone(),
                        kind: EditKind::OwnVersion,
                    });
                }
            }
        }

        for reference in registry.references() {
            let Some(bump) = plan.get(reference.dependency.as_str()) else {
                continue;
            };

            let entry = self.load(&mut loaded, registry.manifest_path(reference.manifest))?;
            let Some(current) = entry.document.get_str(reference.field)?.map(str::to_string)
            else {
                skipped.push(skip(&reference, SkipReason::MissingField));
                continue;
            };

            let parsed = match VersionReference::parse(&current) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let reason = match err {
                        VersionError::UnpinnedReference { .. } => SkipReason::Unpinned,
                        _ => SkipReason::Unparseable,
                    };
                    skipped.push(skip(&reference, reason));
                    continue;
                }
            };

            let new_value = parsed.with_version(&bump.new_version);
            if entry.document.set_str(reference.field, &new_value)? {
                entry.dirty = true;
                edits.push(FieldEdit {
                    package: reference.owner.clone(),
                    manifest: reference.manifest.path().to_path_buf(),
                    field: reference.field.clone(),
                    old_value: current,
                    new_value,
                    kind: EditKind::Dependency {
                        dependency: reference.dependency.clone(),
                    },
                });
            }
        }

        let mut files = Vec::new();
        for (path, entry) in loaded {
            if !entry.dirty {
                continue;
            }
            files.push(PreparedFile {
                content: entry.document.render()?,
                path,
            });
        }

        debug!(
            files = files.len(),
            edits = edits.len(),
            skipped = skipped.len(),
            "prepared manifest update"
        );

        Ok(PreparedUpdate {
            files,
            edits,
            skipped,
        })
    }

    /// Writes prepared files in order. Files written before a failure are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::PartialWrite`] naming the written files and
    /// the one that failed.
    pub fn commit(&self, prepared: &PreparedUpdate) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(prepared.files.len());

        for file in &prepared.files {
            if let Err(source) = self.store.write(&file.path, &file.content) {
                return Err(OperationError::PartialWrite {
                    written,
                    failed: file.path.clone(),
                    source: Box::new(source),
                });
            }
            debug!(path = %file.path.display(), "wrote manifest");
            written.push(file.path.clone());
        }

        Ok(written)
    }

    fn load<'m>(
        &self,
        loaded: &'m mut IndexMap<PathBuf, LoadedManifest>,
        path: PathBuf,
    ) -> Result<&'m mut LoadedManifest> {
        match loaded.entry(path) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let document = self.store.read(entry.key())?;
                Ok(entry.insert(LoadedManifest {
                    document,
                    dirty: false,
                }))
            }
        }
    }
}

fn skip(reference: &DependencyReference<'_>, reason: SkipReason) -> SkippedReference {
    warn!(
        package = %reference.owner,
        dependency = %reference.dependency,
        manifest = %reference.manifest.path().display(),
        field = %reference.field,
        %reason,
        "skipping dependency reference"
    );
    SkippedReference {
        owner: reference.owner.clone(),
        dependency: reference.dependency.clone(),
        manifest: reference.manifest.path().to_path_buf(),
        field: reference.field.clone(),
        reason,
    }
}
