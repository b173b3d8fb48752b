use std::collections::HashSet;

use bumpwright_core::{BumpPlan, BumpReason, ChangeSet, PackageId, VersionBump};
use bumpwright_registry::{
    Classification, DependencyGraph, PackageSpec, Registry, classify, normalize_change_path,
};
use bumpwright_version::{bump_patch, parse_core};
use indexmap::IndexMap;
use semver::Version;
use tracing::{debug, warn};

use crate::traits::ManifestStore;
use crate::{OperationError, Result};

/// Outcome of attributing a change set and computing versions.
#[derive(Debug)]
pub struct PlanningResult {
    pub classification: Classification,
    pub plan: BumpPlan,
}

/// Turns a change set into a [`BumpPlan`] without writing anything.
///
/// Every affected package has its current version read from its primary
/// manifest; the first unreadable or unparseable version aborts planning.
pub struct BumpPlanner<'a, M> {
    registry: &'a Registry,
    store: &'a M,
}

impl<'a, M> BumpPlanner<'a, M>
where
    M: ManifestStore,
{
    pub fn new(registry: &'a Registry, store: &'a M) -> Self {
        Self { registry, store }
    }

    /// # Errors
    ///
    /// Returns an error if a primary manifest cannot be read or its version
    /// field is missing or not a `major.minor.patch` version.
    pub fn plan(&self, changes: &ChangeSet) -> Result<PlanningResult> {
        let classification = classify(self.registry, changes);
        if classification.is_empty() {
            return Ok(PlanningResult {
                classification,
                plan: BumpPlan::default(),
            });
        }

        let graph = DependencyGraph::from_registry(self.registry);
        if let Some(cycle) = graph.find_cycle() {
            let members: Vec<&str> = cycle.iter().map(PackageId::as_str).collect();
            warn!(cycle = %members.join(" -> "), "dependency cycle between packages");
        }

        let direct: HashSet<&PackageId> = classification.changed_packages().collect();
        let affected = graph.transitive_dependents(classification.changed_packages());
        let changed_paths = self.normalized_paths(changes);

        let mut bumps = IndexMap::with_capacity(affected.len());
        for id in affected {
            let spec = self.registry.lookup(id.as_str())?;
            let is_direct = direct.contains(&id);
            let bump = self.plan_package(spec, is_direct, &changed_paths)?;
            debug!(
                package = %id,
                old = %bump.old_version,
                new = %bump.new_version,
                reason = %bump.reason,
                "planned version bump"
            );
            bumps.insert(id, bump);
        }

        Ok(PlanningResult {
            classification,
            plan: BumpPlan::new(bumps),
        })
    }

    fn normalized_paths(&self, changes: &ChangeSet) -> HashSet<String> {
        changes
            .iter()
            .filter_map(|raw| normalize_change_path(self.registry.root(), raw))
            .collect()
    }

    fn plan_package(
        &self,
        spec: &PackageSpec,
        is_direct: bool,
        changed_paths: &HashSet<String>,
    ) -> Result<VersionBump> {
        let manifest = spec.primary_manifest();
        let path = self.registry.manifest_path(manifest);
        let doc = self.store.read(&path)?;
        let current = doc.require_str(manifest.version_field())?;

        let version_error = |source| OperationError::VersionParse {
            package: spec.id().to_string(),
            path: path.clone(),
            source,
        };

        let old_version = Version::parse(current)
            .or_else(|_| parse_core(current))
            .map_err(version_error)?;

        if self.manually_bumped(spec, changed_paths) {
            debug!(package = %spec.id(), version = %old_version, "version file already edited");
            return Ok(VersionBump {
                new_version: old_version.clone(),
                old_version,
                reason: BumpReason::AlreadyBumped,
            });
        }

        let new_version = bump_patch(current).map_err(version_error)?;
        let reason = if is_direct {
            BumpReason::SourceChanged
        } else {
            BumpReason::DependencyChanged
        };

        Ok(VersionBump {
            old_version,
            new_version,
            reason,
        })
    }

    fn manually_bumped(&self, spec: &PackageSpec, changed_paths: &HashSet<String>) -> bool {
        if !self.registry.settings().respect_manual_bumps() {
            return false;
        }
        let manifest_path = spec.primary_manifest().path().to_string_lossy();
        normalize_change_path(self.registry.root(), &manifest_path)
            .is_some_and(|path| changed_paths.contains(&path))
    }
}
