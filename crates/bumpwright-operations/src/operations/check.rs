use std::path::Path;

use bumpwright_core::{BumpPlan, BumpReason, PackageId};

use super::changes::collect_changes;
use super::planner::BumpPlanner;
use crate::Result;
use crate::traits::{GitProvider, ManifestStore, RegistryProvider};
use crate::types::ChangeSelection;

#[derive(Debug, Clone, Default)]
pub struct CheckInput {
    pub selection: ChangeSelection,
}

#[derive(Debug)]
pub enum CheckOutcome {
    NoChanges,
    NoPackagesAffected {
        unmatched_count: usize,
        ignored_count: usize,
    },
    /// Every changed package already carries a hand-edited version.
    UpToDate(BumpPlan),
    /// Packages whose sources or dependencies changed without a version edit.
    VersionsNotBumped {
        plan: BumpPlan,
        packages: Vec<PackageId>,
    },
}

impl CheckOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::VersionsNotBumped { .. })
    }
}

/// Plans like a bump but never writes; used as a CI gate.
pub struct CheckOperation<P, G, M> {
    registry_provider: P,
    git_provider: G,
    manifest_store: M,
}

impl<P, G, M> CheckOperation<P, G, M>
where
    P: RegistryProvider,
    G: GitProvider,
    M: ManifestStore,
{
    pub fn new(registry_provider: P, git_provider: G, manifest_store: M) -> Self {
        Self {
            registry_provider,
            git_provider,
            manifest_store,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the registry cannot be loaded, git cannot be
    /// queried, or a version cannot be read.
    pub fn execute(&self, start_path: &Path, input: &CheckInput) -> Result<CheckOutcome> {
        let registry = self.registry_provider.load_registry(start_path)?;
        let changes = collect_changes(&self.git_provider, &registry, &input.selection)?;
        if changes.is_empty() {
            return Ok(CheckOutcome::NoChanges);
        }

        let planning = BumpPlanner::new(&registry, &self.manifest_store).plan(&changes)?;
        if planning.plan.is_empty() {
            return Ok(CheckOutcome::NoPackagesAffected {
                unmatched_count: planning.classification.unmatched.len(),
                ignored_count: planning.classification.ignored.len(),
            });
        }

        let packages: Vec<PackageId> = planning
            .plan
            .iter()
            .filter(|(_, bump)| bump.reason != BumpReason::AlreadyBumped)
            .map(|(id, _)| id.clone())
            .collect();

        if packages.is_empty() {
            Ok(CheckOutcome::UpToDate(planning.plan))
        } else {
            Ok(CheckOutcome::VersionsNotBumped {
                plan: planning.plan,
                packages,
            })
        }
    }
}
