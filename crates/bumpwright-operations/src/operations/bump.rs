use std::path::{Path, PathBuf};

use bumpwright_core::BumpPlan;
use bumpwright_registry::Classification;
use tracing::debug;

use super::changes::collect_changes;
use super::planner::BumpPlanner;
use super::update::{FieldEdit, ManifestUpdater, SkippedReference};
use crate::Result;
use crate::traits::{GitProvider, ManifestStore, RegistryProvider};
use crate::types::ChangeSelection;

#[derive(Debug, Clone, Default)]
pub struct BumpInput {
    pub selection: ChangeSelection,
    pub dry_run: bool,
}

/// What a bump run decided and, unless it was a dry run, what it wrote.
#[derive(Debug)]
pub struct BumpReport {
    pub classification: Classification,
    pub plan: BumpPlan,
    pub edits: Vec<FieldEdit>,
    pub skipped: Vec<SkippedReference>,
    /// Absolute paths of manifests written, in write order. Empty for dry runs.
    pub written: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum BumpOutcome {
    NoChanges,
    NoPackagesAffected {
        unmatched_count: usize,
        ignored_count: usize,
    },
    DryRun(BumpReport),
    Applied(BumpReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BumpState {
    Idle,
    Scanning,
    PlanBuilt,
    Applying,
    DryRunReported,
    Done,
}

impl BumpState {
    fn advance(&mut self, next: Self) {
        debug!(from = ?*self, to = ?next, "bump state transition");
        *self = next;
    }
}

pub struct BumpOperation<P, G, M> {
    registry_provider: P,
    git_provider: G,
    manifest_store: M,
}

impl<P, G, M> BumpOperation<P, G, M>
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

    /// Collects changes, plans every affected package, and writes the new
    /// versions unless `input.dry_run` is set.
    ///
    /// Nothing is written when planning or preparation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be loaded, git cannot be
    /// queried, a version cannot be read, or a manifest cannot be written.
    pub fn execute(&self, start_path: &Path, input: &BumpInput) -> Result<BumpOutcome> {
        let mut state = BumpState::Idle;
        let registry = self.registry_provider.load_registry(start_path)?;

        state.advance(BumpState::Scanning);
        let changes = collect_changes(&self.git_provider, &registry, &input.selection)?;
        if changes.is_empty() {
            state.advance(BumpState::Done);
            return Ok(BumpOutcome::NoChanges);
        }

        let planning = BumpPlanner::new(&registry, &self.manifest_store).plan(&changes)?;
        if planning.plan.is_empty() {
            state.advance(BumpState::Done);
            return Ok(BumpOutcome::NoPackagesAffected {
                unmatched_count: planning.classification.unmatched.len(),
                ignored_count: planning.classification.ignored.len(),
            });
        }
        state.advance(BumpState::PlanBuilt);

        let updater = ManifestUpdater::new(&self.manifest_store);
        let prepared = updater.prepare(&registry, &planning.plan)?;

        if input.dry_run {
            state.advance(BumpState::DryRunReported);
            let report = BumpReport {
                classification: planning.classification,
                plan: planning.plan,
                edits: prepared.edits,
                skipped: prepared.skipped,
                written: Vec::new(),
            };
            state.advance(BumpState::Done);
            return Ok(BumpOutcome::DryRun(report));
        }

        state.advance(BumpState::Applying);
        let written = updater.commit(&prepared)?;
        state.advance(BumpState::Done);

        Ok(BumpOutcome::Applied(BumpReport {
            classification: planning.classification,
            plan: planning.plan,
            edits: prepared.edits,
            skipped: prepared.skipped,
            written,
        }))
    }
}
