use std::path::PathBuf;

use bumpwright_core::ChangeSet;
use bumpwright_registry::Registry;
use tracing::debug;

use crate::Result;
use crate::traits::GitProvider;
use crate::types::ChangeSelection;

/// Resolves a selection into the set of changed paths. Explicit files are
/// taken as given and never touch git.
pub(crate) fn collect_changes<G: GitProvider>(
    git: &G,
    registry: &Registry,
    selection: &ChangeSelection,
) -> Result<ChangeSet> {
    let paths: Vec<PathBuf> = match selection {
        ChangeSelection::Files(files) => {
            return Ok(files.iter().map(String::as_str).collect());
        }
        ChangeSelection::Staged => git.staged_files(registry.root())?,
        ChangeSelection::Baseline(base) => {
            let base = base
                .as_deref()
                .unwrap_or_else(|| registry.settings().default_base());
            debug!(base, "collecting changes since baseline");
            git.files_since(registry.root(), base)?
        }
    };

    Ok(paths
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect())
}
