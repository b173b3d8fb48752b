use std::path::{Path, PathBuf};

use bumpwright_git::{FileChange, GitError, Repository};
use tracing::debug;

use crate::Result;
use crate::traits::GitProvider;

const PREVIOUS_COMMIT: &str = "HEAD~1";

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

fn is_unresolvable(err: &GitError) -> bool {
    matches!(
        err,
        GitError::RefNotFound { .. } | GitError::NoMergeBase { .. }
    )
}

fn absolute_paths(repo: &Repository, changes: &[FileChange]) -> Vec<PathBuf> {
    changes
        .iter()
        .flat_map(FileChange::paths)
        .map(|path| repo.root().join(path))
        .collect()
}

impl GitProvider for Git2Provider {
    fn staged_files(&self, project_root: &Path) -> Result<Vec<PathBuf>> {
        let repo = Repository::open(project_root)?;
        let changes = repo.staged_files()?;
        Ok(absolute_paths(&repo, &changes))
    }

    /// Falls back to the previous commit and then to the staged files when
    /// `base` cannot be resolved, such as in a shallow clone without the
    /// remote branch.
    fn files_since(&self, project_root: &Path, base: &str) -> Result<Vec<PathBuf>> {
        let repo = Repository::open(project_root)?;

        let changes = match repo.changed_files_since(base) {
            Ok(changes) => changes,
            Err(err) if is_unresolvable(&err) => {
                debug!(
                    base,
                    error = %err,
                    "baseline unavailable, comparing against previous commit"
                );
                match repo.changed_files(Some(PREVIOUS_COMMIT), "HEAD") {
                    Ok(changes) => changes,
                    Err(err) if is_unresolvable(&err) => {
                        debug!(error = %err, "no previous commit, using staged files");
                        repo.staged_files()?
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Err(err) => return Err(err.into()),
        };

        Ok(absolute_paths(&repo, &changes))
    }
}
