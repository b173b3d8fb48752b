use std::path::PathBuf;

use crate::{FileChange, FileStatus, GitError, Result};

use super::Repository;

impl Repository {
    /// Files differing between two trees. `None` as base compares against an
    /// empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either base or head cannot be resolved.
    pub fn changed_files(&self, base: Option<&str>, head: &str) -> Result<Vec<FileChange>> {
        let head_tree = self.resolve_tree(head)?;

        let base_tree = match base {
            Some(refspec) => Some(self.resolve_tree(refspec)?),
            None => None,
        };

        let diff = self
            .inner
            .diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), None)?;

        collect_changes(diff)
    }

    /// Files changed on `HEAD` since it diverged from `base`, the equivalent
    /// of `git diff base...HEAD`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if `base` cannot be resolved, or
    /// [`GitError::NoMergeBase`] if the histories share no commit.
    pub fn changed_files_since(&self, base: &str) -> Result<Vec<FileChange>> {
        let base_commit = self.resolve_commit(base)?;
        let head_commit = self.resolve_commit("HEAD")?;

        let merge_base = self
            .inner
            .merge_base(base_commit, head_commit)
            .map_err(|_| GitError::NoMergeBase {
                base: base.to_string(),
                head: "HEAD".to_string(),
            })?;

        self.changed_files(Some(&merge_base.to_string()), "HEAD")
    }

    /// Files staged in the index relative to `HEAD`. Before the first commit
    /// every staged file counts as added.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read or diffed.
    pub fn staged_files(&self) -> Result<Vec<FileChange>> {
        let head_tree = match self.inner.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(err) if err.code() == git2::ErrorCode::UnbornBranch => None,
            Err(err) => return Err(err.into()),
        };

        let index = self.inner.index()?;
        let diff = self
            .inner
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;

        collect_changes(diff)
    }

    fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_tree().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }

    fn resolve_commit(&self, refspec: &str) -> Result<git2::Oid> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_commit()
            .map(|commit| commit.id())
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })
    }
}

fn collect_changes(mut diff: git2::Diff<'_>) -> Result<Vec<FileChange>> {
    let mut find_opts = git2::DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))?;

    let mut changes = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            // A copy leaves its source untouched, so only the new path counts.
            git2::Delta::Added | git2::Delta::Copied => FileStatus::Added,
            git2::Delta::Deleted => FileStatus::Deleted,
            git2::Delta::Modified | git2::Delta::Typechange => FileStatus::Modified,
            git2::Delta::Renamed => FileStatus::Renamed,
            _ => continue,
        };

        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(PathBuf::from)
            .ok_or(GitError::MissingDeltaPath)?;

        let mut change = FileChange::new(path, status);

        if status == FileStatus::Renamed {
            if let Some(old_path) = delta.old_file().path() {
                change = change.with_old_path(old_path.to_path_buf());
            }
        }

        changes.push(change);
    }

    Ok(changes)
}
