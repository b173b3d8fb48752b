/// Where the changed paths for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSelection {
    /// Paths given explicitly, relative to the project root or absolute.
    Files(Vec<String>),
    /// Paths staged in the git index.
    Staged,
    /// Paths changed since the merge base with a ref; `None` uses the
    /// registry's `default-base`.
    Baseline(Option<String>),
}

impl Default for ChangeSelection {
    fn default() -> Self {
        Self::Baseline(None)
    }
}
