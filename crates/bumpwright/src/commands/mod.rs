mod bump;
mod check;
mod validate;

use std::path::PathBuf;

use bumpwright_operations::ChangeSelection;
use bumpwright_operations::providers::FileSystemRegistryProvider;
use clap::{Args, Subcommand};

use crate::error::Result;

/// Global options shared by every subcommand.
pub(crate) struct Context {
    pub start_path: PathBuf,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl Context {
    pub(crate) fn registry_provider(&self) -> FileSystemRegistryProvider {
        match &self.config {
            Some(path) => FileSystemRegistryProvider::new().with_config_path(path.clone()),
            None => FileSystemRegistryProvider::new(),
        }
    }
}

#[derive(Args)]
pub(crate) struct ChangeArgs {
    /// Use files staged in the git index
    #[arg(long, conflicts_with = "base")]
    pub staged: bool,

    /// Compare against the merge base with this ref (default: settings.default-base)
    #[arg(long)]
    pub base: Option<String>,

    /// Changed files, relative to the project root; bypasses git
    #[arg(value_name = "FILES", conflicts_with_all = ["staged", "base"])]
    pub files: Vec<String>,
}

impl ChangeArgs {
    pub(crate) fn into_selection(self) -> ChangeSelection {
        if !self.files.is_empty() {
            ChangeSelection::Files(self.files)
        } else if self.staged {
            ChangeSelection::Staged
        } else {
            ChangeSelection::Baseline(self.base)
        }
    }
}

#[derive(Args)]
pub(crate) struct BumpArgs {
    #[command(flatten)]
    pub changes: ChangeArgs,

    /// Show what would change without writing any manifest
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub changes: ChangeArgs,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Patch-bump changed packages and everything that depends on them
    Bump(BumpArgs),
    /// Fail if changed packages have not had their versions bumped
    Check(CheckArgs),
    /// Validate the registry and print packages and dependency edges
    Validate,
}

impl Commands {
    pub(crate) fn execute(self, context: &Context) -> Result<()> {
        match self {
            Self::Bump(args) => bump::run(args, context),
            Self::Check(args) => check::run(args, context),
            Self::Validate => validate::run(context),
        }
    }
}

fn print_no_packages_affected(unmatched_count: usize, ignored_count: usize) {
    println!("No packages affected by changes");
    if unmatched_count > 0 {
        println!("  {unmatched_count} file(s) outside any package");
    }
    if ignored_count > 0 {
        println!("  {ignored_count} file(s) ignored by patterns");
    }
}
