use bumpwright_operations::operations::{BumpInput, BumpOperation, BumpOutcome};
use bumpwright_operations::providers::{FileSystemManifestStore, Git2Provider};

use super::{BumpArgs, Context, print_no_packages_affected};
use crate::error::Result;
use crate::output::{PlainTextFormatter, ReportFormatter};

pub(crate) fn run(args: BumpArgs, context: &Context) -> Result<()> {
    let operation = BumpOperation::new(
        context.registry_provider(),
        Git2Provider::new(),
        FileSystemManifestStore::new(),
    );

    let input = BumpInput {
        selection: args.changes.into_selection(),
        dry_run: args.dry_run,
    };

    let outcome = operation.execute(&context.start_path, &input)?;

    let formatter = PlainTextFormatter::new(context.verbose);

    match outcome {
        BumpOutcome::NoChanges => println!("No files changed"),
        BumpOutcome::NoPackagesAffected {
            unmatched_count,
            ignored_count,
        } => print_no_packages_affected(unmatched_count, ignored_count),
        BumpOutcome::DryRun(report) => print!("{}", formatter.format_bump(&report, true)),
        BumpOutcome::Applied(report) => print!("{}", formatter.format_bump(&report, false)),
    }

    Ok(())
}
