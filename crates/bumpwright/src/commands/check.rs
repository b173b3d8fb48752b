use bumpwright_operations::operations::{CheckInput, CheckOperation, CheckOutcome};
use bumpwright_operations::providers::{FileSystemManifestStore, Git2Provider};

use super::{CheckArgs, Context, print_no_packages_affected};
use crate::error::{CliError, Result};
use crate::output::{PlainTextFormatter, ReportFormatter};

pub(crate) fn run(args: CheckArgs, context: &Context) -> Result<()> {
    let operation = CheckOperation::new(
        context.registry_provider(),
        Git2Provider::new(),
        FileSystemManifestStore::new(),
    );

    let input = CheckInput {
        selection: args.changes.into_selection(),
    };

    let outcome = operation.execute(&context.start_path, &input)?;

    let formatter = PlainTextFormatter::new(context.verbose);

    match outcome {
        CheckOutcome::NoChanges => {
            println!("No files changed");
            Ok(())
        }
        CheckOutcome::NoPackagesAffected {
            unmatched_count,
            ignored_count,
        } => {
            print_no_packages_affected(unmatched_count, ignored_count);
            Ok(())
        }
        CheckOutcome::UpToDate(plan) => {
            print!("{}", formatter.format_up_to_date(&plan));
            Ok(())
        }
        CheckOutcome::VersionsNotBumped { plan, packages } => {
            eprint!("{}", formatter.format_not_bumped(&plan, &packages));
            Err(CliError::VersionsNotBumped {
                count: packages.len(),
            })
        }
    }
}
