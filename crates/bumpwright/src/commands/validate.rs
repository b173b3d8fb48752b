use bumpwright_operations::operations::ValidateOperation;

use super::Context;
use crate::error::Result;
use crate::output::{PlainTextFormatter, ReportFormatter};

pub(crate) fn run(context: &Context) -> Result<()> {
    let operation = ValidateOperation::new(context.registry_provider());
    let output = operation.execute(&context.start_path)?;

    print!(
        "{}",
        PlainTextFormatter::new(context.verbose).format_registry(&output)
    );
    Ok(())
}
