use bumpwright_core::{BumpPlan, PackageId};
use bumpwright_operations::operations::{BumpReport, ValidateOutput};

pub(crate) trait ReportFormatter {
    fn format_bump(&self, report: &BumpReport, dry_run: bool) -> String;
    fn format_up_to_date(&self, plan: &BumpPlan) -> String;
    fn format_not_bumped(&self, plan: &BumpPlan, packages: &[PackageId]) -> String;
    fn format_registry(&self, output: &ValidateOutput) -> String;
}
