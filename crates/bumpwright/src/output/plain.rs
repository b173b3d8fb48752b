use bumpwright_core::{BumpPlan, BumpReason, PackageId};
use bumpwright_operations::operations::{BumpReport, EditKind, ValidateOutput};

use super::ReportFormatter;

pub(crate) struct PlainTextFormatter {
    verbose: bool,
}

impl PlainTextFormatter {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn format_plan(output: &mut String, plan: &BumpPlan) {
        let width = plan.packages().map(|id| id.as_str().len()).max().unwrap_or(0);
        for (id, bump) in plan.iter() {
            let id = id.as_str();
            if bump.reason == BumpReason::AlreadyBumped {
                output.push_str(&format!(
                    "  {id:<width$} {} ({})\n",
                    bump.new_version, bump.reason
                ));
            } else {
                output.push_str(&format!(
                    "  {id:<width$} {} -> {} ({})\n",
                    bump.old_version, bump.new_version, bump.reason
                ));
            }
        }
    }

    fn format_matched_files(output: &mut String, report: &BumpReport) {
        if report.classification.package_files.is_empty() {
            return;
        }

        output.push_str("\nChanged source files:\n");
        for (id, files) in &report.classification.package_files {
            output.push_str(&format!("  {id}:\n"));
            for file in files {
                output.push_str(&format!("    {file}\n"));
            }
        }
    }

    fn format_edits(output: &mut String, report: &BumpReport) {
        if report.edits.is_empty() {
            return;
        }

        output.push_str("\nField edits:\n");
        for edit in &report.edits {
            let origin = match &edit.kind {
                EditKind::OwnVersion => String::new(),
                EditKind::Dependency { dependency } => format!(" [{dependency}]"),
            };
            output.push_str(&format!(
                "  {} {}: {} -> {}{origin}\n",
                edit.manifest.display(),
                edit.field,
                edit.old_value,
                edit.new_value
            ));
        }
    }

    fn format_skipped(output: &mut String, report: &BumpReport) {
        if report.skipped.is_empty() {
            return;
        }

        output.push_str("\nSkipped dependency references:\n");
        for skipped in &report.skipped {
            output.push_str(&format!(
                "  {} {} ({} -> {}): {}\n",
                skipped.manifest.display(),
                skipped.field,
                skipped.owner,
                skipped.dependency,
                skipped.reason
            ));
        }
    }
}

impl ReportFormatter for PlainTextFormatter {
    fn format_bump(&self, report: &BumpReport, dry_run: bool) -> String {
        let mut output = String::new();

        if dry_run {
            output.push_str("Dry run - no manifests will be written.\n\n");
        }

        output.push_str(&format!("Version bumps ({}):\n", report.plan.len()));
        Self::format_plan(&mut output, &report.plan);

        if self.verbose {
            Self::format_matched_files(&mut output, report);
        }
        if self.verbose || dry_run {
            Self::format_edits(&mut output, report);
        }
        Self::format_skipped(&mut output, report);

        if !dry_run {
            output.push_str(&format!("\nUpdated {} manifest(s)\n", report.written.len()));
        }

        output
    }

    fn format_up_to_date(&self, plan: &BumpPlan) -> String {
        let mut output = String::from("All changed packages have bumped versions\n");
        if self.verbose {
            Self::format_plan(&mut output, plan);
        }
        output
    }

    fn format_not_bumped(&self, plan: &BumpPlan, packages: &[PackageId]) -> String {
        let mut output = String::from("Source changed but version not bumped:\n");
        for id in packages {
            match plan.get(id.as_str()) {
                Some(bump) => output.push_str(&format!(
                    "  {id} {} -> {} ({})\n",
                    bump.old_version, bump.new_version, bump.reason
                )),
                None => output.push_str(&format!("  {id}\n")),
            }
        }
        output.push_str("Run `bumpwright bump` to update them\n");
        output
    }

    fn format_registry(&self, validated: &ValidateOutput) -> String {
        let mut output = format!(
            "Registry at {} is valid: {} package(s)\n",
            validated.registry.root().display(),
            validated.registry.len()
        );

        for spec in validated.registry.packages() {
            output.push_str(&format!("\n  {}\n", spec.id()));
            if self.verbose {
                output.push_str(&format!("    sources: {}\n", spec.source_dirs().join(", ")));
            }
            for manifest in spec.manifests() {
                output.push_str(&format!(
                    "    manifest: {} ({})\n",
                    manifest.path().display(),
                    manifest.version_field()
                ));
            }
            let dependencies: Vec<&str> = validated
                .graph
                .dependencies_of(spec.id().as_str())
                .map(PackageId::as_str)
                .collect();
            if !dependencies.is_empty() {
                output.push_str(&format!("    depends on: {}\n", dependencies.join(", ")));
            }
        }

        if let Some(cycle) = &validated.cycle {
            let members: Vec<&str> = cycle.iter().map(PackageId::as_str).collect();
            output.push_str(&format!(
                "\nWarning: dependency cycle: {}\n",
                members.join(" -> ")
            ));
        }

        output
    }
}
