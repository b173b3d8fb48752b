mod bump;
mod changes;
mod check;
mod planner;
mod update;
mod validate;

pub use bump::{BumpInput, BumpOperation, BumpOutcome, BumpReport};
pub use check::{CheckInput, CheckOperation, CheckOutcome};
pub use planner::{BumpPlanner, PlanningResult};
pub use update::{
    EditKind, FieldEdit, ManifestUpdater, PreparedFile, PreparedUpdate, SkipReason,
    SkippedReference,
};
pub use validate::{ValidateOperation, ValidateOutput};
