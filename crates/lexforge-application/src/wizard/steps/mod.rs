//! The six wizard steps.
//!
//! Each step owns a slice of [`ContractData`] and turns user input into a
//! [`ContractPatch`] for the session to merge. Steps never reject input:
//! problems are reported as [`StepWarning`]s and gating is left to the
//! finalization step's completeness checks.

mod author_info;
mod cession_mode;
mod finalization;
mod project_description;
mod supports;
mod work_description;

pub use author_info::AuthorInfoStep;
pub use cession_mode::CessionModeStep;
pub use finalization::{FinalizationStep, FinalizeOutcome, PDF_NOTIFICATION_TIMEOUT};
pub use project_description::{AnalysisOutcome, ProjectDescriptionStep};
pub use supports::SupportsStep;
pub use work_description::WorkDescriptionStep;

use lexforge_core::contract::ContractData;

/// Inline message shown next to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepWarning {
    pub field: &'static str,
    pub message: String,
}

impl StepWarning {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait WizardStep {
    /// Position in the wizard, starting at 1.
    const NUMBER: u8;
    const DESCRIPTION: &'static str;

    fn warnings(data: &ContractData) -> Vec<StepWarning>;
}

/// Warnings of the step at `number`, empty for an unknown step.
pub fn warnings_for(number: u8, data: &ContractData) -> Vec<StepWarning> {
    match number {
        ProjectDescriptionStep::NUMBER => ProjectDescriptionStep::warnings(data),
        CessionModeStep::NUMBER => CessionModeStep::warnings(data),
        AuthorInfoStep::NUMBER => AuthorInfoStep::warnings(data),
        WorkDescriptionStep::NUMBER => WorkDescriptionStep::warnings(data),
        SupportsStep::NUMBER => SupportsStep::warnings(data),
        FinalizationStep::NUMBER => FinalizationStep::warnings(data),
        _ => Vec::new(),
    }
}
