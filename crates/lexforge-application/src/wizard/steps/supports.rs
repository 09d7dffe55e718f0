use super::{StepWarning, WizardStep};
use lexforge_core::contract::{ContractData, ContractPatch};
use lexforge_core::contract::catalog::is_default_support;

pub struct SupportsStep;

impl SupportsStep {
    /// The default supports cannot be unchecked.
    pub fn toggle_support(data: &ContractData, support: &str, selected: bool) -> ContractPatch {
        if !selected && is_default_support(support) {
            return ContractPatch::default();
        }
        let mut supports = data.supports.clone();
        if selected {
            supports.insert(support.to_string());
        } else {
            supports.remove(support);
        }
        ContractPatch {
            supports: Some(supports),
            ..Default::default()
        }
    }

    /// Only kept for an onerous assignment.
    pub fn set_remuneration(data: &ContractData, text: impl Into<String>) -> ContractPatch {
        if !data.type_cession.is_onerous() {
            return ContractPatch::default();
        }
        ContractPatch {
            remuneration: Some(text.into()),
            ..Default::default()
        }
    }
}

impl WizardStep for SupportsStep {
    const NUMBER: u8 = 5;
    const DESCRIPTION: &'static str = "Supports d'exploitation et rémunération";

    fn warnings(data: &ContractData) -> Vec<StepWarning> {
        if data.type_cession.is_onerous() && data.remuneration.trim().is_empty() {
            return vec![StepWarning::new(
                "remuneration",
                "Précisez la rémunération prévue pour une cession onéreuse.",
            )];
        }
        Vec::new()
    }
}
