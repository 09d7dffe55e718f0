use super::{StepWarning, WizardStep};
use lexforge_core::contract::{AdditionalRight, CessionMode, ContractData, ContractPatch};
use std::collections::BTreeSet;

pub struct CessionModeStep;

impl CessionModeStep {
    /// Switching to a free assignment drops the extra rights and exclusivity.
    pub fn set_mode(mode: CessionMode) -> ContractPatch {
        match mode {
            CessionMode::Free => ContractPatch {
                type_cession: Some(CessionMode::Free),
                droits_cedes: Some(BTreeSet::new()),
                exclusivite: Some(false),
                ..Default::default()
            },
            CessionMode::Onerous => ContractPatch {
                type_cession: Some(CessionMode::Onerous),
                ..Default::default()
            },
        }
    }

    /// Ignored (empty patch) while the assignment is free.
    pub fn toggle_right(data: &ContractData, right: AdditionalRight, selected: bool) -> ContractPatch {
        if !data.type_cession.is_onerous() {
            return ContractPatch::default();
        }
        let mut rights = data.droits_cedes.clone();
        if selected {
            rights.insert(right);
        } else {
            rights.remove(&right);
        }
        ContractPatch {
            droits_cedes: Some(rights),
            ..Default::default()
        }
    }

    pub fn set_exclusive(data: &ContractData, exclusive: bool) -> ContractPatch {
        if !data.type_cession.is_onerous() {
            return ContractPatch::default();
        }
        ContractPatch {
            exclusivite: Some(exclusive),
            ..Default::default()
        }
    }
}

impl WizardStep for CessionModeStep {
    const NUMBER: u8 = 2;
    const DESCRIPTION: &'static str = "Modalités de cession et droits";

    fn warnings(_data: &ContractData) -> Vec<StepWarning> {
        Vec::new()
    }
}
