use super::catalog::ContractType;
use super::model::ContractData;
use serde::{Deserialize, Serialize};

/// Derived readiness of a contract payload.
///
/// The four checks are independent; the final actions stay disabled until
/// all of them hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    /// At least one contract type is selected.
    pub contract_type: bool,
    /// The author carries the required fields of its variant.
    pub author_info: bool,
    /// Each selected type has its description.
    pub work_description: bool,
    /// Remuneration is present when the assignment is onerous.
    pub remuneration: bool,
}

impl Completeness {
    pub fn evaluate(data: &ContractData) -> Self {
        let work_description = (!data.has_type(ContractType::Author)
            || !data.description_oeuvre.trim().is_empty())
            && (!data.has_type(ContractType::Image) || !data.description_image.trim().is_empty());

        Self {
            contract_type: !data.type_contrat.is_empty(),
            author_info: data.author.is_complete(),
            work_description,
            remuneration: !data.type_cession.is_onerous() || !data.remuneration.trim().is_empty(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.contract_type && self.author_info && self.work_description && self.remuneration
    }

    /// French labels of the checks that do not hold, in display order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.contract_type {
            missing.push("Type de contrat");
        }
        if !self.author_info {
            missing.push("Informations sur l'auteur");
        }
        if !self.work_description {
            missing.push("Description de l'oeuvre/image");
        }
        if !self.remuneration {
            missing.push("Rémunération");
        }
        missing
    }
}
