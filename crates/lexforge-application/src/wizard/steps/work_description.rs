use super::{StepWarning, WizardStep};
use lexforge_core::contract::{ContractData, ContractPatch, ContractType};

pub struct WorkDescriptionStep;

impl WorkDescriptionStep {
    pub fn set_work_description(text: impl Into<String>) -> ContractPatch {
        ContractPatch {
            description_oeuvre: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn set_image_description(text: impl Into<String>) -> ContractPatch {
        ContractPatch {
            description_image: Some(text.into()),
            ..Default::default()
        }
    }

    /// Description fields shown for the selected contract types.
    pub fn visible_fields(data: &ContractData) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if data.has_type(ContractType::Author) {
            fields.push("description_oeuvre");
        }
        if data.has_type(ContractType::Image) {
            fields.push("description_image");
        }
        fields
    }
}

impl WizardStep for WorkDescriptionStep {
    const NUMBER: u8 = 4;
    const DESCRIPTION: &'static str = "Description détaillée de l'œuvre ou de l'image";

    fn warnings(data: &ContractData) -> Vec<StepWarning> {
        if data.type_contrat.is_empty() {
            return vec![StepWarning::new(
                "type_contrat",
                "Veuillez retourner à l'étape 1 et sélectionner au moins un type de contrat.",
            )];
        }
        let mut warnings = Vec::new();
        if data.has_type(ContractType::Author) && data.description_oeuvre.trim().is_empty() {
            warnings.push(StepWarning::new(
                "description_oeuvre",
                "Décrivez l'œuvre concernée par la cession.",
            ));
        }
        if data.has_type(ContractType::Image) && data.description_image.trim().is_empty() {
            warnings.push(StepWarning::new(
                "description_image",
                "Décrivez les images concernées par la cession.",
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_selected_types() {
        let mut data = ContractData::default();
        assert!(WorkDescriptionStep::visible_fields(&data).is_empty());
        assert_eq!(WorkDescriptionStep::warnings(&data)[0].field, "type_contrat");

        data.type_contrat.insert(ContractType::Image);
        assert_eq!(WorkDescriptionStep::visible_fields(&data), ["description_image"]);
        assert_eq!(WorkDescriptionStep::warnings(&data)[0].field, "description_image");

        data.apply(WorkDescriptionStep::set_image_description("Portraits en studio"));
        assert!(WorkDescriptionStep::warnings(&data).is_empty());
    }
}
