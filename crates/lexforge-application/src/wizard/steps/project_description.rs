use super::{StepWarning, WizardStep};
use lexforge_core::api::ContractApi;
use lexforge_core::contract::{ContractData, ContractPatch, ContractType};
use lexforge_core::error::Result;
use lexforge_core::profile::EntityType;
use lexforge_core::storage::StorageBridge;

const EMPTY_DESCRIPTION: &str = "Veuillez d'abord saisir une description de votre projet.";
const ANALYSIS_FAILED: &str =
    "Une erreur est survenue lors de l'analyse. Veuillez sélectionner manuellement le type de contrat.";

/// Result of "analyze my project".
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Text shown in the suggestion box.
    pub message: String,
    /// Pre-selection of contract types, when the backend suggested any.
    pub patch: Option<ContractPatch>,
}

pub struct ProjectDescriptionStep;

impl ProjectDescriptionStep {
    pub fn set_description(text: impl Into<String>) -> ContractPatch {
        ContractPatch {
            description_oeuvre: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn toggle_type(data: &ContractData, contract_type: ContractType, selected: bool) -> ContractPatch {
        let mut types = data.type_contrat.clone();
        if selected {
            types.insert(contract_type);
        } else {
            types.remove(&contract_type);
        }
        ContractPatch {
            type_contrat: Some(types),
            ..Default::default()
        }
    }

    /// Asks the backend which contract types fit the description.
    ///
    /// An empty description is answered locally. A backend failure becomes
    /// the suggestion text; the user then picks the types by hand.
    pub async fn analyze(data: &ContractData, api: &dyn ContractApi) -> AnalysisOutcome {
        let description = data.description_oeuvre.trim();
        if description.is_empty() {
            return AnalysisOutcome {
                message: EMPTY_DESCRIPTION.to_string(),
                patch: None,
            };
        }

        match api.analyze_project(description).await {
            Ok(result) => {
                let types = result.suggested_types();
                AnalysisOutcome {
                    message: result.suggestion,
                    patch: (!types.is_empty()).then(|| ContractPatch {
                        type_contrat: Some(types),
                        ..Default::default()
                    }),
                }
            }
            Err(e) => {
                tracing::error!("Error analyzing project: {}", e);
                AnalysisOutcome {
                    message: ANALYSIS_FAILED.to_string(),
                    patch: None,
                }
            }
        }
    }

    /// Assignee variant chosen for this contract.
    pub fn business_entity(storage: &StorageBridge) -> Option<EntityType> {
        storage.selected_business_entity()
    }

    pub fn choose_business_entity(storage: &StorageBridge, entity: EntityType) -> Result<()> {
        storage.store_selected_business_entity(entity)
    }
}

impl WizardStep for ProjectDescriptionStep {
    const NUMBER: u8 = 1;
    const DESCRIPTION: &'static str = "Description du projet et type de contrat";

    fn warnings(data: &ContractData) -> Vec<StepWarning> {
        let mut warnings = Vec::new();
        if data.type_contrat.is_empty() {
            warnings.push(StepWarning::new(
                "type_contrat",
                "Sélectionnez au moins un type de contrat.",
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockContractApi;
    use lexforge_core::api::AnalysisResult;

    #[tokio::test]
    async fn test_empty_description_skips_request() {
        let api = MockContractApi::new();
        let outcome = ProjectDescriptionStep::analyze(&ContractData::default(), api.as_ref()).await;
        assert_eq!(outcome.message, EMPTY_DESCRIPTION);
        assert!(outcome.patch.is_none());
        assert_eq!(api.calls_to("POST /analyze"), 0);
    }

    #[tokio::test]
    async fn test_analysis_preselects_known_types() {
        let api = MockContractApi::new();
        *api.analysis.lock().unwrap() = AnalysisResult {
            contract_types: vec!["Image (droit à l'image)".into()],
            suggestion: "Un contrat de droit à l'image semble adapté.".into(),
        };
        let data = ContractData {
            description_oeuvre: "Des photos de mannequins".into(),
            ..Default::default()
        };

        let outcome = ProjectDescriptionStep::analyze(&data, api.as_ref()).await;
        let types = outcome.patch.unwrap().type_contrat.unwrap();
        assert_eq!(types.into_iter().collect::<Vec<_>>(), vec![ContractType::Image]);
        assert!(outcome.message.contains("droit à l'image"));
    }

    #[tokio::test]
    async fn test_analysis_failure_becomes_message() {
        let api = MockContractApi::new();
        api.fail_on("analyze");
        let data = ContractData {
            description_oeuvre: "Un logo".into(),
            ..Default::default()
        };
        let outcome = ProjectDescriptionStep::analyze(&data, api.as_ref()).await;
        assert_eq!(outcome.message, ANALYSIS_FAILED);
        assert!(outcome.patch.is_none());
    }

    #[test]
    fn test_toggle_type() {
        let mut data = ContractData::default();
        data.apply(ProjectDescriptionStep::toggle_type(&data, ContractType::Author, true));
        data.apply(ProjectDescriptionStep::toggle_type(&data, ContractType::Image, true));
        data.apply(ProjectDescriptionStep::toggle_type(&data, ContractType::Author, false));
        assert!(!data.has_type(ContractType::Author));
        assert!(data.has_type(ContractType::Image));
        assert!(ProjectDescriptionStep::warnings(&data).is_empty());
    }

    #[test]
    fn test_business_entity_choice_is_remembered() {
        let storage = StorageBridge::in_memory();
        assert_eq!(ProjectDescriptionStep::business_entity(&storage), None);
        ProjectDescriptionStep::choose_business_entity(&storage, EntityType::LegalEntity).unwrap();
        assert_eq!(
            ProjectDescriptionStep::business_entity(&storage),
            Some(EntityType::LegalEntity)
        );
    }
}
