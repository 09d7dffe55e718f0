use super::{StepWarning, WizardStep};
use crate::lifecycle::{AuthRedirect, DraftLifecycle};
use lexforge_core::api::{ContractApi, FinalizationData, GeneratedFile, SaveContractRequest};
use lexforge_core::contract::{Completeness, ContractData};
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::resume::PendingAction;
use lexforge_core::route::Route;
use std::time::Duration;

/// How long the "generating PDF" notice stays up. Not a network timeout.
pub const PDF_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_CONTRACT_TITLE: &str = "Contrat de cession";

#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeOutcome {
    /// The PDF is ready to be written by the caller.
    Downloaded(GeneratedFile),
    /// A final contract was created; open it in the editor.
    OpenEditor(Route),
    /// Anonymous user: a draft was saved and sign-in started.
    SignInRequired(AuthRedirect),
}

pub struct FinalizationStep;

impl FinalizationStep {
    pub fn completeness(data: &ContractData) -> Completeness {
        Completeness::evaluate(data)
    }

    fn ensure_complete(data: &ContractData) -> Result<()> {
        let completeness = Completeness::evaluate(data);
        if completeness.is_complete() {
            return Ok(());
        }
        Err(LexforgeError::action_disabled(format!(
            "informations manquantes : {}",
            completeness.missing().join(", ")
        )))
    }

    /// "Download PDF". Anonymous users go through sign-in first.
    pub async fn download_pdf(
        data: &ContractData,
        filename: Option<&str>,
        lifecycle: &DraftLifecycle,
    ) -> Result<FinalizeOutcome> {
        Self::ensure_complete(data)?;
        if !lifecycle.identity().is_authenticated() {
            let redirect = lifecycle
                .begin_auth_redirect(data, PendingAction::DownloadPdf)
                .await?;
            return Ok(FinalizeOutcome::SignInRequired(redirect));
        }
        let file = Self::deliver_pdf(lifecycle.api(), data, filename).await?;
        Ok(FinalizeOutcome::Downloaded(file))
    }

    /// "Open in editor". Creates the final contract and routes to it.
    pub async fn open_editor(
        data: &ContractData,
        title: Option<&str>,
        lifecycle: &DraftLifecycle,
    ) -> Result<FinalizeOutcome> {
        Self::ensure_complete(data)?;
        if !lifecycle.identity().is_authenticated() {
            let redirect = lifecycle
                .begin_auth_redirect(data, PendingAction::OpenEditor)
                .await?;
            return Ok(FinalizeOutcome::SignInRequired(redirect));
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONTRACT_TITLE);
        let contract = lifecycle
            .api()
            .save_contract(&SaveContractRequest::final_from_wizard(data.clone(), title))
            .await?;
        tracing::info!("Created contract {} from the wizard", contract.id);
        Ok(FinalizeOutcome::OpenEditor(Route::Editor {
            contract_id: contract.id,
        }))
    }

    /// Generates the PDF and, when the author opted in, stores the author
    /// in the address book. A failed address-book write does not fail the
    /// download.
    pub async fn deliver_pdf(
        api: &dyn ContractApi,
        data: &ContractData,
        filename: Option<&str>,
    ) -> Result<GeneratedFile> {
        tracing::info!(
            "Generating PDF (notice shown for {}s)",
            PDF_NOTIFICATION_TIMEOUT.as_secs()
        );
        let file = api.generate_pdf(data, filename).await?;
        if data.author.save_to_clients() {
            match api.add_client(data.author.clone()).await {
                Ok(client) => tracing::info!("Author saved as client {}", client.id),
                Err(e) => tracing::warn!("Failed to save author as client: {}", e),
            }
        }
        Ok(file)
    }

    /// Loads a stored contract for re-finalization.
    pub async fn load_for_finalization(
        api: &dyn ContractApi,
        contract_id: &str,
    ) -> Result<FinalizationData> {
        api.get_finalization_data(contract_id).await
    }
}

impl WizardStep for FinalizationStep {
    const NUMBER: u8 = 6;
    const DESCRIPTION: &'static str = "Validation et génération du contrat";

    fn warnings(data: &ContractData) -> Vec<StepWarning> {
        Completeness::evaluate(data)
            .missing()
            .into_iter()
            .map(|label| StepWarning::new("completeness", label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, HexResumeCodec, complete_data, harness};
    use lexforge_core::contract::{ContractType, Party};
    use std::sync::Arc;

    fn lifecycle(h: &Harness) -> DraftLifecycle {
        DraftLifecycle::new(h.api.clone(), h.identity.clone(), Arc::new(HexResumeCodec))
    }

    #[tokio::test]
    async fn test_incomplete_data_disables_actions() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        let data = ContractData::default();

        let err = FinalizationStep::download_pdf(&data, None, &lifecycle)
            .await
            .unwrap_err();
        assert!(err.is_action_disabled());
        let err = FinalizationStep::open_editor(&data, None, &lifecycle)
            .await
            .unwrap_err();
        assert!(err.is_action_disabled());
        assert!(h.api.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_image_description_gates_completeness() {
        let mut data = complete_data();
        data.type_contrat = [ContractType::Image].into();
        assert!(!FinalizationStep::completeness(&data).work_description);

        data.description_image = "x".into();
        assert!(FinalizationStep::completeness(&data).work_description);
    }

    #[tokio::test]
    async fn test_anonymous_download_starts_sign_in() {
        let h = harness();
        let outcome = FinalizationStep::download_pdf(&complete_data(), None, &lifecycle(&h))
            .await
            .unwrap();
        assert!(matches!(outcome, FinalizeOutcome::SignInRequired(ref r) if r.action == PendingAction::DownloadPdf));
        assert_eq!(h.api.calls_to("POST /generate-pdf"), 0);
    }

    #[tokio::test]
    async fn test_signed_in_download_saves_author_when_asked() {
        let h = harness();
        h.provider.complete_sign_in("user_1");
        let mut data = complete_data();
        data.author.set_save_to_clients(true);

        let outcome = FinalizationStep::download_pdf(&data, Some("cession"), &lifecycle(&h))
            .await
            .unwrap();

        assert!(matches!(outcome, FinalizeOutcome::Downloaded(ref f) if f.filename == "cession.pdf"));
        let clients = h.api.profile.lock().unwrap().clients.clone();
        assert_eq!(clients.len(), 1);
        assert!(matches!(clients[0].party, Party::PhysicalPerson(_)));
    }

    #[tokio::test]
    async fn test_open_editor_creates_final_contract() {
        let h = harness();
        h.provider.complete_sign_in("user_1");
        let outcome = FinalizationStep::open_editor(&complete_data(), None, &lifecycle(&h))
            .await
            .unwrap();

        let saved = h.api.saved.lock().unwrap()[0].clone();
        assert!(!saved.is_draft);
        assert!(saved.from_step6);
        assert_eq!(
            outcome,
            FinalizeOutcome::OpenEditor(Route::Editor {
                contract_id: "c1".into()
            })
        );
    }
}
