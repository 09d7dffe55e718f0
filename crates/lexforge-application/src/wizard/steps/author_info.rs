use super::{StepWarning, WizardStep};
use lexforge_core::api::ContractApi;
use lexforge_core::contract::{AuthorType, ContractData, ContractPatch, Party};
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::profile::Client;

pub struct AuthorInfoStep;

impl AuthorInfoStep {
    /// Changing the author type starts over with a blank record.
    pub fn set_author_type(data: &ContractData, kind: AuthorType) -> ContractPatch {
        if data.author_type() == kind {
            return ContractPatch::default();
        }
        ContractPatch {
            author: Some(Party::empty(kind)),
            ..Default::default()
        }
    }

    /// Sets one field by its wire name. Unknown fields leave the data as is.
    pub fn set_field(data: &ContractData, field: &str, value: impl Into<String>) -> ContractPatch {
        let mut author = data.author.clone();
        if !author.set_field(field, value) {
            tracing::debug!("Ignoring unknown author field '{}'", field);
            return ContractPatch::default();
        }
        ContractPatch {
            author: Some(author),
            ..Default::default()
        }
    }

    pub fn set_save_to_clients(data: &ContractData, save: bool) -> ContractPatch {
        let mut author = data.author.clone();
        author.set_save_to_clients(save);
        ContractPatch {
            author: Some(author),
            ..Default::default()
        }
    }

    pub async fn load_clients(api: &dyn ContractApi) -> Result<Vec<Client>> {
        let clients = api.get_clients().await?;
        tracing::debug!("Loaded {} clients", clients.len());
        Ok(clients)
    }

    /// Replaces the author with an address-book entry.
    pub fn select_client(clients: &[Client], client_id: &str) -> Result<ContractPatch> {
        let client = clients
            .iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| LexforgeError::not_found("client", client_id))?;
        let mut author = client.party.clone();
        author.set_save_to_clients(false);
        Ok(ContractPatch {
            author: Some(author),
            ..Default::default()
        })
    }
}

impl WizardStep for AuthorInfoStep {
    const NUMBER: u8 = 3;
    const DESCRIPTION: &'static str = "Informations sur l'auteur ou le modèle";

    fn warnings(data: &ContractData) -> Vec<StepWarning> {
        if data.author.is_complete() {
            return Vec::new();
        }
        let message = match data.author_type() {
            AuthorType::PhysicalPerson => "La civilité, le nom et le prénom sont requis.",
            AuthorType::LegalEntity => "La dénomination et la forme juridique sont requises.",
        };
        vec![StepWarning::new("auteur_info", message)]
    }
}
