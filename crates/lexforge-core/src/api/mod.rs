//! Backend API boundary.
//!
//! [`ContractApi`] lists every backend operation the front end relies on.
//! Implementations attach the caller's identity to each request, log
//! failures and return them unchanged; nothing is retried.

mod types;

pub use types::{
    AnalysisResult, DEFAULT_PDF_FILENAME, FinalizationData, GeneratedFile, MigrationReport,
    MigrationRequest, PreviewResponse, SaveContractRequest,
};

use crate::contract::{Contract, ContractData, ContractUpdate, Party};
use crate::editor::ElementsResponse;
use crate::error::{LexforgeError, Result};
use crate::profile::{Client, UserProfile};
use async_trait::async_trait;

#[async_trait]
pub trait ContractApi: Send + Sync {
    /// `POST /analyze`: suggests contract types for a project description.
    async fn analyze_project(&self, description: &str) -> Result<AnalysisResult>;

    /// `POST /preview`: rendered contract text.
    async fn preview_contract(&self, data: &ContractData) -> Result<String>;

    /// `POST /generate-pdf`. The file is named `<filename>.pdf`, `contrat.pdf` by default.
    async fn generate_pdf(&self, data: &ContractData, filename: Option<&str>)
    -> Result<GeneratedFile>;

    /// `POST /contracts`
    async fn save_contract(&self, request: &SaveContractRequest) -> Result<Contract>;

    /// `GET /contracts`
    async fn get_contracts(&self) -> Result<Vec<Contract>>;

    /// `GET /contracts/:id`
    async fn get_contract_by_id(&self, id: &str) -> Result<Contract>;

    /// `GET /contracts/:id/elements`
    async fn get_contract_elements(&self, id: &str) -> Result<ElementsResponse>;

    /// `PUT /contracts/:id`
    async fn update_contract(&self, id: &str, update: &ContractUpdate) -> Result<()>;

    /// `DELETE /contracts/:id`
    async fn delete_contract(&self, id: &str) -> Result<()>;

    /// `GET /contracts/export/:id`: the contract as a JSON document.
    async fn export_contract(&self, id: &str) -> Result<Vec<u8>>;

    /// `POST /contracts/import` (multipart upload of a JSON export).
    async fn import_contract(&self, filename: &str, bytes: Vec<u8>) -> Result<Contract>;

    /// `GET /contracts/:id/finalize`
    async fn get_finalization_data(&self, id: &str) -> Result<FinalizationData>;

    /// `POST /migrate-user-data`: hands anonymous data to the signed-in user.
    async fn migrate_anonymous_data(&self, request: &MigrationRequest) -> Result<MigrationReport>;

    /// `GET /user-profile`
    async fn get_user_profile(&self) -> Result<UserProfile>;

    /// `POST /user-profile`: replaces the whole document.
    async fn update_user_profile(&self, profile: &UserProfile) -> Result<()>;

    // ============================================================================
    // Address book: read-modify-write on the profile document
    // ============================================================================

    async fn get_clients(&self) -> Result<Vec<Client>> {
        Ok(self.get_user_profile().await?.clients)
    }

    async fn add_client(&self, party: Party) -> Result<Client> {
        let mut profile = self.get_user_profile().await?;
        let client = Client::new(party);
        profile.clients.push(client.clone());
        self.update_user_profile(&profile).await?;
        Ok(client)
    }

    async fn update_client(&self, client_id: &str, party: Party) -> Result<Client> {
        let mut profile = self.get_user_profile().await?;
        let slot = profile
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| LexforgeError::not_found("client", client_id))?;
        slot.party = party;
        slot.party.set_save_to_clients(false);
        let updated = slot.clone();
        self.update_user_profile(&profile).await?;
        Ok(updated)
    }

    async fn delete_client(&self, client_id: &str) -> Result<()> {
        let mut profile = self.get_user_profile().await?;
        let before = profile.clients.len();
        profile.clients.retain(|c| c.id != client_id);
        if profile.clients.len() == before {
            return Err(LexforgeError::not_found("client", client_id));
        }
        self.update_user_profile(&profile).await
    }
}
