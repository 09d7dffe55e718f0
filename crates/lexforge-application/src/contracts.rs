//! The contracts board: listing, deletion, draft validation, export and import.

use crate::lifecycle::DraftLifecycle;
use lexforge_core::api::{ContractApi, GeneratedFile};
use lexforge_core::contract::{Contract, ContractUpdate, DraftState};
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::storage::StorageBridge;
use mime_guess::mime;
use regex::Regex;
use std::sync::Arc;

pub const EXPORT_FALLBACK_PREFIX: &str = "lexforge_contract_";
pub const EXPORT_EXTENSION: &str = ".json";

/// Default export name: the title slug, or `lexforge_contract_<id>`.
pub fn default_export_stem(contract: &Contract) -> Result<String> {
    let whitespace = Regex::new(r"\s+").map_err(|e| LexforgeError::internal(e.to_string()))?;
    let slug = whitespace
        .replace_all(contract.title.trim(), "_")
        .to_lowercase();
    if slug.is_empty() {
        Ok(fallback_stem(contract))
    } else {
        Ok(slug)
    }
}

fn fallback_stem(contract: &Contract) -> String {
    format!("{EXPORT_FALLBACK_PREFIX}{}", contract.id)
}

/// File name for an export.
///
/// Without a request the default name is used; a blank request falls back
/// to `lexforge_contract_<id>`. `.json` is always enforced.
pub fn export_filename(contract: &Contract, requested: Option<&str>) -> Result<String> {
    let stem = match requested.map(str::trim) {
        None => default_export_stem(contract)?,
        Some("") => fallback_stem(contract),
        Some(name) => name.to_string(),
    };
    if stem.to_lowercase().ends_with(EXPORT_EXTENSION) {
        Ok(stem)
    } else {
        Ok(format!("{stem}{EXPORT_EXTENSION}"))
    }
}

/// Accepts a file when its extension or its declared type is JSON.
pub fn validate_import(filename: &str, declared_type: Option<&str>) -> Result<()> {
    let declared_json = declared_type
        .and_then(|t| t.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == mime::APPLICATION_JSON.essence_str());
    let guessed_json = mime_guess::from_path(filename)
        .iter()
        .any(|m| m == mime::APPLICATION_JSON);
    if declared_json || guessed_json {
        Ok(())
    } else {
        Err(LexforgeError::invalid_import(format!(
            "'{filename}' n'est pas un fichier JSON"
        )))
    }
}

/// The signed-in user's contracts as last fetched.
pub struct ContractsBoard {
    api: Arc<dyn ContractApi>,
    contracts: Vec<Contract>,
}

impl ContractsBoard {
    pub fn new(api: Arc<dyn ContractApi>) -> Self {
        Self {
            api,
            contracts: Vec::new(),
        }
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn get(&self, id: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn by_state(&self, state: DraftState) -> impl Iterator<Item = &Contract> {
        self.contracts.iter().filter(move |c| c.state() == state)
    }

    pub async fn refresh(&mut self) -> Result<&[Contract]> {
        self.contracts = self.api.get_contracts().await?;
        tracing::debug!("Loaded {} contracts", self.contracts.len());
        Ok(&self.contracts)
    }

    fn require(&self, id: &str) -> Result<&Contract> {
        self.get(id)
            .ok_or_else(|| LexforgeError::not_found("contract", id))
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.api.delete_contract(id).await?;
        self.contracts.retain(|c| c.id != id);
        tracing::info!("Deleted contract {}", id);
        Ok(())
    }

    /// Validates a draft under a new title.
    pub async fn finalize(
        &mut self,
        id: &str,
        title: &str,
        lifecycle: &DraftLifecycle,
    ) -> Result<&Contract> {
        let finalized = lifecycle.finalize_draft(self.require(id)?, title).await?;
        self.replace(finalized)
    }

    pub async fn rename(&mut self, id: &str, title: &str) -> Result<&Contract> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LexforgeError::validation("Le titre ne peut pas être vide."));
        }
        let mut contract = self.require(id)?.clone();
        self.api
            .update_contract(id, &ContractUpdate::rename(title))
            .await?;
        contract.title = title.to_string();
        self.replace(contract)
    }

    fn replace(&mut self, contract: Contract) -> Result<&Contract> {
        let index = self
            .contracts
            .iter()
            .position(|c| c.id == contract.id)
            .ok_or_else(|| LexforgeError::not_found("contract", contract.id.clone()))?;
        self.contracts[index] = contract;
        Ok(&self.contracts[index])
    }

    /// Downloads the JSON export. `requested` is the user-chosen name.
    pub async fn export(&self, id: &str, requested: Option<&str>) -> Result<GeneratedFile> {
        let filename = export_filename(self.require(id)?, requested)?;
        let bytes = self.api.export_contract(id).await?;
        tracing::info!("Exported contract {} as {}", id, filename);
        Ok(GeneratedFile { filename, bytes })
    }

    pub async fn import(
        &mut self,
        filename: &str,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<&Contract> {
        validate_import(filename, declared_type)?;
        let contract = self.api.import_contract(filename, bytes).await?;
        tracing::info!("Imported contract {} from {}", contract.id, filename);
        self.contracts.push(contract);
        Ok(&self.contracts[self.contracts.len() - 1])
    }

    /// Drafts flagged by a failed security check, with their contract when
    /// it is still listed.
    pub fn flagged_drafts<'a>(
        &'a self,
        storage: &StorageBridge,
    ) -> Vec<(String, Option<&'a Contract>)> {
        storage
            .security_alerts()
            .into_iter()
            .map(|id| {
                let contract = self.get(&id);
                (id, contract)
            })
            .collect()
    }
}
