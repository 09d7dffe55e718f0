use crate::contract::{ContractData, ContractType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default PDF file stem.
pub const DEFAULT_PDF_FILENAME: &str = "contrat";

/// Response of `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub contract_types: Vec<String>,
    #[serde(default)]
    pub suggestion: String,
}

impl AnalysisResult {
    /// Suggested types the wizard knows about. Unknown labels are skipped.
    pub fn suggested_types(&self) -> BTreeSet<ContractType> {
        self.contract_types
            .iter()
            .filter_map(|label| ContractType::from_label(label))
            .collect()
    }
}

/// Response of `POST /preview`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub preview: String,
}

/// A binary file returned by the backend, ready to be written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Body of `POST /contracts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveContractRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub data: ContractData,
    pub is_draft: bool,
    pub from_step6: bool,
}

impl SaveContractRequest {
    pub fn draft(data: ContractData, title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            data,
            is_draft: true,
            from_step6: false,
        }
    }

    /// A finished contract created from the last wizard step.
    pub fn final_from_wizard(data: ContractData, title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            data,
            is_draft: false,
            from_step6: true,
        }
    }
}

/// Response of `GET /contracts/:id/finalize`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinalizationData {
    #[serde(default)]
    pub form_data: ContractData,
    #[serde(default)]
    pub title: String,
}

/// Body of `POST /migrate-user-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRequest {
    pub anonymous_user_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
}

/// Outcome of an anonymous to authenticated migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MigrationReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub migrated_contracts: Vec<String>,
    /// `false` when the backend's fingerprint check rejected the handover.
    #[serde(default = "default_true", alias = "security_check")]
    pub security_check_passed: bool,
}

fn default_true() -> bool {
    true
}

impl MigrationReport {
    pub fn reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "no reason given".to_string())
    }
}
