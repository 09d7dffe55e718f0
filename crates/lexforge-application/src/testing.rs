//! In-memory doubles for the backend and the identity provider.

use async_trait::async_trait;
use lexforge_core::api::{
    AnalysisResult, ContractApi, FinalizationData, GeneratedFile, MigrationReport,
    MigrationRequest, SaveContractRequest,
};
use lexforge_core::contract::{AuthorType, Contract, ContractData, ContractType, ContractUpdate, Party};
use lexforge_core::editor::ElementsResponse;
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::identity::{IdentityProvider, IdentityResolver};
use lexforge_core::profile::UserProfile;
use lexforge_core::resume::{ResumeToken, ResumeTokenCodec};
use lexforge_core::storage::StorageBridge;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockContractApi {
    pub contracts: Mutex<BTreeMap<String, Contract>>,
    pub calls: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<SaveContractRequest>>,
    pub updates: Mutex<Vec<(String, ContractUpdate)>>,
    pub profile: Mutex<UserProfile>,
    pub elements: Mutex<ElementsResponse>,
    pub analysis: Mutex<AnalysisResult>,
    pub migration: Mutex<Option<MigrationReport>>,
    failing: Mutex<BTreeSet<&'static str>>,
    next_id: AtomicUsize,
}

impl MockContractApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every call of `operation` fail with a backend error.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn insert(&self, contract: Contract) {
        self.contracts
            .lock()
            .unwrap()
            .insert(contract.id.clone(), contract);
    }

    pub fn contract(&self, id: &str) -> Option<Contract> {
        self.contracts.lock().unwrap().get(id).cloned()
    }

    /// Number of recorded calls starting with `prefix`, e.g. `"DELETE "`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.failing.lock().unwrap().contains(operation) {
            return Err(LexforgeError::backend(500, format!("{operation} failed")));
        }
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Contract> {
        self.contract(id)
            .ok_or_else(|| LexforgeError::not_found("contract", id))
    }
}

#[async_trait]
impl ContractApi for MockContractApi {
    async fn analyze_project(&self, description: &str) -> Result<AnalysisResult> {
        self.record(format!("POST /analyze {description}"));
        self.check("analyze")?;
        Ok(self.analysis.lock().unwrap().clone())
    }

    async fn preview_contract(&self, data: &ContractData) -> Result<String> {
        self.record("POST /preview".to_string());
        self.check("preview")?;
        Ok(format!("preview:{}", data.description_oeuvre))
    }

    async fn generate_pdf(
        &self,
        _data: &ContractData,
        filename: Option<&str>,
    ) -> Result<GeneratedFile> {
        self.record("POST /generate-pdf".to_string());
        self.check("generate_pdf")?;
        Ok(GeneratedFile {
            filename: format!("{}.pdf", filename.unwrap_or("contrat")),
            bytes: b"%PDF-1.4".to_vec(),
        })
    }

    async fn save_contract(&self, request: &SaveContractRequest) -> Result<Contract> {
        self.record("POST /contracts".to_string());
        self.check("save")?;
        let id = format!("c{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let contract = Contract {
            id: id.clone(),
            title: request.title.clone(),
            data: request.data.clone(),
            is_draft: request.is_draft,
            from_step6: request.from_step6,
            created_at: "2024-05-01T10:00:00".to_string(),
            updated_at: "2024-05-01T10:00:00".to_string(),
            user_id: request.data.user_id.clone(),
        };
        self.saved.lock().unwrap().push(request.clone());
        self.insert(contract.clone());
        Ok(contract)
    }

    async fn get_contracts(&self) -> Result<Vec<Contract>> {
        self.record("GET /contracts".to_string());
        self.check("list")?;
        Ok(self.contracts.lock().unwrap().values().cloned().collect())
    }

    async fn get_contract_by_id(&self, id: &str) -> Result<Contract> {
        self.record(format!("GET /contracts/{id}"));
        self.check("get_contract")?;
        self.find(id)
    }

    async fn get_contract_elements(&self, id: &str) -> Result<ElementsResponse> {
        self.record(format!("GET /contracts/{id}/elements"));
        self.check("elements")?;
        Ok(self.elements.lock().unwrap().clone())
    }

    async fn update_contract(&self, id: &str, update: &ContractUpdate) -> Result<()> {
        self.record(format!("PUT /contracts/{id}"));
        self.check("update")?;
        let mut contracts = self.contracts.lock().unwrap();
        let contract = contracts
            .get_mut(id)
            .ok_or_else(|| LexforgeError::not_found("contract", id))?;
        if let Some(title) = &update.title {
            contract.title = title.clone();
        }
        if let Some(is_draft) = update.is_draft {
            contract.is_draft = is_draft;
        }
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), update.clone()));
        Ok(())
    }

    async fn delete_contract(&self, id: &str) -> Result<()> {
        self.record(format!("DELETE /contracts/{id}"));
        self.check("delete")?;
        self.contracts
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| LexforgeError::not_found("contract", id))
    }

    async fn export_contract(&self, id: &str) -> Result<Vec<u8>> {
        self.record(format!("GET /contracts/export/{id}"));
        self.check("export")?;
        Ok(serde_json::to_vec_pretty(&self.find(id)?)?)
    }

    async fn import_contract(&self, filename: &str, bytes: Vec<u8>) -> Result<Contract> {
        self.record(format!("POST /contracts/import {filename}"));
        self.check("import")?;
        let mut contract: Contract = serde_json::from_slice(&bytes)?;
        contract.id = format!("c{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.insert(contract.clone());
        Ok(contract)
    }

    async fn get_finalization_data(&self, id: &str) -> Result<FinalizationData> {
        self.record(format!("GET /contracts/{id}/finalize"));
        let contract = self.find(id)?;
        Ok(FinalizationData {
            form_data: contract.data,
            title: contract.title,
        })
    }

    async fn migrate_anonymous_data(&self, request: &MigrationRequest) -> Result<MigrationReport> {
        self.record("POST /migrate-user-data".to_string());
        self.check("migrate")?;
        if let Some(report) = self.migration.lock().unwrap().clone() {
            return Ok(report);
        }
        let mut migrated = Vec::new();
        for contract in self.contracts.lock().unwrap().values_mut() {
            if contract.user_id == request.anonymous_user_id {
                contract.user_id = request.user_id.clone();
                migrated.push(contract.id.clone());
            }
        }
        Ok(MigrationReport {
            success: true,
            migrated_contracts: migrated,
            security_check_passed: true,
            ..Default::default()
        })
    }

    async fn get_user_profile(&self) -> Result<UserProfile> {
        self.record("GET /user-profile".to_string());
        self.check("profile")?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.record("POST /user-profile".to_string());
        *self.profile.lock().unwrap() = profile.clone();
        Ok(())
    }
}

/// Identity provider whose sign-in only records the return URL.
#[derive(Default)]
pub struct MockIdentityProvider {
    pub user: Mutex<Option<String>>,
    pub sign_ins: Mutex<Vec<String>>,
}

impl MockIdentityProvider {
    /// Simulates the provider bringing the user back signed in.
    pub fn complete_sign_in(&self, user_id: &str) {
        *self.user.lock().unwrap() = Some(user_id.to_string());
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn current_user_id(&self) -> Option<String> {
        self.user.lock().unwrap().clone()
    }

    async fn sign_in(&self, return_url: &str) -> Result<()> {
        self.sign_ins.lock().unwrap().push(return_url.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub api: Arc<MockContractApi>,
    pub provider: Arc<MockIdentityProvider>,
    pub identity: Arc<IdentityResolver>,
    pub storage: StorageBridge,
}

pub fn harness() -> Harness {
    let api = MockContractApi::new();
    let provider = Arc::new(MockIdentityProvider::default());
    let storage = StorageBridge::in_memory();
    let identity = Arc::new(IdentityResolver::new(provider.clone(), storage.clone()));
    Harness {
        api,
        provider,
        identity,
        storage,
    }
}

/// A payload that passes every completeness check.
pub fn complete_data() -> ContractData {
    let mut author = Party::empty(AuthorType::PhysicalPerson);
    author.set_field("gentille", "Mme");
    author.set_field("nom", "Durand");
    author.set_field("prenom", "Alice");
    let mut data = ContractData {
        author,
        description_oeuvre: "Une chanson composée au piano".to_string(),
        ..Default::default()
    };
    data.type_contrat.insert(ContractType::Author);
    data
}

/// Hex-encoded JSON; URL-safe without pulling in an encoder.
pub struct HexResumeCodec;

impl ResumeTokenCodec for HexResumeCodec {
    fn encode(&self, token: &ResumeToken) -> Result<String> {
        let json = serde_json::to_vec(token)?;
        Ok(json.iter().map(|b| format!("{b:02x}")).collect())
    }

    fn decode(&self, encoded: &str) -> Result<ResumeToken> {
        if encoded.len() % 2 != 0 {
            return Err(LexforgeError::validation("odd token length"));
        }
        let bytes = (0..encoded.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&encoded[i..i + 2], 16))
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|e| LexforgeError::validation(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
