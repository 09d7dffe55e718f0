//! REST implementation of [`ContractApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use lexforge_core::api::{
    AnalysisResult, ContractApi, DEFAULT_PDF_FILENAME, FinalizationData, GeneratedFile,
    MigrationReport, MigrationRequest, PreviewResponse, SaveContractRequest,
};
use lexforge_core::config::ApiConfig;
use lexforge_core::contract::{Contract, ContractData, ContractUpdate};
use lexforge_core::editor::ElementsResponse;
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::identity::IdentityResolver;
use lexforge_core::profile::UserProfile;

/// Header carrying the caller's identity.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Deserialize)]
#[serde(untagged)]
enum ContractList {
    Bare(Vec<Contract>),
    Wrapped { contracts: Vec<Contract> },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the LexForge backend.
///
/// The identity is resolved again for every request, so a sign-in between
/// two calls is picked up immediately.
pub struct HttpContractApi {
    client: Client,
    base_url: String,
    identity: Arc<IdentityResolver>,
}

impl HttpContractApi {
    pub fn new(config: &ApiConfig, identity: Arc<IdentityResolver>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LexforgeError::config(format!("Failed to build HTTP client: {e}")))?;
        tracing::debug!("Using API URL: {}", config.base_url);
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let identity = self.identity.current();
        self.client
            .request(method, self.url(path))
            .header(USER_ID_HEADER, identity.user_id())
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|err| {
            let err = LexforgeError::network(format!("{operation} request failed: {err}"));
            tracing::error!("Error {}: {}", operation, err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            let err = map_http_error(status, &body);
            tracing::error!("Error {}: {}", operation, err);
            return Err(err);
        }

        tracing::debug!("{} -> {}", operation, status);
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, builder).await?;
        response.json::<T>().await.map_err(|err| {
            let err = LexforgeError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to parse {operation} response: {err}"),
            };
            tracing::error!("Error {}: {}", operation, err);
            err
        })
    }

    async fn send_bytes(&self, operation: &str, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.send(operation, builder).await?;
        let bytes = response.bytes().await.map_err(|err| {
            let err = LexforgeError::network(format!("Failed to read {operation} body: {err}"));
            tracing::error!("Error {}: {}", operation, err);
            err
        })?;
        Ok(bytes.to_vec())
    }
}

fn map_http_error(status: StatusCode, body: &str) -> LexforgeError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string());
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    };
    LexforgeError::backend(status.as_u16(), message)
}

fn pdf_filename(filename: Option<&str>) -> String {
    let stem = filename
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_PDF_FILENAME);
    format!("{}.pdf", stem.trim_end_matches(".pdf"))
}

#[async_trait]
impl ContractApi for HttpContractApi {
    async fn analyze_project(&self, description: &str) -> Result<AnalysisResult> {
        let builder = self
            .request(Method::POST, "/analyze")
            .json(&json!({ "description": description }));
        self.send_json("analyzing project", builder).await
    }

    async fn preview_contract(&self, data: &ContractData) -> Result<String> {
        let builder = self.request(Method::POST, "/preview").json(data);
        let response: PreviewResponse = self.send_json("previewing contract", builder).await?;
        Ok(response.preview)
    }

    async fn generate_pdf(
        &self,
        data: &ContractData,
        filename: Option<&str>,
    ) -> Result<GeneratedFile> {
        let filename = pdf_filename(filename);
        let stem = filename.trim_end_matches(".pdf");
        let builder = self
            .request(Method::POST, "/generate-pdf")
            .json(&json!({ "contractData": data, "filename": stem }));
        let bytes = self.send_bytes("generating PDF", builder).await?;
        tracing::info!("Generated {} ({} bytes)", filename, bytes.len());
        Ok(GeneratedFile { filename, bytes })
    }

    async fn save_contract(&self, request: &SaveContractRequest) -> Result<Contract> {
        let builder = self.request(Method::POST, "/contracts").json(request);
        self.send_json("saving contract", builder).await
    }

    async fn get_contracts(&self) -> Result<Vec<Contract>> {
        let builder = self.request(Method::GET, "/contracts");
        let list: ContractList = self.send_json("fetching contracts", builder).await?;
        Ok(match list {
            ContractList::Bare(contracts) | ContractList::Wrapped { contracts } => contracts,
        })
    }

    async fn get_contract_by_id(&self, id: &str) -> Result<Contract> {
        let builder = self.request(Method::GET, &format!("/contracts/{id}"));
        self.send_json("fetching contract", builder).await
    }

    async fn get_contract_elements(&self, id: &str) -> Result<ElementsResponse> {
        let builder = self.request(Method::GET, &format!("/contracts/{id}/elements"));
        self.send_json("fetching contract elements", builder).await
    }

    async fn update_contract(&self, id: &str, update: &ContractUpdate) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("/contracts/{id}"))
            .json(update);
        self.send("updating contract", builder).await?;
        Ok(())
    }

    async fn delete_contract(&self, id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("/contracts/{id}"));
        self.send("deleting contract", builder).await?;
        Ok(())
    }

    async fn export_contract(&self, id: &str) -> Result<Vec<u8>> {
        let builder = self.request(Method::GET, &format!("/contracts/export/{id}"));
        self.send_bytes("exporting contract", builder).await
    }

    async fn import_contract(&self, filename: &str, bytes: Vec<u8>) -> Result<Contract> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| LexforgeError::invalid_import(format!("Invalid MIME type: {e}")))?;
        let builder = self
            .request(Method::POST, "/contracts/import")
            .multipart(Form::new().part("file", part));
        self.send_json("importing contract", builder).await
    }

    async fn get_finalization_data(&self, id: &str) -> Result<FinalizationData> {
        let builder = self.request(Method::GET, &format!("/contracts/{id}/finalize"));
        self.send_json("fetching finalization data", builder).await
    }

    async fn migrate_anonymous_data(&self, request: &MigrationRequest) -> Result<MigrationReport> {
        let builder = self.request(Method::POST, "/migrate-user-data").json(request);
        self.send_json("migrating anonymous data", builder).await
    }

    async fn get_user_profile(&self) -> Result<UserProfile> {
        let builder = self.request(Method::GET, "/user-profile");
        self.send_json("fetching user profile", builder).await
    }

    async fn update_user_profile(&self, profile: &UserProfile) -> Result<()> {
        let builder = self.request(Method::POST, "/user-profile").json(profile);
        self.send("updating user profile", builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexforge_core::identity::IdentityProvider;
    use lexforge_core::storage::StorageBridge;

    struct SignedIn(Option<&'static str>);

    #[async_trait]
    impl IdentityProvider for SignedIn {
        fn current_user_id(&self) -> Option<String> {
            self.0.map(str::to_string)
        }

        async fn sign_in(&self, _return_url: &str) -> Result<()> {
            Ok(())
        }
    }

    fn api(user: Option<&'static str>) -> HttpContractApi {
        let identity = Arc::new(IdentityResolver::new(
            Arc::new(SignedIn(user)),
            StorageBridge::in_memory(),
        ));
        let config = ApiConfig {
            base_url: "http://localhost:5001/api/".to_string(),
            request_timeout_secs: 5,
        };
        HttpContractApi::new(&config, identity).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = api(None);
        assert_eq!(
            api.url("/contracts/export/7"),
            "http://localhost:5001/api/contracts/export/7"
        );
    }

    #[test]
    fn test_every_request_carries_identity() {
        let request = api(Some("user_42"))
            .request(Method::GET, "/contracts")
            .build()
            .unwrap();
        assert_eq!(request.headers()[USER_ID_HEADER], "user_42");

        let anonymous = api(None)
            .request(Method::DELETE, "/contracts/1")
            .build()
            .unwrap();
        let value = anonymous.headers()[USER_ID_HEADER].to_str().unwrap();
        assert!(value.starts_with("anon_"));
    }

    #[test]
    fn test_map_http_error_prefers_error_field() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Description is required"}"#,
        );
        match err {
            LexforgeError::Backend { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Description is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_reason() {
        let err = map_http_error(StatusCode::NOT_FOUND, "");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_pdf_filename_defaults() {
        assert_eq!(pdf_filename(None), "contrat.pdf");
        assert_eq!(pdf_filename(Some("  ")), "contrat.pdf");
        assert_eq!(pdf_filename(Some("cession_dupont")), "cession_dupont.pdf");
        assert_eq!(pdf_filename(Some("final.pdf")), "final.pdf");
    }

    #[test]
    fn test_contract_list_accepts_both_shapes() {
        let bare: ContractList = serde_json::from_str(r#"[{"id": "1"}]"#).unwrap();
        let wrapped: ContractList =
            serde_json::from_str(r#"{"contracts": [{"id": "1"}, {"id": "2"}]}"#).unwrap();
        assert!(matches!(bare, ContractList::Bare(ref c) if c.len() == 1));
        assert!(matches!(wrapped, ContractList::Wrapped { ref contracts } if contracts.len() == 2));
    }
}
