//! Composition root: wires configuration, storage, identity and the backend.

use crate::identity::CliIdentityProvider;
use anyhow::{Context, Result};
use lexforge_application::DraftLifecycle;
use lexforge_core::config::LexforgeConfig;
use lexforge_core::identity::IdentityResolver;
use lexforge_core::storage::{MemoryStore, StorageBridge};
use lexforge_infrastructure::{
    Base64ResumeTokenCodec, ConfigService, HttpContractApi, JsonFileStore, LexforgePaths,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub config: LexforgeConfig,
    pub config_path: PathBuf,
    pub storage: StorageBridge,
    pub identity: Arc<IdentityResolver>,
    pub api: Arc<HttpContractApi>,
    pub lifecycle: DraftLifecycle,
}

impl AppContext {
    pub fn build(config_path: Option<PathBuf>, user_id: Option<String>) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::new(path),
            None => ConfigService::from_default_location()
                .context("Failed to locate the config directory")?,
        };
        let config = service
            .load()
            .with_context(|| format!("Failed to load config from {}", service.path().display()))?;

        let storage_dir = match &config.storage.dir {
            Some(dir) => dir.clone(),
            None => LexforgePaths::default_storage_dir()
                .context("Failed to locate the data directory")?,
        };
        tracing::debug!("Persistent store in {}", storage_dir.display());
        let storage = StorageBridge::new(
            Arc::new(MemoryStore::new()),
            Arc::new(JsonFileStore::in_dir(storage_dir)),
        );

        let provider = Arc::new(CliIdentityProvider::new(
            user_id,
            config.auth.sign_in_url.clone(),
        ));
        let identity = Arc::new(IdentityResolver::new(provider, storage.clone()));
        let api = Arc::new(
            HttpContractApi::new(&config.api, identity.clone())
                .context("Failed to create the API client")?,
        );
        let codec = Base64ResumeTokenCodec::new().context("Failed to set up resume tokens")?;
        let lifecycle = DraftLifecycle::new(api.clone(), identity.clone(), Arc::new(codec));

        Ok(Self {
            config,
            config_path: service.path().to_path_buf(),
            storage,
            identity,
            api,
            lifecycle,
        })
    }

    /// Mirrors a page unload: anonymous session keys are dropped.
    pub fn shutdown(&self) {
        if let Err(e) = self.storage.on_unload(self.identity.is_authenticated()) {
            tracing::warn!("Failed to clear session keys: {}", e);
        }
    }
}
