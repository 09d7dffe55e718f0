//! Caller identity.
//!
//! Exactly one identity is active at a time: the signed-in user's provider id
//! or a generated `anon_<random>` id kept in storage for the session.

use crate::error::Result;
use crate::storage::StorageBridge;
use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::sync::Arc;

pub const ANONYMOUS_PREFIX: &str = "anon_";

const ANONYMOUS_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Authenticated(String),
    Anonymous(String),
}

impl Identity {
    /// Value sent in the `X-User-Id` header.
    pub fn user_id(&self) -> &str {
        match self {
            Identity::Authenticated(id) | Identity::Anonymous(id) => id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// The hosted sign-in service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;

    /// Hands navigation over to the sign-in flow. The provider brings the
    /// user back to `return_url` once signed in.
    async fn sign_in(&self, return_url: &str) -> Result<()>;
}

fn generate_anonymous_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ANONYMOUS_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{ANONYMOUS_PREFIX}{}", suffix.to_lowercase())
}

/// Computes the active identity from the provider and storage.
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    storage: StorageBridge,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>, storage: StorageBridge) -> Self {
        Self { provider, storage }
    }

    pub fn storage(&self) -> &StorageBridge {
        &self.storage
    }

    /// Resolves the identity to use right now.
    ///
    /// A signed-in user is recorded as the last provider id; otherwise the
    /// stored anonymous id is reused, or a new one is generated and stored.
    pub fn current(&self) -> Identity {
        if let Some(id) = self.provider.current_user_id().filter(|id| !id.is_empty()) {
            if self.storage.provider_user_id().as_deref() != Some(id.as_str()) {
                if let Err(e) = self.storage.store_provider_user_id(&id) {
                    tracing::warn!("Failed to record provider user id: {}", e);
                }
            }
            return Identity::Authenticated(id);
        }
        Identity::Anonymous(self.anonymous_id())
    }

    /// The anonymous id of this session, whether or not a user is signed in.
    pub fn anonymous_id(&self) -> String {
        if let Some(id) = self
            .storage
            .anonymous_user_id()
            .filter(|id| id.starts_with(ANONYMOUS_PREFIX))
        {
            return id;
        }
        let id = generate_anonymous_id();
        tracing::info!("Generated anonymous identity {}", id);
        if let Err(e) = self.storage.store_anonymous_user_id(&id) {
            tracing::warn!("Failed to store anonymous identity: {}", e);
        }
        id
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    pub async fn sign_in(&self, return_url: &str) -> Result<()> {
        tracing::info!("Starting sign-in, return to {}", return_url);
        self.provider.sign_in(return_url).await
    }
}
