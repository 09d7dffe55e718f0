use super::keys::{persistent, session};
use super::store::{KeyValueStore, MemoryStore};
use crate::contract::{ContractData, Party};
use crate::error::Result;
use crate::profile::EntityType;
use crate::resume::PendingAction;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Session,
    Persistent,
}

/// Draft saved before a sign-in redirect, as recovered from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPointer {
    pub draft_id: String,
    pub action: Option<PendingAction>,
    /// Store the id was found in.
    pub source: StorageScope,
}

/// Typed access to the session and persistent stores.
///
/// Readers never fail: a missing key, an unreadable store or a malformed
/// value all mean "nothing to recover" and are logged. Writers report
/// store errors to the caller.
#[derive(Clone)]
pub struct StorageBridge {
    session: Arc<dyn KeyValueStore>,
    persistent: Arc<dyn KeyValueStore>,
}

impl StorageBridge {
    pub fn new(session: Arc<dyn KeyValueStore>, persistent: Arc<dyn KeyValueStore>) -> Self {
        Self {
            session,
            persistent,
        }
    }

    /// Both scopes kept in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn store(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Session => self.session.as_ref(),
            StorageScope::Persistent => self.persistent.as_ref(),
        }
    }

    // ============================================================================
    // Raw access
    // ============================================================================

    pub fn read(&self, scope: StorageScope, key: &str) -> Option<String> {
        match self.store(scope).get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read {:?} key '{}': {}", scope, key, e);
                None
            }
        }
    }

    pub fn write(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        self.store(scope).set(key, value)
    }

    pub fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        self.store(scope).remove(key)
    }

    pub fn read_json<T: DeserializeOwned>(&self, scope: StorageScope, key: &str) -> Option<T> {
        let raw = self.read(scope, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring malformed {:?} key '{}': {}", scope, key, e);
                None
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, scope: StorageScope, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.write(scope, key, &raw)
    }

    // ============================================================================
    // Draft recovery
    // ============================================================================

    /// Records the draft and the pending action in both scopes.
    pub fn record_draft_pointer(&self, draft_id: &str, action: PendingAction) -> Result<()> {
        self.write(StorageScope::Session, session::DRAFT_CONTRACT_ID, draft_id)?;
        self.write(StorageScope::Persistent, persistent::LAST_DRAFT_CONTRACT_ID, draft_id)?;
        self.write(StorageScope::Session, session::AUTH_REDIRECT_ACTION, action.as_str())?;
        self.write(
            StorageScope::Persistent,
            persistent::LAST_AUTH_REDIRECT_ACTION,
            action.as_str(),
        )?;
        Ok(())
    }

    /// Session keys first, persistent keys as fallback.
    pub fn draft_pointer(&self) -> Option<DraftPointer> {
        let lookups = [
            (
                StorageScope::Session,
                session::DRAFT_CONTRACT_ID,
                session::AUTH_REDIRECT_ACTION,
            ),
            (
                StorageScope::Persistent,
                persistent::LAST_DRAFT_CONTRACT_ID,
                persistent::LAST_AUTH_REDIRECT_ACTION,
            ),
        ];

        lookups.into_iter().find_map(|(scope, id_key, action_key)| {
            let draft_id = self.read(scope, id_key)?;
            let action = self.read(scope, action_key).and_then(|raw| {
                let parsed = PendingAction::parse(&raw);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unknown redirect action '{}'", raw);
                }
                parsed
            });
            Some(DraftPointer {
                draft_id,
                action,
                source: scope,
            })
        })
    }

    pub fn store_temp_contract(&self, data: &ContractData) -> Result<()> {
        self.write_json(StorageScope::Session, session::TEMP_CONTRACT_DATA, data)
    }

    pub fn temp_contract(&self) -> Option<ContractData> {
        self.read_json(StorageScope::Session, session::TEMP_CONTRACT_DATA)
    }

    /// Drops every key used to survive the sign-in redirect.
    pub fn clear_recovery_keys(&self) -> Result<()> {
        self.session.remove_many(&[
            session::DRAFT_CONTRACT_ID,
            session::AUTH_REDIRECT_ACTION,
            session::TEMP_CONTRACT_DATA,
        ])?;
        self.persistent.remove_many(&[
            persistent::LAST_DRAFT_CONTRACT_ID,
            persistent::LAST_AUTH_REDIRECT_ACTION,
        ])?;
        Ok(())
    }

    // ============================================================================
    // Security alerts
    // ============================================================================

    /// Marks the draft suspect and forgets every pointer to it, so it is only
    /// reachable from the contracts list.
    pub fn flag_security_alert(&self, draft_id: &str) -> Result<()> {
        self.write(
            StorageScope::Persistent,
            &persistent::security_alert(draft_id),
            "true",
        )?;
        self.session.remove_many(&[
            session::DRAFT_CONTRACT_ID,
            session::AUTH_REDIRECT_ACTION,
        ])?;
        self.persistent.remove_many(&[
            persistent::LAST_DRAFT_CONTRACT_ID,
            persistent::LAST_AUTH_REDIRECT_ACTION,
        ])?;
        Ok(())
    }

    pub fn has_security_alert(&self, draft_id: &str) -> bool {
        self.read(StorageScope::Persistent, &persistent::security_alert(draft_id))
            .is_some()
    }

    /// Ids of every draft currently flagged.
    pub fn security_alerts(&self) -> Vec<String> {
        match self.persistent.keys() {
            Ok(keys) => keys
                .iter()
                .filter_map(|k| persistent::security_alert_draft_id(k))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to list persistent keys: {}", e);
                Vec::new()
            }
        }
    }

    pub fn dismiss_security_alert(&self, draft_id: &str) -> Result<()> {
        self.remove(StorageScope::Persistent, &persistent::security_alert(draft_id))
    }

    // ============================================================================
    // Identity keys
    // ============================================================================

    pub fn anonymous_user_id(&self) -> Option<String> {
        self.read(StorageScope::Session, session::ANONYMOUS_USER_ID)
            .or_else(|| self.read(StorageScope::Persistent, persistent::ANONYMOUS_USER_ID))
    }

    pub fn store_anonymous_user_id(&self, id: &str) -> Result<()> {
        self.write(StorageScope::Session, session::ANONYMOUS_USER_ID, id)?;
        self.write(StorageScope::Persistent, persistent::ANONYMOUS_USER_ID, id)
    }

    pub fn provider_user_id(&self) -> Option<String> {
        self.read(StorageScope::Persistent, persistent::CLERK_USER_ID)
    }

    pub fn store_provider_user_id(&self, id: &str) -> Result<()> {
        self.write(StorageScope::Persistent, persistent::CLERK_USER_ID, id)
    }

    // ============================================================================
    // Assignee selection
    // ============================================================================

    pub fn selected_business_entity(&self) -> Option<EntityType> {
        self.read_json(StorageScope::Session, session::BUSINESS_INFO)
    }

    pub fn store_selected_business_entity(&self, entity: EntityType) -> Result<()> {
        self.write_json(StorageScope::Session, session::BUSINESS_INFO, &entity)
    }

    /// Assignee details entered by an anonymous user.
    pub fn temp_business_info(&self) -> Option<Party> {
        self.read_json(StorageScope::Session, session::TEMP_BUSINESS_INFO)
    }

    pub fn store_temp_business_info(&self, party: &Party) -> Result<()> {
        self.write_json(StorageScope::Session, session::TEMP_BUSINESS_INFO, party)
    }

    // ============================================================================
    // Cleanup
    // ============================================================================

    /// Page-unload hook: anonymous sessions leave no temporary keys behind.
    pub fn on_unload(&self, authenticated: bool) -> Result<()> {
        if authenticated {
            return Ok(());
        }
        tracing::debug!("Clearing anonymous session keys on unload");
        self.session.remove_many(&session::TEMPORARY)
    }

    /// Clears the temporary assignee and draft keys, keeping the anonymous id.
    pub fn clear_temp_business_info(&self) -> Result<()> {
        self.session.remove_many(&[
            session::TEMP_BUSINESS_INFO,
            session::TEMP_CONTRACT_DATA,
            session::DRAFT_CONTRACT_ID,
            session::AUTH_REDIRECT_ACTION,
        ])
    }

    /// Like [`Self::clear_temp_business_info`], and also forgets the session's
    /// anonymous id unless a real provider id is stored.
    pub fn clear_all_temp_data(&self) -> Result<()> {
        self.clear_temp_business_info()?;
        let signed_in = self
            .provider_user_id()
            .is_some_and(|id| !id.starts_with(crate::identity::ANONYMOUS_PREFIX));
        if !signed_in {
            self.remove(StorageScope::Session, session::ANONYMOUS_USER_ID)?;
        }
        Ok(())
    }
}
