//! Draft and finalization lifecycle.
//!
//! ```text
//! EPHEMERAL --begin_auth_redirect--> DRAFT --finalize_draft--> FINAL
//!                                      |
//!                                      +--resume_after_auth--> DRAFT (action replayed)
//! ```
//!
//! None of the transitions rewrite a draft's payload. Only `title` and
//! `is_draft` ever change.

use crate::wizard::steps::FinalizationStep;
use chrono::{DateTime, Local};
use lexforge_core::api::{ContractApi, GeneratedFile, MigrationRequest, SaveContractRequest};
use lexforge_core::contract::{Contract, ContractData, ContractUpdate};
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::identity::IdentityResolver;
use lexforge_core::resume::{PendingAction, ResumeToken, ResumeTokenCodec};
use lexforge_core::route::{Route, WizardQuery};
use lexforge_core::storage::DraftPointer;
use std::sync::Arc;

pub const DRAFT_TITLE_PREFIX: &str = "Brouillon - ";

const DRAFT_TITLE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Title given to a draft saved before sign-in.
pub fn draft_title(now: DateTime<Local>) -> String {
    format!("{DRAFT_TITLE_PREFIX}{}", now.format(DRAFT_TITLE_FORMAT))
}

/// A sign-in redirect that was started for a saved draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRedirect {
    pub draft_id: String,
    pub action: PendingAction,
    pub return_url: String,
}

/// What the replayed action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedAction {
    Downloaded(GeneratedFile),
    OpenEditor(Route),
}

/// Result of looking for an interrupted action after sign-in.
#[derive(Debug)]
pub enum ResumeOutcome {
    /// No draft is waiting.
    Nothing,
    /// The draft's payload was recovered and the pending action replayed.
    Resumed {
        draft_id: String,
        data: ContractData,
        action: Option<PendingAction>,
        result: Option<Result<CompletedAction>>,
    },
    /// The draft could neither be fetched nor restored from the session.
    DraftUnavailable { draft_id: String },
    /// The backend refused the handover; the draft is flagged and left alone.
    SecurityAlert { draft_id: String, message: String },
}

struct PendingResume {
    draft_id: String,
    action: Option<PendingAction>,
    anonymous_user_id: Option<String>,
}

/// Drives drafts through the sign-in redirect and into their final state.
pub struct DraftLifecycle {
    api: Arc<dyn ContractApi>,
    identity: Arc<IdentityResolver>,
    codec: Arc<dyn ResumeTokenCodec>,
}

impl DraftLifecycle {
    pub fn new(
        api: Arc<dyn ContractApi>,
        identity: Arc<IdentityResolver>,
        codec: Arc<dyn ResumeTokenCodec>,
    ) -> Self {
        Self {
            api,
            identity,
            codec,
        }
    }

    pub fn api(&self) -> &dyn ContractApi {
        self.api.as_ref()
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    // ============================================================================
    // EPHEMERAL -> DRAFT
    // ============================================================================

    /// Saves `data` as a draft and hands over to the sign-in flow.
    ///
    /// The draft id and the action are written to both stores and the full
    /// payload to the session, so the action can be resumed even if the
    /// return URL loses its resume token.
    pub async fn begin_auth_redirect(
        &self,
        data: &ContractData,
        action: PendingAction,
    ) -> Result<AuthRedirect> {
        let storage = self.identity.storage();
        let title = draft_title(Local::now());

        let draft = self
            .api
            .save_contract(&SaveContractRequest::draft(data.clone(), title))
            .await?;
        tracing::info!("Saved draft {} before sign-in ({})", draft.id, action);

        storage.record_draft_pointer(&draft.id, action)?;
        storage.store_temp_contract(data)?;

        let token = ResumeToken::new(
            draft.id.clone(),
            action,
            Some(self.identity.anonymous_id()),
        );
        let return_url = WizardQuery::return_url(action, &self.codec.encode(&token)?);
        self.identity.sign_in(&return_url).await?;

        Ok(AuthRedirect {
            draft_id: draft.id,
            action,
            return_url,
        })
    }

    // ============================================================================
    // DRAFT -> DRAFT (resume)
    // ============================================================================

    /// Picks up the draft saved before sign-in and replays its action once.
    ///
    /// The resume token in `query` is authoritative; the session keys and
    /// then the persistent keys are fallbacks. Every recovery key is cleared
    /// before the action runs.
    pub async fn resume_after_auth(&self, query: &WizardQuery) -> Result<ResumeOutcome> {
        let identity = self.identity.current();
        if !identity.is_authenticated() {
            return Ok(ResumeOutcome::Nothing);
        }
        let Some(pending) = self.pending_resume(query) else {
            return Ok(ResumeOutcome::Nothing);
        };
        let storage = self.identity.storage();
        let draft_id = pending.draft_id.clone();

        if storage.has_security_alert(&draft_id) {
            tracing::warn!("Draft {} is flagged, not resuming it", draft_id);
            return Ok(ResumeOutcome::SecurityAlert {
                message: "Ce brouillon a été signalé lors d'une précédente vérification.".into(),
                draft_id,
            });
        }

        if let Some(anonymous_user_id) = pending
            .anonymous_user_id
            .filter(|anon| anon != identity.user_id())
        {
            let request = MigrationRequest {
                anonymous_user_id,
                user_id: identity.user_id().to_string(),
                draft_id: Some(draft_id.clone()),
            };
            if let Err(message) = self.migrate(&request).await {
                storage.flag_security_alert(&draft_id)?;
                tracing::warn!("Security check failed for draft {}: {}", draft_id, message);
                return Ok(ResumeOutcome::SecurityAlert { draft_id, message });
            }
        }

        let data = match self.api.get_contract_by_id(&draft_id).await {
            Ok(contract) => Some(contract.data),
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch draft {}, using the session copy: {}",
                    draft_id,
                    e
                );
                storage.temp_contract()
            }
        };
        storage.clear_recovery_keys()?;

        let Some(data) = data else {
            tracing::warn!("Draft {} could not be recovered", draft_id);
            return Ok(ResumeOutcome::DraftUnavailable { draft_id });
        };

        let result = match pending.action {
            Some(PendingAction::DownloadPdf) => Some(
                FinalizationStep::deliver_pdf(self.api.as_ref(), &data, None)
                    .await
                    .map(CompletedAction::Downloaded),
            ),
            Some(PendingAction::OpenEditor) => Some(Ok(CompletedAction::OpenEditor(
                Route::Editor {
                    contract_id: draft_id.clone(),
                },
            ))),
            None => None,
        };
        tracing::info!("Resumed draft {} ({:?})", draft_id, pending.action);

        Ok(ResumeOutcome::Resumed {
            draft_id,
            data,
            action: pending.action,
            result,
        })
    }

    fn pending_resume(&self, query: &WizardQuery) -> Option<PendingResume> {
        let storage = self.identity.storage();
        if let Some(encoded) = &query.resume {
            match self.codec.decode(encoded) {
                Ok(token) => {
                    return Some(PendingResume {
                        draft_id: token.draft_id,
                        action: Some(token.action),
                        anonymous_user_id: token
                            .anonymous_user_id
                            .or_else(|| storage.anonymous_user_id()),
                    });
                }
                Err(e) => tracing::warn!("Ignoring unreadable resume token: {}", e),
            }
        }

        let DraftPointer {
            draft_id,
            action,
            source,
        } = storage.draft_pointer()?;
        tracing::debug!("Resuming draft {} from {:?} storage", draft_id, source);
        Some(PendingResume {
            draft_id,
            action: action.or(query.action),
            anonymous_user_id: storage.anonymous_user_id(),
        })
    }

    /// Runs the handover. `Err` carries the reason of a failed security
    /// check; other failures are logged and do not block the resume.
    async fn migrate(&self, request: &MigrationRequest) -> std::result::Result<(), String> {
        match self.api.migrate_anonymous_data(request).await {
            Ok(report) if !report.security_check_passed => Err(report.reason()),
            Ok(report) if !report.success => {
                tracing::warn!("Anonymous data migration failed: {}", report.reason());
                Ok(())
            }
            Ok(report) => {
                tracing::info!(
                    "Migrated {} contracts to {}",
                    report.migrated_contracts.len(),
                    request.user_id
                );
                Ok(())
            }
            Err(LexforgeError::SecurityCheckFailed { message, .. })
            | Err(LexforgeError::Backend {
                status: 403,
                message,
            }) => Err(message),
            Err(e) => {
                tracing::warn!("Anonymous data migration failed: {}", e);
                Ok(())
            }
        }
    }

    // ============================================================================
    // DRAFT -> FINAL
    // ============================================================================

    /// Validates a draft under `title`. Only metadata is sent.
    pub async fn finalize_draft(&self, contract: &Contract, title: &str) -> Result<Contract> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LexforgeError::validation(
                "Veuillez saisir un titre pour le contrat.",
            ));
        }
        if !contract.is_draft {
            return Err(LexforgeError::invalid_transition(format!(
                "contract '{}' is already final",
                contract.id
            )));
        }

        self.api
            .update_contract(&contract.id, &ContractUpdate::finalize(title))
            .await?;
        tracing::info!("Finalized draft {} as '{}'", contract.id, title);

        Ok(Contract {
            title: title.to_string(),
            is_draft: false,
            ..contract.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, HexResumeCodec, complete_data, harness};
    use lexforge_core::api::MigrationReport;
    use lexforge_core::storage::StorageScope;
    use lexforge_core::storage::keys::{persistent, session};

    fn lifecycle(h: &Harness) -> DraftLifecycle {
        DraftLifecycle::new(h.api.clone(), h.identity.clone(), Arc::new(HexResumeCodec))
    }

    fn return_query(h: &Harness) -> WizardQuery {
        let url = h.provider.sign_ins.lock().unwrap().last().cloned().unwrap();
        WizardQuery::parse(&url)
    }

    #[test]
    fn test_draft_title_format() {
        let now = Local::now();
        let title = draft_title(now);
        assert!(title.starts_with("Brouillon - "));
        assert_eq!(title.len(), "Brouillon - ".len() + "01/02/2024 10:11:12".len());
    }

    #[tokio::test]
    async fn test_anonymous_download_round_trip() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        let mut data = complete_data();
        data.user_id = h.identity.current().user_id().to_string();

        let redirect = lifecycle
            .begin_auth_redirect(&data, PendingAction::DownloadPdf)
            .await
            .unwrap();

        let draft = h.api.contract(&redirect.draft_id).unwrap();
        assert!(draft.is_draft);
        assert!(draft.title.starts_with("Brouillon - "));
        assert_eq!(
            h.storage.read(StorageScope::Session, session::DRAFT_CONTRACT_ID),
            Some(redirect.draft_id.clone())
        );
        assert_eq!(
            h.storage
                .read(StorageScope::Persistent, persistent::LAST_DRAFT_CONTRACT_ID),
            Some(redirect.draft_id.clone())
        );
        assert_eq!(h.provider.sign_ins.lock().unwrap().len(), 1);

        h.provider.complete_sign_in("user_42");
        let outcome = lifecycle.resume_after_auth(&return_query(&h)).await.unwrap();

        match outcome {
            ResumeOutcome::Resumed {
                data: restored,
                result: Some(Ok(CompletedAction::Downloaded(file))),
                ..
            } => {
                assert_eq!(restored, data);
                assert_eq!(file.filename, "contrat.pdf");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(h.api.calls_to("POST /generate-pdf"), 1);
        assert!(h.storage.draft_pointer().is_none());
        assert!(h.storage.temp_contract().is_none());

        // Coming back to the same URL does not replay the download.
        let again = lifecycle.resume_after_auth(&WizardQuery::parse("fromDashboard=true")).await;
        assert!(matches!(again, Ok(ResumeOutcome::Nothing)));
        assert_eq!(h.api.calls_to("POST /generate-pdf"), 1);
    }

    #[tokio::test]
    async fn test_resume_falls_back_to_storage_and_legacy_payload() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        let data = complete_data();
        let redirect = lifecycle
            .begin_auth_redirect(&data, PendingAction::OpenEditor)
            .await
            .unwrap();

        h.provider.complete_sign_in("user_42");
        h.api.fail_on("get_contract");
        let query = WizardQuery::parse("fromDashboard=true&action=openEditor");
        let outcome = lifecycle.resume_after_auth(&query).await.unwrap();

        match outcome {
            ResumeOutcome::Resumed {
                draft_id,
                data: restored,
                result: Some(Ok(CompletedAction::OpenEditor(route))),
                ..
            } => {
                assert_eq!(draft_id, redirect.draft_id);
                assert_eq!(restored.description_oeuvre, data.description_oeuvre);
                assert_eq!(route.to_string(), format!("/editor/{}", redirect.draft_id));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_security_check_flags_draft() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        let redirect = lifecycle
            .begin_auth_redirect(&complete_data(), PendingAction::DownloadPdf)
            .await
            .unwrap();
        *h.api.migration.lock().unwrap() = Some(MigrationReport {
            success: false,
            error: Some("fingerprint mismatch".into()),
            security_check_passed: false,
            ..Default::default()
        });

        h.provider.complete_sign_in("user_42");
        let outcome = lifecycle.resume_after_auth(&return_query(&h)).await.unwrap();

        assert!(matches!(
            outcome,
            ResumeOutcome::SecurityAlert { ref draft_id, ref message }
                if *draft_id == redirect.draft_id && message == "fingerprint mismatch"
        ));
        assert!(h.storage.has_security_alert(&redirect.draft_id));
        assert!(
            h.storage
                .read(StorageScope::Session, session::DRAFT_CONTRACT_ID)
                .is_none()
        );
        assert_eq!(h.api.calls_to("POST /generate-pdf"), 0);

        let again = lifecycle
            .resume_after_auth(&WizardQuery::parse("fromDashboard=true"))
            .await
            .unwrap();
        assert!(matches!(again, ResumeOutcome::Nothing));
        assert!(
            h.storage
                .read(StorageScope::Persistent, persistent::LAST_DRAFT_CONTRACT_ID)
                .is_none()
        );
        assert!(h.storage.has_security_alert(&redirect.draft_id));
    }

    #[tokio::test]
    async fn test_nothing_to_resume_while_anonymous() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        lifecycle
            .begin_auth_redirect(&complete_data(), PendingAction::DownloadPdf)
            .await
            .unwrap();
        let outcome = lifecycle.resume_after_auth(&return_query(&h)).await.unwrap();
        assert!(matches!(outcome, ResumeOutcome::Nothing));
        assert!(h.storage.draft_pointer().is_some());
    }

    #[tokio::test]
    async fn test_finalize_keeps_payload() {
        let h = harness();
        let lifecycle = lifecycle(&h);
        let draft = h
            .api
            .save_contract(&SaveContractRequest::draft(complete_data(), "Brouillon - x"))
            .await
            .unwrap();
        let before = serde_json::to_vec(&h.api.contract(&draft.id).unwrap().data).unwrap();

        let finalized = lifecycle.finalize_draft(&draft, "  Cession Dupont ").await.unwrap();

        let stored = h.api.contract(&draft.id).unwrap();
        assert_eq!(serde_json::to_vec(&stored.data).unwrap(), before);
        assert_eq!(stored.title, "Cession Dupont");
        assert!(!stored.is_draft);
        assert_eq!(finalized, stored);

        let (_, update) = h.api.updates.lock().unwrap()[0].clone();
        assert_eq!(update, ContractUpdate::finalize("Cession Dupont"));

        let err = lifecycle.finalize_draft(&stored, "Encore").await.unwrap_err();
        assert!(matches!(err, LexforgeError::InvalidTransition(_)));
        let err = lifecycle.finalize_draft(&draft, "   ").await.unwrap_err();
        assert!(matches!(err, LexforgeError::Validation(_)));
    }
}
