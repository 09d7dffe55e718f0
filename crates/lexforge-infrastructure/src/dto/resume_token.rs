//! Resume token DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: draft id and pending action
//! - **1.1.0**: adds the anonymous owner and the issue time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, MigrationError, Versioned};

use lexforge_core::resume::{PendingAction, ResumeToken};

pub const RESUME_TOKEN_ENTITY: &str = "resume_token";

/// Resume token V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ResumeTokenV1_0_0 {
    pub draft_id: String,
    pub action: PendingAction,
}

/// Resume token V1.1.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct ResumeTokenV1_1_0 {
    pub draft_id: String,
    pub action: PendingAction,
    /// Anonymous identity that created the draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Migration implementations
// ============================================================================

impl MigratesTo<ResumeTokenV1_1_0> for ResumeTokenV1_0_0 {
    fn migrate(self) -> ResumeTokenV1_1_0 {
        ResumeTokenV1_1_0 {
            draft_id: self.draft_id,
            action: self.action,
            anonymous_user_id: None,
            issued_at: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<ResumeToken> for ResumeTokenV1_1_0 {
    fn into_domain(self) -> ResumeToken {
        ResumeToken {
            draft_id: self.draft_id,
            action: self.action,
            anonymous_user_id: self.anonymous_user_id,
            issued_at: self.issued_at,
        }
    }
}

impl FromDomain<ResumeToken> for ResumeTokenV1_1_0 {
    fn from_domain(token: ResumeToken) -> Self {
        ResumeTokenV1_1_0 {
            draft_id: token.draft_id,
            action: token.action,
            anonymous_user_id: token.anonymous_user_id,
            issued_at: token.issued_at,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for resume tokens.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: owner and issue time unknown
/// - V1.1.0 → ResumeToken
pub fn create_resume_token_migrator() -> Result<version_migrate::Migrator, MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let path = version_migrate::Migrator::define(RESUME_TOKEN_ENTITY)
        .from::<ResumeTokenV1_0_0>()
        .step::<ResumeTokenV1_1_0>()
        .into_with_save::<ResumeToken>();

    migrator.register(path)?;
    Ok(migrator)
}
