//! Resume token carried through the sign-in redirect.
//!
//! The token names the draft saved before the redirect and the action the
//! user asked for. It is consumed once on return; the storage keys written
//! alongside it only serve as fallbacks.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action requested by an anonymous user on the last wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingAction {
    DownloadPdf,
    OpenEditor,
}

impl PendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingAction::DownloadPdf => "downloadPdf",
            PendingAction::OpenEditor => "openEditor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "downloadPdf" => Some(PendingAction::DownloadPdf),
            "openEditor" => Some(PendingAction::OpenEditor),
            _ => None,
        }
    }
}

impl std::fmt::Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain form of the resume token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeToken {
    pub draft_id: String,
    pub action: PendingAction,
    /// Anonymous identity that owned the draft when the token was issued.
    pub anonymous_user_id: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl ResumeToken {
    pub fn new(
        draft_id: impl Into<String>,
        action: PendingAction,
        anonymous_user_id: Option<String>,
    ) -> Self {
        Self {
            draft_id: draft_id.into(),
            action,
            anonymous_user_id,
            issued_at: Some(Utc::now()),
        }
    }
}

/// Turns a [`ResumeToken`] into a URL-safe string and back.
pub trait ResumeTokenCodec: Send + Sync {
    fn encode(&self, token: &ResumeToken) -> Result<String>;

    fn decode(&self, encoded: &str) -> Result<ResumeToken>;
}
