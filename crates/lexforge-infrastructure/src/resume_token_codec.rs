//! URL-safe encoding of resume tokens.

use crate::dto::{RESUME_TOKEN_ENTITY, create_resume_token_migrator};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::resume::{ResumeToken, ResumeTokenCodec};
use version_migrate::Migrator;

/// Versioned JSON, base64url without padding.
///
/// Older token versions are migrated on decode.
pub struct Base64ResumeTokenCodec {
    migrator: Migrator,
}

impl Base64ResumeTokenCodec {
    pub fn new() -> Result<Self> {
        Ok(Self {
            migrator: create_resume_token_migrator()?,
        })
    }
}

impl ResumeTokenCodec for Base64ResumeTokenCodec {
    fn encode(&self, token: &ResumeToken) -> Result<String> {
        let json = self
            .migrator
            .save_domain_flat(RESUME_TOKEN_ENTITY, token.clone())?;
        Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }

    fn decode(&self, encoded: &str) -> Result<ResumeToken> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|e| LexforgeError::validation(format!("Malformed resume token: {e}")))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(self.migrator.load_flat_from(RESUME_TOKEN_ENTITY, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexforge_core::resume::PendingAction;

    #[test]
    fn test_encoded_token_is_url_safe_and_decodes() {
        let codec = Base64ResumeTokenCodec::new().unwrap();
        let token = ResumeToken::new("draft/1+2", PendingAction::DownloadPdf, Some("anon_q".into()));
        let encoded = codec.encode(&token).unwrap();

        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(codec.decode(&encoded).unwrap(), token);
    }

    #[test]
    fn test_decodes_legacy_token() {
        let codec = Base64ResumeTokenCodec::new().unwrap();
        let legacy = URL_SAFE_NO_PAD
            .encode(r#"{"version":"1.0.0","draft_id":"d7","action":"openEditor"}"#);
        let token = codec.decode(&legacy).unwrap();
        assert_eq!(token.draft_id, "d7");
        assert_eq!(token.action, PendingAction::OpenEditor);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = Base64ResumeTokenCodec::new().unwrap();
        assert!(codec.decode("***").is_err());
        assert!(codec.decode(&URL_SAFE_NO_PAD.encode("not json")).is_err());
    }
}
