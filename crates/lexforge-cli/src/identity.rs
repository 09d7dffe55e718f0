use async_trait::async_trait;
use lexforge_core::error::{LexforgeError, Result};
use lexforge_core::identity::IdentityProvider;
use reqwest::Url;

/// Query parameter the hosted sign-in page reads the return URL from.
pub const REDIRECT_PARAM: &str = "redirect_url";

/// Terminal stand-in for the hosted sign-in service.
///
/// The user id comes from `--user` (or `LEXFORGE_USER_ID`); signing in prints
/// the hosted page and the command that resumes the interrupted action.
pub struct CliIdentityProvider {
    user_id: Option<String>,
    sign_in_url: String,
}

impl CliIdentityProvider {
    pub fn new(user_id: Option<String>, sign_in_url: impl Into<String>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
            sign_in_url: sign_in_url.into(),
        }
    }

    pub fn sign_in_link(&self, return_url: &str) -> Result<Url> {
        Url::parse_with_params(&self.sign_in_url, &[(REDIRECT_PARAM, return_url)])
            .map_err(|e| LexforgeError::config(format!("Invalid sign-in URL: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for CliIdentityProvider {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    async fn sign_in(&self, return_url: &str) -> Result<()> {
        let link = self.sign_in_link(return_url)?;
        println!("🔐 Sign-in required.");
        println!("   Open: {}", link);
        println!("   Then run: lexforge --user <your-id> resume '{}'", return_url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_is_anonymous() {
        let provider = CliIdentityProvider::new(Some("  ".into()), "https://auth.example/sign-in");
        assert_eq!(provider.current_user_id(), None);
    }

    #[test]
    fn test_return_url_is_query_encoded() {
        let provider = CliIdentityProvider::new(None, "https://auth.example/sign-in");
        let link = provider
            .sign_in_link("/wizard?fromDashboard=true&action=downloadPdf&resume=abc")
            .unwrap();
        let (key, value) = link.query_pairs().next().unwrap();
        assert_eq!(key, REDIRECT_PARAM);
        assert_eq!(value, "/wizard?fromDashboard=true&action=downloadPdf&resume=abc");
        assert!(!link.as_str().contains("&action"));
    }
}
