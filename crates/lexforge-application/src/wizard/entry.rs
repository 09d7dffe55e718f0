//! Wizard entry gate.

use lexforge_core::api::ContractApi;
use lexforge_core::error::Result;
use lexforge_core::identity::IdentityResolver;
use lexforge_core::profile::UserProfile;
use lexforge_core::route::{Route, WizardQuery};

/// What the wizard does when it is opened.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryDecision {
    /// The user skipped profile setup; send them there and stop rendering.
    RedirectToProfile(Route),
    /// Signed in without any configured profile: blocking modal.
    ProfileRequired,
    /// Render the wizard. `profile` is present for signed-in users.
    Ready { profile: Option<UserProfile> },
}

pub struct EntryGate;

impl EntryGate {
    pub async fn check(
        query: &WizardQuery,
        identity: &IdentityResolver,
        api: &dyn ContractApi,
    ) -> Result<EntryDecision> {
        if !query.from_dashboard {
            tracing::info!("Wizard opened without profile setup, redirecting");
            return Ok(EntryDecision::RedirectToProfile(Route::DashboardThenWizard));
        }

        if !identity.is_authenticated() {
            return Ok(EntryDecision::Ready { profile: None });
        }

        let profile = match api.get_user_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!("Error loading user profile: {}", e);
                return Ok(EntryDecision::Ready { profile: None });
            }
        };
        if !profile.has_configured_entity() {
            tracing::info!("No configured profile, asking the user to complete it");
            return Ok(EntryDecision::ProfileRequired);
        }
        Ok(EntryDecision::Ready {
            profile: Some(profile),
        })
    }
}
