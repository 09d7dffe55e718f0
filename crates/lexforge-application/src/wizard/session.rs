//! The wizard container.

use lexforge_core::api::ContractApi;
use lexforge_core::contract::{Completeness, ContractData, ContractPatch, Party};
use lexforge_core::error::Result;
use lexforge_core::identity::IdentityResolver;
use lexforge_core::profile::{EntityType, UserProfile};
use std::sync::Arc;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 6;

/// Step names as shown in the progress bar.
pub const STEP_NAMES: [&str; 6] = [
    "Type d'œuvre",
    "Mode de cession",
    "Informations auteur",
    "Description œuvre",
    "Supports",
    "Finalisation",
];

/// A preview request bound to the state it was issued for.
///
/// Only the response to the most recent ticket is displayed.
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    generation: u64,
    data: ContractData,
}

impl PreviewTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn data(&self) -> &ContractData {
        &self.data
    }

    /// Runs the request. Does not touch the session, so several tickets can
    /// be in flight at once.
    pub async fn fetch(self, api: &dyn ContractApi) -> PreviewOutcome {
        let result = api.preview_contract(&self.data).await;
        PreviewOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct PreviewOutcome {
    pub generation: u64,
    pub result: Result<String>,
}

/// Owns the contract being authored, the active step and the preview.
pub struct WizardSession {
    data: ContractData,
    active_step: u8,
    preview: Option<String>,
    generation: u64,
    identity: Arc<IdentityResolver>,
}

impl WizardSession {
    pub fn new(identity: Arc<IdentityResolver>) -> Self {
        Self::with_data(identity, ContractData::default())
    }

    /// Starts from an existing payload, e.g. a recovered draft.
    pub fn with_data(identity: Arc<IdentityResolver>, data: ContractData) -> Self {
        let mut session = Self {
            data,
            active_step: FIRST_STEP,
            preview: None,
            generation: 0,
            identity,
        };
        session.data.user_id = session.identity.current().user_id().to_string();
        session
    }

    pub fn data(&self) -> &ContractData {
        &self.data
    }

    pub fn identity(&self) -> &Arc<IdentityResolver> {
        &self.identity
    }

    pub fn active_step(&self) -> u8 {
        self.active_step
    }

    pub fn step_name(&self) -> &'static str {
        STEP_NAMES[usize::from(self.active_step - FIRST_STEP)]
    }

    /// Progress through the wizard, in percent.
    pub fn progress(&self) -> u8 {
        let percent = u16::from(self.active_step) * 100 / u16::from(LAST_STEP);
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn completeness(&self) -> Completeness {
        Completeness::evaluate(&self.data)
    }

    /// Merges `patch` and recomputes the caller identity.
    ///
    /// Returns the preview request to issue, if any type is selected.
    pub fn update(&mut self, patch: ContractPatch) -> Option<PreviewTicket> {
        self.data.apply(patch);
        self.data.user_id = self.identity.current().user_id().to_string();
        self.preview_ticket()
    }

    /// Replaces the whole payload with recovered data.
    pub fn restore(&mut self, data: ContractData) -> Option<PreviewTicket> {
        tracing::info!("Restoring wizard data");
        self.update(ContractPatch::replace_all(data))
    }

    /// Issues a new preview generation. Earlier tickets become stale.
    pub fn preview_ticket(&mut self) -> Option<PreviewTicket> {
        if self.data.type_contrat.is_empty() {
            return None;
        }
        self.generation += 1;
        Some(PreviewTicket {
            generation: self.generation,
            data: self.data.clone(),
        })
    }

    /// Displays a preview response unless a newer ticket was issued.
    ///
    /// A failed request keeps the previous preview. Returns whether the
    /// displayed preview changed.
    pub fn accept_preview(&mut self, response: PreviewOutcome) -> bool {
        if response.generation != self.generation {
            tracing::debug!(
                "Discarding stale preview (generation {} < {})",
                response.generation,
                self.generation
            );
            return false;
        }
        match response.result {
            Ok(preview) => {
                self.preview = Some(preview);
                true
            }
            Err(e) => {
                tracing::warn!("Error generating preview: {}", e);
                false
            }
        }
    }

    /// Issues a ticket for the current data and applies its response.
    pub async fn refresh_preview(&mut self, api: &dyn ContractApi) -> bool {
        match self.preview_ticket() {
            Some(ticket) => {
                let response = ticket.fetch(api).await;
                self.accept_preview(response)
            }
            None => false,
        }
    }

    /// Moves forward. Returns the new step when it changed; the caller then
    /// resets the scroll position.
    pub fn next_step(&mut self) -> Option<u8> {
        self.go_to(self.active_step.saturating_add(1))
    }

    pub fn prev_step(&mut self) -> Option<u8> {
        self.go_to(self.active_step.saturating_sub(1))
    }

    /// Jumps to `step`, clamped to the wizard's range.
    pub fn go_to(&mut self, step: u8) -> Option<u8> {
        let step = step.clamp(FIRST_STEP, LAST_STEP);
        if step == self.active_step {
            return None;
        }
        self.active_step = step;
        Some(step)
    }

    /// Sets the assignee for a new contract.
    ///
    /// A signed-in user's profile is used, honouring the variant chosen in
    /// the first step; anonymous users fall back to the details they typed
    /// on the temporary dashboard.
    pub fn init_assignee(&mut self, profile: Option<&UserProfile>) -> Option<PreviewTicket> {
        let storage = self.identity.storage();
        let assignee = match profile {
            Some(profile) => storage
                .selected_business_entity()
                .and_then(|selected| configured_variant(profile, selected))
                .or_else(|| profile.assignee()),
            None => storage.temp_business_info(),
        };

        match assignee {
            Some(party) => {
                tracing::debug!("Assignee initialised as {}", party.display_name());
                self.update(ContractPatch {
                    entreprise_info: Some(party),
                    ..Default::default()
                })
            }
            None => None,
        }
    }
}

fn configured_variant(profile: &UserProfile, entity: EntityType) -> Option<Party> {
    match entity {
        EntityType::PhysicalPerson => profile
            .physical_person
            .is_configured
            .then(|| Party::PhysicalPerson(profile.physical_person.person.clone())),
        EntityType::LegalEntity => profile
            .legal_entity
            .is_configured
            .then(|| Party::LegalEntity(profile.legal_entity.entity.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{complete_data, harness};
    use lexforge_core::contract::{AuthorType, ContractType};

    #[test]
    fn test_steps_clamp_to_range() {
        let h = harness();
        let mut session = WizardSession::new(h.identity);
        assert_eq!(session.prev_step(), None);
        assert_eq!(session.active_step(), 1);

        for expected in 2..=6 {
            assert_eq!(session.next_step(), Some(expected));
        }
        assert_eq!(session.next_step(), None);
        assert_eq!(session.active_step(), 6);
        assert_eq!(session.step_name(), "Finalisation");
        assert_eq!(session.progress(), 100);

        assert_eq!(session.go_to(0), Some(1));
        assert_eq!(session.go_to(42), Some(6));
    }

    #[test]
    fn test_progress_at_every_step() {
        let h = harness();
        let mut session = WizardSession::new(h.identity);
        let mut seen = vec![session.progress()];
        while session.next_step().is_some() {
            seen.push(session.progress());
        }
        assert_eq!(seen, vec![16, 33, 50, 66, 83, 100]);
    }

    #[test]
    fn test_empty_update_only_recomputes_identity() {
        let h = harness();
        let mut session = WizardSession::with_data(h.identity.clone(), complete_data());
        let anonymous = session.data().user_id.clone();
        assert!(anonymous.starts_with("anon_"));
        let before = session.data().clone();

        h.provider.complete_sign_in("user_7");
        session.update(ContractPatch::default());

        let after = session.data();
        assert_eq!(after.user_id, "user_7");
        let mut expected = before;
        expected.user_id = "user_7".to_string();
        assert_eq!(*after, expected);
    }

    #[test]
    fn test_no_preview_without_contract_type() {
        let h = harness();
        let mut session = WizardSession::new(h.identity);
        let ticket = session.update(ContractPatch {
            description_oeuvre: Some("Un logo".into()),
            ..Default::default()
        });
        assert!(ticket.is_none());

        let ticket = session.update(ContractPatch {
            type_contrat: Some([ContractType::Image].into()),
            ..Default::default()
        });
        assert!(ticket.is_some());
    }

    #[tokio::test]
    async fn test_stale_preview_is_discarded() {
        let h = harness();
        let mut session = WizardSession::with_data(h.identity.clone(), complete_data());

        let first = session.preview_ticket().unwrap();
        let second = session
            .update(ContractPatch {
                description_oeuvre: Some("Version deux".into()),
                ..Default::default()
            })
            .unwrap();

        let late = first.fetch(h.api.as_ref()).await;
        let fresh = second.fetch(h.api.as_ref()).await;

        assert!(session.accept_preview(fresh));
        assert!(!session.accept_preview(late));
        assert_eq!(session.preview(), Some("preview:Version deux"));
    }

    #[tokio::test]
    async fn test_failed_preview_keeps_previous() {
        let h = harness();
        let mut session = WizardSession::with_data(h.identity.clone(), complete_data());
        assert!(session.refresh_preview(h.api.as_ref()).await);
        let shown = session.preview().map(str::to_string);

        h.api.fail_on("preview");
        assert!(!session.refresh_preview(h.api.as_ref()).await);
        assert_eq!(session.preview().map(str::to_string), shown);
    }

    #[test]
    fn test_assignee_follows_selected_variant() {
        let h = harness();
        let mut profile = UserProfile::default();
        profile.physical_person.is_configured = true;
        profile.physical_person.person.nom = "Martin".into();
        profile.legal_entity.is_configured = true;
        profile.legal_entity.entity.nom = "Tellers SAS".into();
        h.storage
            .store_selected_business_entity(EntityType::LegalEntity)
            .unwrap();

        let mut session = WizardSession::new(h.identity);
        session.init_assignee(Some(&profile));

        let assignee = session.data().entreprise_info.as_ref().unwrap();
        assert_eq!(assignee.kind(), AuthorType::LegalEntity);
        assert_eq!(assignee.display_name(), "Tellers SAS");
    }

    #[test]
    fn test_anonymous_assignee_comes_from_temp_business_info() {
        let h = harness();
        let mut party = Party::empty(AuthorType::LegalEntity);
        party.set_field("nom", "Studio Nord");
        h.storage.store_temp_business_info(&party).unwrap();

        let mut session = WizardSession::new(h.identity);
        session.init_assignee(None);
        assert_eq!(session.data().entreprise_info, Some(party));
    }
}
