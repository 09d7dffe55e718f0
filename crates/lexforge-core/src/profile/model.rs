use crate::contract::{LegalEntity, Party, PhysicalPerson};
use crate::error::{LexforgeError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Which profile variant the user acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    PhysicalPerson,
    LegalEntity,
}

/// The browser form stores "no choice yet" as an empty string.
fn empty_string_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<EntityType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => {
            EntityType::deserialize(serde::de::value::StrDeserializer::<D::Error>::new(value))
                .map(Some)
        }
    }
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalPersonProfile {
    #[serde(default)]
    pub is_configured: bool,
    #[serde(flatten)]
    pub person: PhysicalPerson,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntityProfile {
    #[serde(default)]
    pub is_configured: bool,
    #[serde(flatten)]
    pub entity: LegalEntity,
}

/// An address-book entry, stored inside the profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    #[serde(flatten)]
    pub party: Party,
}

impl Client {
    /// Creates a client with a fresh identifier.
    pub fn new(party: Party) -> Self {
        let mut party = party;
        party.set_save_to_clients(false);
        Self {
            id: Uuid::new_v4().to_string(),
            party,
        }
    }
}

/// The user's profile document (`GET /user-profile`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub physical_person: PhysicalPersonProfile,
    #[serde(default)]
    pub legal_entity: LegalEntityProfile,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub selected_entity_type: Option<EntityType>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl UserProfile {
    /// True when at least one variant has been configured.
    pub fn has_configured_entity(&self) -> bool {
        self.physical_person.is_configured || self.legal_entity.is_configured
    }

    /// The assignee a new contract starts with.
    ///
    /// The selected variant wins when configured; otherwise any configured
    /// variant is used.
    pub fn assignee(&self) -> Option<Party> {
        let physical = || {
            self.physical_person
                .is_configured
                .then(|| Party::PhysicalPerson(self.physical_person.person.clone()))
        };
        let legal = || {
            self.legal_entity
                .is_configured
                .then(|| Party::LegalEntity(self.legal_entity.entity.clone()))
        };
        match self.selected_entity_type {
            Some(EntityType::LegalEntity) => legal().or_else(physical),
            _ => physical().or_else(legal),
        }
    }

    /// Validates the selected variant and marks it configured.
    ///
    /// A physical person needs civility, names, birth date and address; a
    /// legal entity needs every registration field and its representative.
    pub fn configure_selected(&mut self) -> Result<()> {
        match self.selected_entity_type {
            Some(EntityType::PhysicalPerson) => {
                let p = &self.physical_person.person;
                let ok = [&p.gentille, &p.nom, &p.prenom, &p.date_naissance, &p.adresse]
                    .iter()
                    .all(|v| has_text(v));
                if !ok {
                    return Err(LexforgeError::validation(
                        "Veuillez remplir tous les champs obligatoires pour la personne physique.",
                    ));
                }
                self.physical_person.is_configured = true;
            }
            Some(EntityType::LegalEntity) => {
                let e = &self.legal_entity.entity;
                let ok = [
                    &e.nom,
                    &e.forme_juridique,
                    &e.capital,
                    &e.rcs,
                    &e.siege,
                    &e.representant,
                    &e.qualite_representant,
                ]
                .iter()
                .all(|v| has_text(v));
                if !ok {
                    return Err(LexforgeError::validation(
                        "Veuillez remplir tous les champs obligatoires pour la personne morale.",
                    ));
                }
                self.legal_entity.is_configured = true;
            }
            None => {
                return Err(LexforgeError::validation(
                    "Veuillez sélectionner un type d'entité (personne physique ou morale).",
                ));
            }
        }
        Ok(())
    }

    pub fn find_client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }
}
