//! Contracting parties.
//!
//! The author and the assignee of a contract are either a physical person or
//! a legal entity. Each variant carries its own field set and its own
//! required fields, so completeness is decided by matching on the variant.

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Discriminator used by the contract payload (`auteur_type`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorType {
    #[default]
    #[serde(rename = "Personne physique")]
    PhysicalPerson,
    #[serde(rename = "Personne morale")]
    LegalEntity,
}

impl AuthorType {
    pub const ALL: [AuthorType; 2] = [AuthorType::PhysicalPerson, AuthorType::LegalEntity];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorType::PhysicalPerson => "Personne physique",
            AuthorType::LegalEntity => "Personne morale",
        }
    }
}

/// A natural person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalPerson {
    /// Civility ("M." or "Mme"). Address-book records store it as `civilite`.
    #[serde(alias = "civilite")]
    pub gentille: String,
    pub nom: String,
    pub prenom: String,
    pub date_naissance: String,
    pub lieu_naissance: String,
    pub nationalite: String,
    pub adresse: String,
    pub code_postal: String,
    pub ville: String,
    pub email: String,
    pub telephone: String,
    /// Asks the backend to also store this record in the address book.
    #[serde(rename = "saveToClients", skip_serializing_if = "is_false")]
    pub save_to_clients: bool,
}

impl PhysicalPerson {
    /// Civility, last name and first name are required.
    pub fn is_complete(&self) -> bool {
        has_text(&self.gentille) && has_text(&self.nom) && has_text(&self.prenom)
    }
}

/// A company or any other legal person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalEntity {
    pub nom: String,
    pub forme_juridique: String,
    pub capital: String,
    pub siren: String,
    pub rcs: String,
    pub siege: String,
    pub adresse: String,
    pub code_postal: String,
    pub ville: String,
    pub representant: String,
    pub qualite_representant: String,
    pub email: String,
    pub telephone: String,
    #[serde(rename = "saveToClients", skip_serializing_if = "is_false")]
    pub save_to_clients: bool,
}

impl LegalEntity {
    /// Name and legal form are required.
    pub fn is_complete(&self) -> bool {
        has_text(&self.nom) && has_text(&self.forme_juridique)
    }
}

/// One side of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Party {
    PhysicalPerson(PhysicalPerson),
    LegalEntity(LegalEntity),
}

impl Default for Party {
    fn default() -> Self {
        Party::empty(AuthorType::default())
    }
}

impl Party {
    /// Returns a party of the given kind with every field blank.
    pub fn empty(kind: AuthorType) -> Self {
        match kind {
            AuthorType::PhysicalPerson => Party::PhysicalPerson(PhysicalPerson::default()),
            AuthorType::LegalEntity => Party::LegalEntity(LegalEntity::default()),
        }
    }

    /// Builds a party of the given kind from an untyped field map.
    ///
    /// This is how the author block travels on the wire: the kind and the
    /// fields are two separate JSON members.
    pub fn from_fields(kind: AuthorType, fields: serde_json::Value) -> serde_json::Result<Self> {
        let fields = if fields.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            fields
        };
        Ok(match kind {
            AuthorType::PhysicalPerson => Party::PhysicalPerson(serde_json::from_value(fields)?),
            AuthorType::LegalEntity => Party::LegalEntity(serde_json::from_value(fields)?),
        })
    }

    pub fn kind(&self) -> AuthorType {
        match self {
            Party::PhysicalPerson(_) => AuthorType::PhysicalPerson,
            Party::LegalEntity(_) => AuthorType::LegalEntity,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Party::PhysicalPerson(person) => person.is_complete(),
            Party::LegalEntity(entity) => entity.is_complete(),
        }
    }

    pub fn save_to_clients(&self) -> bool {
        match self {
            Party::PhysicalPerson(person) => person.save_to_clients,
            Party::LegalEntity(entity) => entity.save_to_clients,
        }
    }

    pub fn set_save_to_clients(&mut self, value: bool) {
        match self {
            Party::PhysicalPerson(person) => person.save_to_clients = value,
            Party::LegalEntity(entity) => entity.save_to_clients = value,
        }
    }

    /// Human-readable label used in listings.
    pub fn display_name(&self) -> String {
        match self {
            Party::PhysicalPerson(person) => {
                let name = format!("{} {}", person.prenom.trim(), person.nom.trim());
                name.trim().to_string()
            }
            Party::LegalEntity(entity) => entity.nom.trim().to_string(),
        }
    }

    /// Sets a field by its wire name.
    ///
    /// Returns `false` when the field does not exist on this variant; the
    /// value is then ignored.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match self {
            Party::PhysicalPerson(p) => match field {
                "gentille" | "civilite" => &mut p.gentille,
                "nom" => &mut p.nom,
                "prenom" => &mut p.prenom,
                "date_naissance" => &mut p.date_naissance,
                "lieu_naissance" => &mut p.lieu_naissance,
                "nationalite" => &mut p.nationalite,
                "adresse" => &mut p.adresse,
                "code_postal" => &mut p.code_postal,
                "ville" => &mut p.ville,
                "email" => &mut p.email,
                "telephone" => &mut p.telephone,
                _ => return false,
            },
            Party::LegalEntity(e) => match field {
                "nom" => &mut e.nom,
                "forme_juridique" => &mut e.forme_juridique,
                "capital" => &mut e.capital,
                "siren" => &mut e.siren,
                "rcs" => &mut e.rcs,
                "siege" => &mut e.siege,
                "adresse" => &mut e.adresse,
                "code_postal" => &mut e.code_postal,
                "ville" => &mut e.ville,
                "representant" => &mut e.representant,
                "qualite_representant" => &mut e.qualite_representant,
                "email" => &mut e.email,
                "telephone" => &mut e.telephone,
                _ => return false,
            },
        };
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_physical_person_completeness_requires_three_fields() {
        let mut party = Party::empty(AuthorType::PhysicalPerson);
        assert!(!party.is_complete());
        party.set_field("gentille", "Mme");
        party.set_field("nom", "Durand");
        assert!(!party.is_complete());
        party.set_field("prenom", "Alice");
        assert!(party.is_complete());
    }

    #[test]
    fn test_legal_entity_completeness_requires_name_and_form() {
        let mut party = Party::empty(AuthorType::LegalEntity);
        party.set_field("nom", "Tellers");
        assert!(!party.is_complete());
        party.set_field("forme_juridique", "SAS");
        assert!(party.is_complete());
    }

    #[test]
    fn test_whitespace_only_fields_are_incomplete() {
        let party = Party::LegalEntity(LegalEntity {
            nom: "  ".into(),
            forme_juridique: "SAS".into(),
            ..Default::default()
        });
        assert!(!party.is_complete());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut party = Party::empty(AuthorType::PhysicalPerson);
        assert!(!party.set_field("forme_juridique", "SAS"));
        assert_eq!(party, Party::empty(AuthorType::PhysicalPerson));
    }

    #[test]
    fn test_tagged_representation() {
        let party = Party::LegalEntity(LegalEntity {
            nom: "Tellers".into(),
            ..Default::default()
        });
        let value = serde_json::to_value(&party).unwrap();
        assert_eq!(value["type"], "legal_entity");
        assert_eq!(value["nom"], "Tellers");
        assert!(value.get("saveToClients").is_none());
    }

    #[test]
    fn test_civilite_alias_maps_to_gentille() {
        let party: Party = serde_json::from_value(json!({
            "type": "physical_person",
            "civilite": "M.",
            "nom": "Martin",
            "prenom": "Paul"
        }))
        .unwrap();
        match party {
            Party::PhysicalPerson(p) => assert_eq!(p.gentille, "M."),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_from_fields_uses_kind() {
        let party = Party::from_fields(
            AuthorType::LegalEntity,
            json!({"nom": "Acme", "forme_juridique": "SARL", "saveToClients": true}),
        )
        .unwrap();
        assert_eq!(party.kind(), AuthorType::LegalEntity);
        assert!(party.save_to_clients());
        assert!(party.is_complete());

        let empty = Party::from_fields(AuthorType::PhysicalPerson, serde_json::Value::Null).unwrap();
        assert_eq!(empty, Party::empty(AuthorType::PhysicalPerson));
    }
}
