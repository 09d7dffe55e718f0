//! Contract payload authored by the wizard.

use super::catalog::{AdditionalRight, CessionMode, ContractType, DEFAULT_SUPPORTS};
use super::party::{AuthorType, Party};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;

/// The aggregate a wizard session edits and the backend renders.
///
/// On the wire the author is split into `auteur_type` and `auteur_info`
/// (the info object holding only the variant's own fields); in memory it is a
/// single [`Party`] so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ContractDataWire")]
pub struct ContractData {
    /// Kinds of rights covered. Must be non-empty before finalization.
    pub type_contrat: BTreeSet<ContractType>,
    pub type_cession: CessionMode,
    /// Extra rights, only meaningful for an onerous assignment.
    pub droits_cedes: BTreeSet<AdditionalRight>,
    pub exclusivite: bool,
    /// The party granting rights (`auteur_type` + `auteur_info`).
    pub author: Party,
    pub description_oeuvre: String,
    pub description_image: String,
    /// Exploitation media. Always contains [`DEFAULT_SUPPORTS`].
    pub supports: BTreeSet<String>,
    pub remuneration: String,
    /// The assignee, sourced from the user's profile.
    pub entreprise_info: Option<Party>,
    /// Identity key of the caller, recomputed on every merge.
    pub user_id: String,
}

impl Default for ContractData {
    fn default() -> Self {
        Self {
            type_contrat: BTreeSet::new(),
            type_cession: CessionMode::default(),
            droits_cedes: BTreeSet::new(),
            exclusivite: false,
            author: Party::default(),
            description_oeuvre: String::new(),
            description_image: String::new(),
            supports: default_supports(),
            remuneration: String::new(),
            entreprise_info: None,
            user_id: String::new(),
        }
    }
}

fn default_supports() -> BTreeSet<String> {
    DEFAULT_SUPPORTS.iter().map(|s| s.to_string()).collect()
}

impl ContractData {
    pub fn has_type(&self, contract_type: ContractType) -> bool {
        self.type_contrat.contains(&contract_type)
    }

    pub fn author_type(&self) -> AuthorType {
        self.author.kind()
    }

    /// Shallow-merges `patch` into the payload.
    ///
    /// Absent fields are left untouched. No validation happens here; the
    /// default supports are re-inserted whatever the patch says.
    pub fn apply(&mut self, patch: ContractPatch) {
        let ContractPatch {
            type_contrat,
            type_cession,
            droits_cedes,
            exclusivite,
            author,
            description_oeuvre,
            description_image,
            supports,
            remuneration,
            entreprise_info,
        } = patch;

        if let Some(v) = type_contrat {
            self.type_contrat = v;
        }
        if let Some(v) = type_cession {
            self.type_cession = v;
        }
        if let Some(v) = droits_cedes {
            self.droits_cedes = v;
        }
        if let Some(v) = exclusivite {
            self.exclusivite = v;
        }
        if let Some(v) = author {
            self.author = v;
        }
        if let Some(v) = description_oeuvre {
            self.description_oeuvre = v;
        }
        if let Some(v) = description_image {
            self.description_image = v;
        }
        if let Some(v) = supports {
            self.supports = v;
        }
        if let Some(v) = remuneration {
            self.remuneration = v;
        }
        if let Some(v) = entreprise_info {
            self.entreprise_info = Some(v);
        }
        self.supports.extend(default_supports());
    }
}

/// A partial update of [`ContractData`]. `None` means "leave as is".
///
/// `user_id` is deliberately absent: it is owned by the session and derived
/// from the active identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractPatch {
    pub type_contrat: Option<BTreeSet<ContractType>>,
    pub type_cession: Option<CessionMode>,
    pub droits_cedes: Option<BTreeSet<AdditionalRight>>,
    pub exclusivite: Option<bool>,
    pub author: Option<Party>,
    pub description_oeuvre: Option<String>,
    pub description_image: Option<String>,
    pub supports: Option<BTreeSet<String>>,
    pub remuneration: Option<String>,
    pub entreprise_info: Option<Party>,
}

impl ContractPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch that replaces the whole payload with `data`.
    pub fn replace_all(data: ContractData) -> Self {
        Self {
            type_contrat: Some(data.type_contrat),
            type_cession: Some(data.type_cession),
            droits_cedes: Some(data.droits_cedes),
            exclusivite: Some(data.exclusivite),
            author: Some(data.author),
            description_oeuvre: Some(data.description_oeuvre),
            description_image: Some(data.description_image),
            supports: Some(data.supports),
            remuneration: Some(data.remuneration),
            entreprise_info: data.entreprise_info,
        }
    }
}

impl Serialize for ContractData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ContractData", 12)?;
        state.serialize_field("type_contrat", &self.type_contrat)?;
        state.serialize_field("type_cession", &self.type_cession)?;
        state.serialize_field("droits_cedes", &self.droits_cedes)?;
        state.serialize_field("exclusivite", &self.exclusivite)?;
        state.serialize_field("auteur_type", &self.author.kind())?;
        match &self.author {
            Party::PhysicalPerson(person) => state.serialize_field("auteur_info", person)?,
            Party::LegalEntity(entity) => state.serialize_field("auteur_info", entity)?,
        }
        state.serialize_field("description_oeuvre", &self.description_oeuvre)?;
        state.serialize_field("description_image", &self.description_image)?;
        state.serialize_field("supports", &self.supports)?;
        state.serialize_field("remuneration", &self.remuneration)?;
        state.serialize_field("entreprise_info", &self.entreprise_info)?;
        state.serialize_field("user_id", &self.user_id)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ContractDataWire {
    type_contrat: BTreeSet<ContractType>,
    type_cession: CessionMode,
    droits_cedes: BTreeSet<AdditionalRight>,
    exclusivite: bool,
    auteur_type: AuthorType,
    auteur_info: serde_json::Value,
    description_oeuvre: String,
    description_image: String,
    supports: BTreeSet<String>,
    remuneration: String,
    entreprise_info: Option<Party>,
    user_id: String,
}

impl Default for ContractDataWire {
    fn default() -> Self {
        Self {
            type_contrat: BTreeSet::new(),
            type_cession: CessionMode::default(),
            droits_cedes: BTreeSet::new(),
            exclusivite: false,
            auteur_type: AuthorType::default(),
            auteur_info: serde_json::Value::Null,
            description_oeuvre: String::new(),
            description_image: String::new(),
            supports: default_supports(),
            remuneration: String::new(),
            entreprise_info: None,
            user_id: String::new(),
        }
    }
}

impl TryFrom<ContractDataWire> for ContractData {
    type Error = serde_json::Error;

    fn try_from(wire: ContractDataWire) -> Result<Self, Self::Error> {
        let mut supports = wire.supports;
        supports.extend(default_supports());
        Ok(Self {
            type_contrat: wire.type_contrat,
            type_cession: wire.type_cession,
            droits_cedes: wire.droits_cedes,
            exclusivite: wire.exclusivite,
            author: Party::from_fields(wire.auteur_type, wire.auteur_info)?,
            description_oeuvre: wire.description_oeuvre,
            description_image: wire.description_image,
            supports,
            remuneration: wire.remuneration,
            entreprise_info: wire.entreprise_info,
            user_id: wire.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::party::LegalEntity;
    use serde_json::json;

    #[test]
    fn test_default_contains_default_supports() {
        let data = ContractData::default();
        assert!(data.supports.contains("site web"));
        assert!(data.supports.contains("Discord"));
        assert_eq!(data.type_cession, CessionMode::Free);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut data = ContractData::default();
        data.description_oeuvre = "Un roman".into();
        data.type_contrat.insert(ContractType::Author);
        let before = data.clone();
        data.apply(ContractPatch::default());
        assert_eq!(data, before);
    }

    #[test]
    fn test_patch_cannot_remove_default_supports() {
        let mut data = ContractData::default();
        data.apply(ContractPatch {
            supports: Some(BTreeSet::from(["Applications mobiles".to_string()])),
            ..Default::default()
        });
        assert!(data.supports.contains("site web"));
        assert!(data.supports.contains("Discord"));
        assert!(data.supports.contains("Applications mobiles"));
    }

    #[test]
    fn test_wire_format_splits_author() {
        let mut data = ContractData::default();
        data.author = Party::LegalEntity(LegalEntity {
            nom: "Acme".into(),
            forme_juridique: "SAS".into(),
            ..Default::default()
        });
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["auteur_type"], "Personne morale");
        assert_eq!(value["auteur_info"]["nom"], "Acme");
        assert!(value["auteur_info"].get("type").is_none());
        assert!(value["auteur_info"].get("prenom").is_none());
    }

    #[test]
    fn test_parses_payload_from_backend() {
        let data: ContractData = serde_json::from_value(json!({
            "type_contrat": ["Image (droit à l'image)"],
            "type_cession": "Onéreuse",
            "droits_cedes": [],
            "exclusivite": true,
            "auteur_type": "Personne physique",
            "auteur_info": {"gentille": "Mme", "nom": "Durand", "prenom": "Alice"},
            "description_image": "Portrait",
            "supports": ["Applications mobiles"],
            "remuneration": "500 €",
            "user_id": "user_1"
        }))
        .unwrap();
        assert!(data.has_type(ContractType::Image));
        assert!(data.author.is_complete());
        assert_eq!(data.supports.len(), 3);
        assert_eq!(data.user_id, "user_1");
        assert!(data.entreprise_info.is_none());
    }

    #[test]
    fn test_wire_round_trip_preserves_payload() {
        let mut data = ContractData::default();
        data.type_contrat.insert(ContractType::Author);
        data.type_cession = CessionMode::Onerous;
        data.droits_cedes.insert(AdditionalRight::Adaptation);
        data.author.set_field("nom", "Durand");
        data.author.set_save_to_clients(true);
        let json = serde_json::to_string(&data).unwrap();
        let back: ContractData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
