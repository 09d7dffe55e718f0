//! Persisted contract entity.

use super::model::ContractData;
use crate::editor::{Comment, Element};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position of a contract in the draft lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftState {
    /// Exists only in the wizard's memory.
    Ephemeral,
    /// Persisted with `is_draft = true`, possibly owned by an anonymous identity.
    Draft,
    /// Persisted with `is_draft = false`.
    Final,
}

/// A contract as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: ContractData,
    #[serde(default)]
    pub is_draft: bool,
    /// Created directly from the last wizard step.
    #[serde(default)]
    pub from_step6: bool,
    /// Timestamp when the contract was created (ISO 8601 format)
    #[serde(default)]
    pub created_at: String,
    /// Timestamp when the contract was last updated (ISO 8601 format)
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub user_id: String,
}

impl Contract {
    pub fn state(&self) -> DraftState {
        if self.is_draft {
            DraftState::Draft
        } else {
            DraftState::Final
        }
    }
}

/// Partial update sent with `PUT /contracts/:id`.
///
/// Only the fields that are set travel on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    /// Tells the backend not to touch `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_data: Option<bool>,
    /// Edited paragraph texts keyed by element index.
    #[serde(
        rename = "updatedElements",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_elements: Option<BTreeMap<usize, String>>,
    /// Full element list, sent only when the order changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl ContractUpdate {
    /// The draft to final transition: metadata only, payload preserved.
    pub fn finalize(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            is_draft: Some(false),
            preserve_data: Some(true),
            ..Default::default()
        }
    }

    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finalize_update_is_exactly_three_fields() {
        let value = serde_json::to_value(ContractUpdate::finalize("Contrat Dupont")).unwrap();
        assert_eq!(
            value,
            json!({"title": "Contrat Dupont", "is_draft": false, "preserve_data": true})
        );
    }

    #[test]
    fn test_updated_elements_keys_are_indices() {
        let update = ContractUpdate {
            updated_elements: Some(BTreeMap::from([(3, "Article 1".to_string())])),
            ..Default::default()
        };
        let value = serde_json::to_value(update).unwrap();
        assert_eq!(value["updatedElements"]["3"], "Article 1");
    }

    #[test]
    fn test_contract_state_follows_flag() {
        let contract: Contract = serde_json::from_value(json!({
            "id": "c1",
            "title": "Brouillon",
            "is_draft": true
        }))
        .unwrap();
        assert_eq!(contract.state(), DraftState::Draft);
        assert!(contract.data.supports.contains("site web"));
    }
}
