//! Fixed enumerations offered by the wizard.
//!
//! Every value serializes to the exact French label the backend templates
//! match on, so the labels below are part of the wire format.

use serde::{Deserialize, Serialize};

/// Kind of rights covered by a contract. A contract may cover both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Copyright assignment over a work.
    #[serde(rename = "Auteur (droits d'auteur)")]
    Author,
    /// Image rights assignment.
    #[serde(rename = "Image (droit à l'image)")]
    Image,
}

impl ContractType {
    pub const ALL: [ContractType; 2] = [ContractType::Author, ContractType::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Author => "Auteur (droits d'auteur)",
            ContractType::Image => "Image (droit à l'image)",
        }
    }

    /// Parses a label as returned by the analysis endpoint.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

/// Whether rights are assigned for free or against payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CessionMode {
    #[default]
    #[serde(rename = "Gratuite")]
    Free,
    #[serde(rename = "Onéreuse")]
    Onerous,
}

impl CessionMode {
    pub const ALL: [CessionMode; 2] = [CessionMode::Free, CessionMode::Onerous];

    pub fn as_str(&self) -> &'static str {
        match self {
            CessionMode::Free => "Gratuite",
            CessionMode::Onerous => "Onéreuse",
        }
    }

    pub fn is_onerous(&self) -> bool {
        matches!(self, CessionMode::Onerous)
    }
}

/// Rights that can be assigned on top of reproduction and representation.
///
/// Only meaningful for an onerous assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdditionalRight {
    #[serde(rename = "distribution - droit de distribuer l'original ou les copies de l'œuvre au public")]
    Distribution,
    #[serde(rename = "usage - droit d'utiliser l'œuvre pour les besoins du cessionnaire")]
    Usage,
    #[serde(rename = "adaptation - droit de modifier, transformer, traduire l'œuvre")]
    Adaptation,
    #[serde(rename = "pret - droit de mettre l'œuvre à disposition pour un usage temporaire")]
    Pret,
    #[serde(rename = "location - droit de mettre l'œuvre à disposition contre rémunération")]
    Location,
    #[serde(
        rename = "suite - droit de percevoir un pourcentage lors de reventes (œuvres graphiques/plastiques uniquement)"
    )]
    Suite,
}

impl AdditionalRight {
    pub const ALL: [AdditionalRight; 6] = [
        AdditionalRight::Distribution,
        AdditionalRight::Usage,
        AdditionalRight::Adaptation,
        AdditionalRight::Pret,
        AdditionalRight::Location,
        AdditionalRight::Suite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdditionalRight::Distribution => {
                "distribution - droit de distribuer l'original ou les copies de l'œuvre au public"
            }
            AdditionalRight::Usage => {
                "usage - droit d'utiliser l'œuvre pour les besoins du cessionnaire"
            }
            AdditionalRight::Adaptation => {
                "adaptation - droit de modifier, transformer, traduire l'œuvre"
            }
            AdditionalRight::Pret => {
                "pret - droit de mettre l'œuvre à disposition pour un usage temporaire"
            }
            AdditionalRight::Location => {
                "location - droit de mettre l'œuvre à disposition contre rémunération"
            }
            AdditionalRight::Suite => {
                "suite - droit de percevoir un pourcentage lors de reventes (œuvres graphiques/plastiques uniquement)"
            }
        }
    }

    /// Short keyword preceding the description, e.g. `"pret"`.
    pub fn keyword(&self) -> &'static str {
        self.as_str().split(' ').next().unwrap_or_default()
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.keyword() == keyword)
    }
}

/// Civility values accepted for a physical person.
pub const CIVILITY_OPTIONS: [&str; 2] = ["M.", "Mme"];

/// Exploitation media the user can pick from.
pub const SUPPORTS_OPTIONS: [&str; 8] = [
    "Réseaux sociaux (Facebook, Instagram, Twitter, etc.)",
    "Applications mobiles",
    "Plateformes de diffusion vidéo (YouTube, Twitch, etc.)",
    "Supports imprimés (catalogues, flyers, affiches)",
    "Présentations lors d'événements",
    "Publicités en ligne",
    "Plateformes tierces (marketplaces, sites partenaires)",
    "Emails et newsletters",
];

/// Media always included in a contract. They cannot be removed.
pub const DEFAULT_SUPPORTS: [&str; 2] = ["site web", "Discord"];

pub fn is_default_support(support: &str) -> bool {
    DEFAULT_SUPPORTS.contains(&support)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serialized_form() {
        for t in ContractType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        for r in AdditionalRight::ALL {
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{}\"", r.as_str()));
        }
        assert_eq!(
            serde_json::to_string(&CessionMode::Onerous).unwrap(),
            "\"Onéreuse\""
        );
    }

    #[test]
    fn test_right_keywords() {
        assert_eq!(AdditionalRight::Pret.keyword(), "pret");
        assert_eq!(
            AdditionalRight::from_keyword("suite"),
            Some(AdditionalRight::Suite)
        );
        assert_eq!(AdditionalRight::from_keyword("reproduction"), None);
    }

    #[test]
    fn test_contract_type_from_label() {
        assert_eq!(
            ContractType::from_label("Image (droit à l'image)"),
            Some(ContractType::Image)
        );
        assert_eq!(ContractType::from_label("Image"), None);
    }

    #[test]
    fn test_default_cession_is_free() {
        assert_eq!(CessionMode::default(), CessionMode::Free);
        assert!(!CessionMode::Free.is_onerous());
    }
}
