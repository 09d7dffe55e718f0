use serde::{Deserialize, Serialize};

/// Style tag of a paragraph, as produced by the backend renderer.
///
/// Unknown tags are kept verbatim so a save never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParagraphStyle {
    Title,
    Subtitle,
    Article,
    SubArticle,
    Text,
    Other(String),
}

impl ParagraphStyle {
    pub fn as_str(&self) -> &str {
        match self {
            ParagraphStyle::Title => "ContractTitle",
            ParagraphStyle::Subtitle => "ContractSubtitle",
            ParagraphStyle::Article => "ContractArticle",
            ParagraphStyle::SubArticle => "ContractSubArticle",
            ParagraphStyle::Text => "ContractText",
            ParagraphStyle::Other(tag) => tag,
        }
    }

    /// Articles start a navigable section.
    pub fn is_section(&self) -> bool {
        matches!(self, ParagraphStyle::Article)
    }
}

impl From<String> for ParagraphStyle {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ContractTitle" => ParagraphStyle::Title,
            "ContractSubtitle" => ParagraphStyle::Subtitle,
            "ContractArticle" => ParagraphStyle::Article,
            "ContractSubArticle" => ParagraphStyle::SubArticle,
            "ContractText" => ParagraphStyle::Text,
            _ => ParagraphStyle::Other(tag),
        }
    }
}

impl From<ParagraphStyle> for String {
    fn from(style: ParagraphStyle) -> Self {
        style.as_str().to_string()
    }
}

/// A rendering block of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Paragraph { text: String, style: ParagraphStyle },
    Spacer { height: f64 },
}

impl Element {
    pub fn paragraph(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Element::Paragraph {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Paragraph { text, .. } => Some(text),
            Element::Spacer { .. } => None,
        }
    }
}

/// A note attached to an element by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub element_index: usize,
    #[serde(default)]
    pub text: String,
    /// ISO 8601 timestamp of the last edit.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub user: String,
    /// Text that was selected when the comment was created.
    #[serde(default)]
    pub selected_text: String,
}

/// Payload of `GET /contracts/:id/elements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementsResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_elements_response() {
        let response: ElementsResponse = serde_json::from_value(json!({
            "elements": [
                {"type": "paragraph", "text": "CONTRAT", "style": "ContractTitle"},
                {"type": "spacer", "height": 12},
                {"type": "paragraph", "text": "Article 1", "style": "ContractArticle"},
                {"type": "paragraph", "text": "Note", "style": "FootNote"}
            ],
            "comments": [
                {"id": "1", "elementIndex": 2, "text": "à revoir", "date": "2024-05-01T10:00:00Z", "user": "Utilisateur"}
            ]
        }))
        .unwrap();

        assert_eq!(response.elements.len(), 4);
        assert_eq!(response.elements[1], Element::Spacer { height: 12.0 });
        assert_eq!(response.comments[0].element_index, 2);
        assert_eq!(
            response.elements[3],
            Element::paragraph("Note", ParagraphStyle::Other("FootNote".into()))
        );
    }

    #[test]
    fn test_unknown_style_is_written_back_verbatim() {
        let element = Element::paragraph("x", ParagraphStyle::Other("Legacy".into()));
        let value = serde_json::to_value(element).unwrap();
        assert_eq!(value["style"], "Legacy");
        assert_eq!(value["type"], "paragraph");
    }
}
