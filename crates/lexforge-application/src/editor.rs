//! Block editor over a saved contract.
//!
//! Edits are kept in a side map keyed by element index and only merged into
//! the base text for display and on save. Comments are anchored by index too,
//! so reordering moves both with their element.

use crate::contracts::export_filename;
use chrono::Utc;
use lexforge_core::api::{ContractApi, GeneratedFile};
use lexforge_core::contract::{Contract, ContractUpdate};
use lexforge_core::editor::{Comment, Element, MoveDirection};
use lexforge_core::error::{LexforgeError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use uuid::Uuid;

const DEFAULT_COMMENT_AUTHOR: &str = "Utilisateur";

/// An article heading, for the section navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub index: usize,
    pub text: String,
}

pub struct EditorDocument {
    contract: Contract,
    title: String,
    elements: Vec<Element>,
    edits: BTreeMap<usize, String>,
    comments: Vec<Comment>,
    reordered: bool,
}

impl EditorDocument {
    pub fn new(contract: Contract, elements: Vec<Element>, comments: Vec<Comment>) -> Self {
        Self {
            title: contract.title.clone(),
            contract,
            elements,
            edits: BTreeMap::new(),
            comments,
            reordered: false,
        }
    }

    pub async fn load(api: &dyn ContractApi, contract_id: &str) -> Result<Self> {
        let contract = api.get_contract_by_id(contract_id).await?;
        let response = api.get_contract_elements(contract_id).await?;
        tracing::debug!(
            "Loaded {} elements and {} comments for {}",
            response.elements.len(),
            response.comments.len(),
            contract_id
        );
        Ok(Self::new(contract, response.elements, response.comments))
    }

    pub fn contract_id(&self) -> &str {
        &self.contract.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_reordered(&self) -> bool {
        self.reordered
    }

    /// Text shown for the element at `index`: the edit if any, else the base.
    pub fn display_text(&self, index: usize) -> Option<&str> {
        let base = self.elements.get(index)?.text()?;
        Some(self.edits.get(&index).map(String::as_str).unwrap_or(base))
    }

    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        match self.elements.get(index) {
            Some(Element::Paragraph { .. }) => {
                self.edits.insert(index, text.into());
                Ok(())
            }
            Some(Element::Spacer { .. }) => Err(LexforgeError::validation(format!(
                "l'élément {index} n'est pas modifiable"
            ))),
            None => Err(LexforgeError::not_found("element", index.to_string())),
        }
    }

    /// Swaps the element with its neighbour. Returns the new index, or `None`
    /// at either end of the document.
    pub fn move_element(&mut self, index: usize, direction: MoveDirection) -> Option<usize> {
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1)?,
            MoveDirection::Down => index.checked_add(1)?,
        };
        if index >= self.elements.len() || target >= self.elements.len() {
            return None;
        }
        self.elements.swap(index, target);

        let moved = self.edits.remove(&index);
        let displaced = self.edits.remove(&target);
        if let Some(text) = moved {
            self.edits.insert(target, text);
        }
        if let Some(text) = displaced {
            self.edits.insert(index, text);
        }

        for comment in &mut self.comments {
            if comment.element_index == index {
                comment.element_index = target;
            } else if comment.element_index == target {
                comment.element_index = index;
            }
        }
        self.reordered = true;
        Some(target)
    }

    pub fn comments_for(&self, index: usize) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .filter(move |c| c.element_index == index)
    }

    pub fn add_comment(
        &mut self,
        index: usize,
        text: impl Into<String>,
        selected_text: impl Into<String>,
    ) -> Result<&Comment> {
        if index >= self.elements.len() {
            return Err(LexforgeError::not_found("element", index.to_string()));
        }
        self.comments.push(Comment {
            id: Uuid::new_v4().to_string(),
            element_index: index,
            text: text.into(),
            date: Utc::now().to_rfc3339(),
            user: DEFAULT_COMMENT_AUTHOR.to_string(),
            selected_text: selected_text.into(),
        });
        Ok(&self.comments[self.comments.len() - 1])
    }

    pub fn update_comment(&mut self, comment_id: &str, text: impl Into<String>) -> Result<()> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| LexforgeError::not_found("comment", comment_id))?;
        comment.text = text.into();
        comment.date = Utc::now().to_rfc3339();
        Ok(())
    }

    pub fn delete_comment(&mut self, comment_id: &str) -> Result<()> {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        if self.comments.len() == before {
            return Err(LexforgeError::not_found("comment", comment_id));
        }
        Ok(())
    }

    /// Article paragraphs with their markup stripped.
    pub fn sections(&self) -> Result<Vec<Section>> {
        let tags = Regex::new(r"<[^>]*>").map_err(|e| LexforgeError::internal(e.to_string()))?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| match element {
                Element::Paragraph { style, .. } if style.is_section() => {
                    let text = self.display_text(index)?;
                    Some(Section {
                        id: format!("section-{index}"),
                        index,
                        text: tags.replace_all(text, "").trim().to_string(),
                    })
                }
                _ => None,
            })
            .collect())
    }

    /// The update a save submits.
    pub fn to_update(&self) -> ContractUpdate {
        ContractUpdate {
            title: Some(self.title.clone()),
            updated_elements: Some(self.edits.clone()),
            comments: Some(self.comments.clone()),
            elements: self.reordered.then(|| self.elements.clone()),
            ..Default::default()
        }
    }

    pub async fn save(&mut self, api: &dyn ContractApi) -> Result<()> {
        api.update_contract(&self.contract.id, &self.to_update())
            .await
            .inspect_err(|e| tracing::error!("Error saving contract {}: {}", self.contract.id, e))?;
        self.contract.title = self.title.clone();
        self.reordered = false;
        tracing::info!("Saved contract {}", self.contract.id);
        Ok(())
    }

    /// Saves pending changes, then downloads the JSON export.
    pub async fn export(
        &mut self,
        api: &dyn ContractApi,
        requested: Option<&str>,
    ) -> Result<GeneratedFile> {
        self.save(api).await?;
        let filename = export_filename(&self.contract, requested)?;
        let bytes = api.export_contract(&self.contract.id).await?;
        Ok(GeneratedFile { filename, bytes })
    }
}
