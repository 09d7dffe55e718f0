use anyhow::Result;
use lexforge_application::EditorDocument;
use lexforge_core::editor::{Element, MoveDirection};
use std::path::Path;

use super::utils::write_download;
use crate::context::AppContext;

/// A change applied to the document before it is saved.
pub enum EditorChange {
    SetTitle(String),
    Edit { index: usize, text: String },
    Move { index: usize, direction: MoveDirection },
    Comment { index: usize, text: String, selected_text: String },
    UpdateComment { id: String, text: String },
    DeleteComment { id: String },
}

async fn open(ctx: &AppContext, contract_id: &str) -> Result<EditorDocument> {
    Ok(EditorDocument::load(ctx.api.as_ref(), contract_id).await?)
}

pub async fn show(ctx: &AppContext, contract_id: &str, sections_only: bool) -> Result<()> {
    let doc = open(ctx, contract_id).await?;
    println!("# {}", doc.title());

    if sections_only {
        for section in doc.sections()? {
            println!("[{:>3}] {}", section.index, section.text);
        }
        return Ok(());
    }

    for (index, element) in doc.elements().iter().enumerate() {
        match element {
            Element::Paragraph { style, .. } => {
                let text = doc.display_text(index).unwrap_or_default();
                println!("[{:>3}] {:<18} {}", index, style.as_str(), text);
            }
            Element::Spacer { height } => println!("[{:>3}] (spacer {})", index, height),
        }
        for comment in doc.comments_for(index) {
            println!("       💬 {} {}: {}", comment.id, comment.user, comment.text);
        }
    }
    Ok(())
}

pub async fn apply(ctx: &AppContext, contract_id: &str, change: EditorChange) -> Result<()> {
    let mut doc = open(ctx, contract_id).await?;
    match change {
        EditorChange::SetTitle(title) => doc.set_title(title),
        EditorChange::Edit { index, text } => doc.edit(index, text)?,
        EditorChange::Move { index, direction } => match doc.move_element(index, direction) {
            Some(target) => println!("Moved element {} to {}", index, target),
            None => {
                println!("Element {} cannot move further", index);
                return Ok(());
            }
        },
        EditorChange::Comment {
            index,
            text,
            selected_text,
        } => {
            let comment = doc.add_comment(index, text, selected_text)?;
            println!("💬 Added comment {}", comment.id);
        }
        EditorChange::UpdateComment { id, text } => doc.update_comment(&id, text)?,
        EditorChange::DeleteComment { id } => doc.delete_comment(&id)?,
    }
    doc.save(ctx.api.as_ref()).await?;
    println!("✅ Saved {}", doc.contract_id());
    Ok(())
}

pub async fn export(
    ctx: &AppContext,
    contract_id: &str,
    filename: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let mut doc = open(ctx, contract_id).await?;
    let file = doc.export(ctx.api.as_ref(), filename).await?;
    write_download(&file, out)?;
    Ok(())
}
