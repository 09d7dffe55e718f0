use anyhow::{Context, Result};
use lexforge_application::ContractsBoard;
use lexforge_core::api::ContractApi;
use lexforge_core::contract::{Contract, DraftState};
use std::fs;
use std::path::Path;

use super::utils::{print_json, write_download};
use crate::context::AppContext;

async fn board(ctx: &AppContext) -> Result<ContractsBoard> {
    let mut board = ContractsBoard::new(ctx.api.clone());
    board.refresh().await.context("Failed to load contracts")?;
    Ok(board)
}

fn print_row(contract: &Contract, flagged: bool) {
    let state = match contract.state() {
        DraftState::Draft => "draft",
        DraftState::Final => "final",
        DraftState::Ephemeral => "-",
    };
    let alert = if flagged { " ⚠ security check failed" } else { "" };
    println!(
        "{:<24} {:<6} {:<20} {}{}",
        contract.id, state, contract.updated_at, contract.title, alert
    );
}

pub async fn list(ctx: &AppContext, drafts_only: bool) -> Result<()> {
    let board = board(ctx).await?;
    if board.contracts().is_empty() {
        println!("No contracts.");
        return Ok(());
    }
    for contract in board.contracts() {
        if drafts_only && contract.state() != DraftState::Draft {
            continue;
        }
        print_row(contract, ctx.storage.has_security_alert(&contract.id));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let contract = ctx.api.get_contract_by_id(id).await?;
    print_json(&contract)
}

pub async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    let mut board = board(ctx).await?;
    board.delete(id).await?;
    println!("🗑  Deleted {}", id);
    Ok(())
}

pub async fn finalize(ctx: &AppContext, id: &str, title: &str) -> Result<()> {
    let mut board = board(ctx).await?;
    let contract = board.finalize(id, title, &ctx.lifecycle).await?;
    println!("✅ {} is now final: {}", contract.id, contract.title);
    Ok(())
}

pub async fn rename(ctx: &AppContext, id: &str, title: &str) -> Result<()> {
    let mut board = board(ctx).await?;
    let contract = board.rename(id, title).await?;
    println!("✏️  {} renamed to {}", contract.id, contract.title);
    Ok(())
}

pub async fn export(
    ctx: &AppContext,
    id: &str,
    filename: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let board = board(ctx).await?;
    let file = board.export(id, filename).await?;
    write_download(&file, out)?;
    Ok(())
}

pub async fn import(ctx: &AppContext, path: &Path) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut board = ContractsBoard::new(ctx.api.clone());
    let contract = board.import(filename, None, bytes).await?;
    println!("📥 Imported {} as {}", contract.title, contract.id);
    Ok(())
}

pub async fn alerts(ctx: &AppContext) -> Result<()> {
    let board = board(ctx).await?;
    let flagged = board.flagged_drafts(&ctx.storage);
    if flagged.is_empty() {
        println!("No security alerts.");
    }
    for (draft_id, contract) in flagged {
        match contract {
            Some(contract) => println!("⚠ {} ({})", draft_id, contract.title),
            None => println!("⚠ {} (no longer listed)", draft_id),
        }
    }
    Ok(())
}

pub fn dismiss_alert(ctx: &AppContext, draft_id: &str) -> Result<()> {
    ctx.storage.dismiss_security_alert(draft_id)?;
    println!("Dismissed alert for {}", draft_id);
    Ok(())
}
