use anyhow::{Context, Result};
use lexforge_application::wizard::steps::AuthorInfoStep;
use lexforge_core::api::ContractApi;
use lexforge_core::contract::Party;
use std::fs;
use std::path::Path;

use crate::context::AppContext;

fn read_party(path: &Path) -> Result<Party> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a client record", path.display()))
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let clients = AuthorInfoStep::load_clients(ctx.api.as_ref()).await?;
    if clients.is_empty() {
        println!("The address book is empty.");
    }
    for client in clients {
        println!(
            "{:<38} {:<18} {}",
            client.id,
            client.party.kind().as_str(),
            client.party.display_name()
        );
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, path: &Path) -> Result<()> {
    let client = ctx.api.add_client(read_party(path)?).await?;
    println!("👤 Added {} ({})", client.party.display_name(), client.id);
    Ok(())
}

pub async fn update(ctx: &AppContext, id: &str, path: &Path) -> Result<()> {
    let client = ctx.api.update_client(id, read_party(path)?).await?;
    println!("👤 Updated {} ({})", client.party.display_name(), client.id);
    Ok(())
}

pub async fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.api.delete_client(id).await?;
    println!("🗑  Removed client {}", id);
    Ok(())
}
