use anyhow::{Result, bail};
use lexforge_core::api::ContractApi;
use lexforge_core::contract::Party;
use lexforge_core::profile::{EntityType, UserProfile};

use super::utils::print_json;
use crate::context::AppContext;

pub async fn show(ctx: &AppContext) -> Result<()> {
    let profile = ctx.api.get_user_profile().await?;
    print_json(&profile)?;
    match profile.assignee() {
        Some(party) => println!("\nContracts are assigned to {}", party.display_name()),
        None => println!("\n⚠ No configured profile: the wizard will ask for one."),
    }
    Ok(())
}

pub async fn select(ctx: &AppContext, entity: EntityType) -> Result<()> {
    let mut profile = ctx.api.get_user_profile().await?;
    profile.selected_entity_type = Some(entity);
    ctx.api.update_user_profile(&profile).await?;
    println!("✓ Acting as {:?}", entity);
    Ok(())
}

/// Sets one field of the selected variant.
pub async fn set(ctx: &AppContext, field: &str, value: &str) -> Result<()> {
    let mut profile = ctx.api.get_user_profile().await?;
    let mut party = selected_party(&profile)?;
    if !party.set_field(field, value) {
        bail!("Unknown field '{}' for {}", field, party.kind().as_str());
    }
    match party {
        Party::PhysicalPerson(person) => profile.physical_person.person = person,
        Party::LegalEntity(entity) => profile.legal_entity.entity = entity,
    }
    ctx.api.update_user_profile(&profile).await?;
    println!("✓ {} updated", field);
    Ok(())
}

/// Validates the selected variant and marks it configured.
pub async fn configure(ctx: &AppContext) -> Result<()> {
    let mut profile = ctx.api.get_user_profile().await?;
    profile.configure_selected()?;
    ctx.api.update_user_profile(&profile).await?;
    println!("✅ Profile configured");
    Ok(())
}

fn selected_party(profile: &UserProfile) -> Result<Party> {
    match profile.selected_entity_type {
        Some(EntityType::PhysicalPerson) => Ok(Party::PhysicalPerson(
            profile.physical_person.person.clone(),
        )),
        Some(EntityType::LegalEntity) => Ok(Party::LegalEntity(profile.legal_entity.entity.clone())),
        None => bail!("Select a profile type first: lexforge profile select <physical|legal>"),
    }
}
