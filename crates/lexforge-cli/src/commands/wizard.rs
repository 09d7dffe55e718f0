use anyhow::{Result, bail};
use lexforge_application::WizardSession;
use lexforge_application::wizard::session::STEP_NAMES;
use lexforge_application::wizard::steps::{
    FinalizationStep, FinalizeOutcome, ProjectDescriptionStep, warnings_for,
};
use lexforge_application::{EntryDecision, EntryGate};
use lexforge_core::contract::ContractData;
use lexforge_core::route::WizardQuery;
use std::path::Path;

use super::utils::{print_json, read_contract_data, write_download};
use crate::context::AppContext;

/// Enters the wizard as the dashboard would, then loads `data`.
async fn open_session(ctx: &AppContext, data: ContractData) -> Result<WizardSession> {
    let query = WizardQuery {
        from_dashboard: true,
        ..Default::default()
    };
    let profile = match EntryGate::check(&query, &ctx.identity, ctx.api.as_ref()).await? {
        EntryDecision::Ready { profile } => profile,
        EntryDecision::ProfileRequired => {
            bail!("Complete your profile first: run `lexforge profile show` to check it")
        }
        EntryDecision::RedirectToProfile(route) => bail!("Profile setup required ({route})"),
    };

    let missing_assignee = data.entreprise_info.is_none();
    let mut session = WizardSession::with_data(ctx.identity.clone(), data);
    if missing_assignee {
        session.init_assignee(profile.as_ref());
    }
    Ok(session)
}

pub async fn check(ctx: &AppContext, data_path: &Path) -> Result<()> {
    let session = open_session(ctx, read_contract_data(data_path)?).await?;
    let data = session.data();

    for (number, name) in (1u8..).zip(STEP_NAMES) {
        let warnings = warnings_for(number, data);
        let mark = if warnings.is_empty() { "✓" } else { "⚠" };
        println!("{} {}. {}", mark, number, name);
        for warning in warnings {
            println!("     - {}: {}", warning.field, warning.message);
        }
    }

    let completeness = session.completeness();
    if completeness.is_complete() {
        println!("\n✅ Ready: the PDF and the editor are available.");
    } else {
        println!("\n❌ Missing: {}", completeness.missing().join(", "));
    }
    Ok(())
}

pub async fn analyze(ctx: &AppContext, description: &str) -> Result<()> {
    let data = ContractData {
        description_oeuvre: description.to_string(),
        ..Default::default()
    };
    let outcome = ProjectDescriptionStep::analyze(&data, ctx.api.as_ref()).await;
    println!("{}", outcome.message);
    if let Some(types) = outcome.patch.and_then(|p| p.type_contrat) {
        let labels: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        println!("Suggested: {}", labels.join(", "));
    }
    Ok(())
}

pub async fn preview(ctx: &AppContext, data_path: &Path) -> Result<()> {
    let mut session = open_session(ctx, read_contract_data(data_path)?).await?;
    if !session.refresh_preview(ctx.api.as_ref()).await {
        bail!("No preview available: select a contract type and check the logs");
    }
    if let Some(preview) = session.preview() {
        println!("{}", preview);
    }
    Ok(())
}

pub async fn pdf(
    ctx: &AppContext,
    data_path: &Path,
    filename: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let session = open_session(ctx, read_contract_data(data_path)?).await?;
    match FinalizationStep::download_pdf(session.data(), filename, &ctx.lifecycle).await? {
        FinalizeOutcome::Downloaded(file) => {
            write_download(&file, out)?;
        }
        FinalizeOutcome::SignInRequired(redirect) => {
            println!("📝 Draft {} saved until you sign in.", redirect.draft_id);
        }
        FinalizeOutcome::OpenEditor(route) => println!("{}", route),
    }
    Ok(())
}

pub async fn editor(ctx: &AppContext, data_path: &Path, title: Option<&str>) -> Result<()> {
    let session = open_session(ctx, read_contract_data(data_path)?).await?;
    match FinalizationStep::open_editor(session.data(), title, &ctx.lifecycle).await? {
        FinalizeOutcome::OpenEditor(route) => println!("✅ Contract created: {}", route),
        FinalizeOutcome::SignInRequired(redirect) => {
            println!("📝 Draft {} saved until you sign in.", redirect.draft_id);
        }
        FinalizeOutcome::Downloaded(file) => println!("{}", file.filename),
    }
    Ok(())
}

/// Prints a stored contract's payload for a new pass through the last step.
pub async fn finalize(ctx: &AppContext, contract_id: &str) -> Result<()> {
    let data = FinalizationStep::load_for_finalization(ctx.api.as_ref(), contract_id).await?;
    println!("# {}", data.title);
    print_json(&data.form_data)?;
    let completeness = FinalizationStep::completeness(&data.form_data);
    if !completeness.is_complete() {
        println!("\n❌ Missing: {}", completeness.missing().join(", "));
    }
    Ok(())
}
