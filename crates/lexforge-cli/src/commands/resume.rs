use anyhow::{Result, bail};
use lexforge_application::{CompletedAction, ResumeOutcome};
use lexforge_core::route::WizardQuery;
use std::path::Path;

use super::utils::write_download;
use crate::context::AppContext;

/// Picks up the action interrupted by sign-in. `return_url` is the URL the
/// sign-in flow sent back; without it the stored pointer is used.
pub async fn run(ctx: &AppContext, return_url: Option<&str>, out: Option<&Path>) -> Result<()> {
    if !ctx.identity.is_authenticated() {
        bail!("Sign in first: pass --user or set LEXFORGE_USER_ID");
    }
    let query = WizardQuery::parse(return_url.unwrap_or_default());

    match ctx.lifecycle.resume_after_auth(&query).await? {
        ResumeOutcome::Nothing => println!("Nothing to resume."),
        ResumeOutcome::DraftUnavailable { draft_id } => {
            bail!("Draft {draft_id} could not be recovered")
        }
        ResumeOutcome::SecurityAlert { draft_id, message } => {
            println!("⚠ Security check failed for draft {}: {}", draft_id, message);
            println!("  The draft was left untouched. See `lexforge contracts alerts`.");
        }
        ResumeOutcome::Resumed {
            draft_id,
            result,
            action,
            ..
        } => {
            println!("📝 Recovered draft {}", draft_id);
            match (action, result) {
                (_, Some(Ok(CompletedAction::Downloaded(file)))) => {
                    write_download(&file, out)?;
                }
                (_, Some(Ok(CompletedAction::OpenEditor(route)))) => {
                    println!("✅ Open {}", route);
                }
                (Some(action), Some(Err(e))) => {
                    bail!("Resumed action {} failed: {e}", action.as_str())
                }
                (None, Some(Err(e))) => bail!("Resumed action failed: {e}"),
                (_, None) => println!("No pending action; the draft is ready in the wizard."),
            }
        }
    }
    Ok(())
}
