//! Navigation targets handed back to the caller.

use crate::resume::PendingAction;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// The wizard, entered from the dashboard.
    Wizard,
    WizardFinalize { contract_id: String },
    /// Profile page, asking to come back to the wizard afterwards.
    DashboardThenWizard,
    Dashboard,
    Contracts,
    Editor { contract_id: String },
    About,
    Legal,
    Versions,
    SiteMap,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Wizard => f.write_str("/wizard?fromDashboard=true"),
            Route::WizardFinalize { contract_id } => write!(f, "/wizard/finalize/{contract_id}"),
            Route::DashboardThenWizard => f.write_str("/dashboard?redirectTo=wizard"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Contracts => f.write_str("/contracts"),
            Route::Editor { contract_id } => write!(f, "/editor/{contract_id}"),
            Route::About => f.write_str("/about"),
            Route::Legal => f.write_str("/legal"),
            Route::Versions => f.write_str("/versions"),
            Route::SiteMap => f.write_str("/plan-site"),
        }
    }
}

/// Query parameters the wizard reads on entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardQuery {
    pub from_dashboard: bool,
    pub action: Option<PendingAction>,
    /// Encoded resume token.
    pub resume: Option<String>,
}

impl WizardQuery {
    /// Parses either a bare query string or a full path with a query.
    ///
    /// Values are taken verbatim; every value the wizard writes is URL-safe.
    pub fn parse(input: &str) -> Self {
        let query = input.split_once('?').map_or(input, |(_, q)| q);
        let mut parsed = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "fromDashboard" => parsed.from_dashboard = value == "true",
                "action" => parsed.action = PendingAction::parse(value),
                "resume" if !value.is_empty() => parsed.resume = Some(value.to_string()),
                _ => {}
            }
        }
        parsed
    }

    /// The URL the sign-in flow returns to.
    pub fn return_url(action: PendingAction, resume: &str) -> String {
        format!(
            "{}&action={}&resume={}",
            Route::Wizard,
            action.as_str(),
            resume
        )
    }
}
