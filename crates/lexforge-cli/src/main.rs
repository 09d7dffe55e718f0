use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lexforge_core::editor::MoveDirection;
use lexforge_core::profile::EntityType;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod identity;

use commands::editor::EditorChange;
use context::AppContext;

#[derive(Parser)]
#[command(name = "lexforge")]
#[command(about = "LexForge CLI - author and image rights assignment contracts", long_about = None)]
struct Cli {
    /// Signed-in user id; anonymous when absent
    #[arg(long, global = true, env = "LEXFORGE_USER_ID")]
    user: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in and finalize a contract from a JSON payload
    Wizard {
        #[command(subcommand)]
        action: WizardAction,
    },
    /// Resume the action interrupted by sign-in
    Resume {
        /// Return URL handed back by the sign-in page
        return_url: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Manage saved contracts
    Contracts {
        #[command(subcommand)]
        action: ContractsAction,
    },
    /// Edit a saved contract block by block
    Editor {
        #[command(subcommand)]
        action: EditorAction,
    },
    /// Manage the address book
    Clients {
        #[command(subcommand)]
        action: ClientsAction,
    },
    /// Show or configure the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum WizardAction {
    /// Report warnings per step and overall completeness
    Check { data: PathBuf },
    /// Suggest contract types from a project description
    Analyze { description: String },
    /// Render the contract preview
    Preview { data: PathBuf },
    /// Generate the PDF (signs in first when anonymous)
    Pdf {
        data: PathBuf,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save a final contract and open it in the editor
    Editor {
        data: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Load a stored contract back into the last step
    Finalize { contract_id: String },
}

#[derive(Subcommand)]
enum ContractsAction {
    /// List contracts
    List {
        #[arg(long)]
        drafts: bool,
    },
    Show { id: String },
    Delete { id: String },
    /// Validate a draft under a final title
    Finalize { id: String, title: String },
    Rename { id: String, title: String },
    /// Download the JSON export
    Export {
        id: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a JSON export
    Import { file: PathBuf },
    /// Drafts flagged by a failed security check
    Alerts,
    DismissAlert { draft_id: String },
}

#[derive(Subcommand)]
enum EditorAction {
    /// Print the document
    Show {
        contract_id: String,
        /// Only the article headings
        #[arg(long)]
        sections: bool,
    },
    Title { contract_id: String, title: String },
    /// Replace the text of a paragraph
    Edit {
        contract_id: String,
        index: usize,
        text: String,
    },
    /// Swap an element with its neighbour
    Move {
        contract_id: String,
        index: usize,
        direction: Direction,
    },
    Comment {
        contract_id: String,
        index: usize,
        text: String,
        #[arg(long, default_value = "")]
        selected: String,
    },
    UpdateComment {
        contract_id: String,
        comment_id: String,
        text: String,
    },
    DeleteComment {
        contract_id: String,
        comment_id: String,
    },
    /// Save, then download the JSON export
    Export {
        contract_id: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ClientsAction {
    List,
    /// Add a client from a JSON record
    Add { file: PathBuf },
    Update { id: String, file: PathBuf },
    Remove { id: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Select { kind: ProfileKind },
    /// Set a field of the selected profile variant
    Set { field: String, value: String },
    /// Validate the selected variant
    Configure,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => MoveDirection::Up,
            Direction::Down => MoveDirection::Down,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileKind {
    Physical,
    Legal,
}

impl From<ProfileKind> for EntityType {
    fn from(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Physical => EntityType::PhysicalPerson,
            ProfileKind::Legal => EntityType::LegalEntity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::build(cli.config, cli.user)?;
    let result = run(&ctx, cli.command).await;
    ctx.shutdown();
    result
}

async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Wizard { action } => match action {
            WizardAction::Check { data } => commands::wizard::check(ctx, &data).await?,
            WizardAction::Analyze { description } => {
                commands::wizard::analyze(ctx, &description).await?
            }
            WizardAction::Preview { data } => commands::wizard::preview(ctx, &data).await?,
            WizardAction::Pdf {
                data,
                filename,
                out,
            } => {
                commands::wizard::pdf(ctx, &data, filename.as_deref(), out.as_deref()).await?
            }
            WizardAction::Editor { data, title } => {
                commands::wizard::editor(ctx, &data, title.as_deref()).await?
            }
            WizardAction::Finalize { contract_id } => {
                commands::wizard::finalize(ctx, &contract_id).await?
            }
        },
        Commands::Resume { return_url, out } => {
            commands::resume::run(ctx, return_url.as_deref(), out.as_deref()).await?
        }
        Commands::Contracts { action } => match action {
            ContractsAction::List { drafts } => commands::contracts::list(ctx, drafts).await?,
            ContractsAction::Show { id } => commands::contracts::show(ctx, &id).await?,
            ContractsAction::Delete { id } => commands::contracts::delete(ctx, &id).await?,
            ContractsAction::Finalize { id, title } => {
                commands::contracts::finalize(ctx, &id, &title).await?
            }
            ContractsAction::Rename { id, title } => {
                commands::contracts::rename(ctx, &id, &title).await?
            }
            ContractsAction::Export { id, filename, out } => {
                commands::contracts::export(ctx, &id, filename.as_deref(), out.as_deref()).await?
            }
            ContractsAction::Import { file } => commands::contracts::import(ctx, &file).await?,
            ContractsAction::Alerts => commands::contracts::alerts(ctx).await?,
            ContractsAction::DismissAlert { draft_id } => {
                commands::contracts::dismiss_alert(ctx, &draft_id)?
            }
        },
        Commands::Editor { action } => {
            let (contract_id, change) = match action {
                EditorAction::Show {
                    contract_id,
                    sections,
                } => return commands::editor::show(ctx, &contract_id, sections).await,
                EditorAction::Export {
                    contract_id,
                    filename,
                    out,
                } => {
                    return commands::editor::export(
                        ctx,
                        &contract_id,
                        filename.as_deref(),
                        out.as_deref(),
                    )
                    .await;
                }
                EditorAction::Title { contract_id, title } => {
                    (contract_id, EditorChange::SetTitle(title))
                }
                EditorAction::Edit {
                    contract_id,
                    index,
                    text,
                } => (contract_id, EditorChange::Edit { index, text }),
                EditorAction::Move {
                    contract_id,
                    index,
                    direction,
                } => (
                    contract_id,
                    EditorChange::Move {
                        index,
                        direction: direction.into(),
                    },
                ),
                EditorAction::Comment {
                    contract_id,
                    index,
                    text,
                    selected,
                } => (
                    contract_id,
                    EditorChange::Comment {
                        index,
                        text,
                        selected_text: selected,
                    },
                ),
                EditorAction::UpdateComment {
                    contract_id,
                    comment_id,
                    text,
                } => (
                    contract_id,
                    EditorChange::UpdateComment {
                        id: comment_id,
                        text,
                    },
                ),
                EditorAction::DeleteComment {
                    contract_id,
                    comment_id,
                } => (contract_id, EditorChange::DeleteComment { id: comment_id }),
            };
            commands::editor::apply(ctx, &contract_id, change).await?
        }
        Commands::Clients { action } => match action {
            ClientsAction::List => commands::clients::list(ctx).await?,
            ClientsAction::Add { file } => commands::clients::add(ctx, &file).await?,
            ClientsAction::Update { id, file } => {
                commands::clients::update(ctx, &id, &file).await?
            }
            ClientsAction::Remove { id } => commands::clients::remove(ctx, &id).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(ctx).await?,
            ProfileAction::Select { kind } => commands::profile::select(ctx, kind.into()).await?,
            ProfileAction::Set { field, value } => {
                commands::profile::set(ctx, &field, &value).await?
            }
            ProfileAction::Configure => commands::profile::configure(ctx).await?,
        },
        Commands::Config => {
            println!("# {}", ctx.config_path.display());
            commands::utils::print_json(&ctx.config)?;
        }
    }

    Ok(())
}
