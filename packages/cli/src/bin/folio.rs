use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::acl::AclCommands;
use cli::documents::DocumentsCommands;
use cli::events::EventsCommands;
use cli::tags::TagsCommands;
use cli::users::UsersCommands;
use folio_cli::{logging, App, Config};
use tracing::debug;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - tag and organize documents")]
#[command(version)]
struct Cli {
    /// Act and view as this user
    #[arg(long = "as", value_name = "USERNAME", global = true)]
    as_user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    #[command(subcommand)]
    Users(UsersCommands),
    /// Manage view permissions
    #[command(subcommand)]
    Acl(AclCommands),
    /// Manage documents
    #[command(subcommand)]
    Documents(DocumentsCommands),
    /// Manage tags and their documents
    #[command(subcommand)]
    Tags(TagsCommands),
    /// Browse the event log
    #[command(subcommand)]
    Events(EventsCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_level);
    debug!("Using storage config: {:?}", config.storage);

    let app = App::connect(&config.storage).await?;
    let user = app.resolve_user(cli.as_user.as_deref()).await?;

    match cli.command {
        Commands::Users(cmd) => cli::users::handle_users_command(&app, cmd).await,
        Commands::Acl(cmd) => cli::acl::handle_acl_command(&app, cmd).await,
        Commands::Documents(cmd) => {
            cli::documents::handle_documents_command(&app, cmd, user.as_ref()).await
        }
        Commands::Tags(cmd) => cli::tags::handle_tags_command(&app, cmd, user.as_ref()).await,
        Commands::Events(cmd) => cli::events::handle_events_command(&app, cmd).await,
    }
}
