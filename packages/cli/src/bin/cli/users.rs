// ABOUTME: `folio users` subcommands
// ABOUTME: Create and list the users that act on and view tags

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use folio_cli::App;
use folio_security::UserCreateInput;

use super::utils::{find_user, format_date, new_table};

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all users
    List,
    /// Create a user
    Add {
        /// Unique username
        username: String,
        /// Grant every permission implicitly
        #[arg(long)]
        superuser: bool,
    },
    /// Show a user and their grants
    Show {
        /// Username to show
        username: String,
    },
}

pub async fn handle_users_command(app: &App, command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List => list_users(app).await,
        UsersCommands::Add {
            username,
            superuser,
        } => add_user(app, username, superuser).await,
        UsersCommands::Show { username } => show_user(app, &username).await,
    }
}

async fn list_users(app: &App) -> Result<()> {
    let users = app.users.list_users().await?;

    if users.is_empty() {
        println!("{}", "No users found".yellow());
        println!("{}", "Use 'folio users add <username>' to create one".dimmed());
        return Ok(());
    }

    let mut table = new_table(["ID", "Username", "Superuser", "Created"]);
    for user in &users {
        table.add_row(vec![
            user.id.clone(),
            user.username.clone(),
            if user.is_superuser { "yes" } else { "no" }.to_string(),
            format_date(&user.created_at),
        ]);
    }

    println!("{}", table);
    println!("Total: {} users", users.len().to_string().cyan());
    Ok(())
}

async fn add_user(app: &App, username: String, is_superuser: bool) -> Result<()> {
    let user = app
        .users
        .create_user(UserCreateInput {
            username,
            is_superuser,
        })
        .await?;

    println!(
        "{}",
        format!("✅ User '{}' created ({})", user.username, user.id).green()
    );
    Ok(())
}

async fn show_user(app: &App, username: &str) -> Result<()> {
    let user = find_user(app, username).await?;

    println!("{:<12} {}", "ID:".cyan(), user.id);
    println!("{:<12} {}", "Username:".cyan(), user.username);
    println!(
        "{:<12} {}",
        "Superuser:".cyan(),
        if user.is_superuser { "yes".green() } else { "no".normal() }
    );
    println!("{:<12} {}", "Created:".cyan(), format_date(&user.created_at));

    let entries = app.acl.list_entries(&user.id).await?;
    if entries.is_empty() {
        println!("{:<12} {}", "Grants:".cyan(), "none".dimmed());
        return Ok(());
    }

    println!();
    let mut table = new_table(["Permission", "Object"]);
    for entry in &entries {
        table.add_row(vec![
            entry.permission.to_string(),
            entry
                .object_id
                .clone()
                .unwrap_or_else(|| format!("all {}s", entry.object_kind)),
        ]);
    }
    println!("{}", table);
    Ok(())
}
