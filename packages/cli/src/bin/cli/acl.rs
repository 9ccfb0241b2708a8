// ABOUTME: `folio acl` subcommands
// ABOUTME: Grant, revoke and check view permissions on documents and tags

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use folio_cli::App;
use folio_security::Permission;

use super::utils::find_user;

#[derive(Subcommand)]
pub enum AclCommands {
    /// Grant a permission, on one object or on all objects of its kind
    Grant {
        /// User receiving the grant
        username: String,
        /// documents.document_view or tags.tag_view
        permission: Permission,
        /// Object ID; omit to grant on every object of the kind
        #[arg(long)]
        object: Option<String>,
    },
    /// Revoke a grant
    Revoke {
        username: String,
        permission: Permission,
        /// Object ID; omit to revoke the global grant
        #[arg(long)]
        object: Option<String>,
    },
    /// Check whether a user may view an object
    Check {
        username: String,
        permission: Permission,
        object: String,
    },
}

pub async fn handle_acl_command(app: &App, command: AclCommands) -> Result<()> {
    match command {
        AclCommands::Grant {
            username,
            permission,
            object,
        } => {
            let user = find_user(app, &username).await?;
            match object.as_deref() {
                Some(object_id) => app.acl.grant(&user.id, permission, object_id).await?,
                None => app.acl.grant_global(&user.id, permission).await?,
            }
            println!(
                "{}",
                format!(
                    "✅ Granted {} to '{}' on {}",
                    permission,
                    username,
                    object.as_deref().unwrap_or("all objects")
                )
                .green()
            );
        }
        AclCommands::Revoke {
            username,
            permission,
            object,
        } => {
            let user = find_user(app, &username).await?;
            let revoked = match object.as_deref() {
                Some(object_id) => app.acl.revoke(&user.id, permission, object_id).await?,
                None => app.acl.revoke_global(&user.id, permission).await?,
            };
            if revoked {
                println!("{}", format!("✅ Revoked {} from '{}'", permission, username).green());
            } else {
                println!("{}", "No matching grant found".yellow());
            }
        }
        AclCommands::Check {
            username,
            permission,
            object,
        } => {
            let user = find_user(app, &username).await?;
            if app.acl.has_permission(&user, permission, &object).await? {
                println!("{}", format!("'{}' holds {} on {}", username, permission, object).green());
            } else {
                println!("{}", format!("'{}' lacks {} on {}", username, permission, object).red());
            }
        }
    }

    Ok(())
}
