// ABOUTME: `folio documents` subcommands
// ABOUTME: Manage documents and show the tags attached to them

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use folio_cli::App;
use folio_core::truncate;
use folio_documents::DocumentCreateInput;
use folio_security::User;
use folio_tags::render_tags;

use super::utils::{format_date, new_table, require_viewer};

#[derive(Subcommand)]
pub enum DocumentsCommands {
    /// List all documents
    List,
    /// Create a document
    Add {
        /// Document label
        label: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show a document
    Show {
        /// Document ID
        id: String,
    },
    /// List the tags on a document visible to the --as user
    Tags {
        /// Document ID
        id: String,
        /// Print HTML tag widgets instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
}

pub async fn handle_documents_command(
    app: &App,
    command: DocumentsCommands,
    viewer: Option<&User>,
) -> Result<()> {
    match command {
        DocumentsCommands::List => list_documents(app).await,
        DocumentsCommands::Add { label, description } => {
            let document = app
                .documents
                .create_document(DocumentCreateInput { label, description })
                .await?;
            println!(
                "{}",
                format!("✅ Document '{}' created ({})", document.label, document.id).green()
            );
            Ok(())
        }
        DocumentsCommands::Show { id } => {
            let document = app.documents.get_document(&id).await?;
            println!("{:<14} {}", "ID:".cyan(), document.id);
            println!("{:<14} {}", "Label:".cyan(), document.label);
            if let Some(description) = &document.description {
                println!("{:<14} {}", "Description:".cyan(), description);
            }
            println!("{:<14} {}", "Created:".cyan(), format_date(&document.created_at));
            Ok(())
        }
        DocumentsCommands::Tags { id, html } => {
            let viewer = require_viewer(viewer)?;
            let tags = app.tags.document_tags(&id, viewer).await?;

            if tags.is_empty() {
                println!("{}", "No visible tags on this document".yellow());
                return Ok(());
            }

            if html {
                println!("{}", render_tags(&tags));
                return Ok(());
            }

            let mut table = new_table(["ID", "Label", "Color"]);
            for tag in &tags {
                table.add_row(vec![tag.id.clone(), tag.label.clone(), tag.color.to_hex()]);
            }
            println!("{}", table);
            Ok(())
        }
        DocumentsCommands::Delete { id } => {
            app.documents.delete_document(&id).await?;
            println!("{}", format!("✅ Document {} deleted", id).green());
            Ok(())
        }
    }
}

async fn list_documents(app: &App) -> Result<()> {
    let documents = app.documents.list_documents().await?;

    if documents.is_empty() {
        println!("{}", "No documents found".yellow());
        return Ok(());
    }

    let mut table = new_table(["ID", "Label", "Description", "Created"]);
    for document in &documents {
        table.add_row(vec![
            document.id.clone(),
            truncate(&document.label, 40),
            document
                .description
                .as_deref()
                .map(|d| truncate(d, 40))
                .unwrap_or_default(),
            format_date(&document.created_at),
        ]);
    }

    println!("{}", table);
    println!("Total: {} documents", documents.len().to_string().cyan());
    Ok(())
}
