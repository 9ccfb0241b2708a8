// ABOUTME: `folio tags` subcommands
// ABOUTME: Manage tags, attach them to documents and list tagged documents per viewer

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;
use folio_cli::App;
use folio_core::{truncate, Color};
use folio_security::User;
use folio_tags::{Tag, TagCreateInput, TagUpdateInput};

use super::utils::{find_tag, format_date, new_table, require_viewer};

#[derive(Subcommand)]
pub enum TagsCommands {
    /// List tags (only viewable ones when --as is given)
    List {
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a tag
    Add {
        /// Tag label (max 128 characters)
        label: String,
        /// Color as #RRGGBB
        #[arg(short, long, default_value = "#999999")]
        color: Color,
    },
    /// Show a tag by ID or label
    Show { tag: String },
    /// Change a tag's label or color
    Edit {
        tag: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        color: Option<Color>,
    },
    /// Delete a tag and its document relations
    Delete { tag: String },
    /// Attach a tag to a document
    Attach { tag: String, document: String },
    /// Remove a tag from a document
    Remove { tag: String, document: String },
    /// List the documents carrying a tag that the --as user may view
    Documents { tag: String },
    /// Print a tag's HTML preview widget
    Widget { tag: String },
}

pub async fn handle_tags_command(
    app: &App,
    command: TagsCommands,
    user: Option<&User>,
) -> Result<()> {
    match command {
        TagsCommands::List {
            limit,
            offset,
            json,
        } => list_tags(app, user, limit, offset, json).await,
        TagsCommands::Add { label, color } => {
            let tag = app
                .tags
                .create_tag(TagCreateInput { label, color }, user)
                .await?;
            println!(
                "{}",
                format!("✅ Tag '{}' created ({})", tag.label, tag.id).green()
            );
            Ok(())
        }
        TagsCommands::Show { tag } => {
            let tag = find_tag(app, &tag).await?;
            print_tag_details(&tag);
            if let Some(viewer) = user {
                let count = app.tags.get_document_count(&tag.id, viewer).await?;
                println!("{:<10} {}", "Documents:".cyan(), count);
            }
            Ok(())
        }
        TagsCommands::Edit { tag, label, color } => {
            if label.is_none() && color.is_none() {
                bail!("Nothing to change; pass --label and/or --color");
            }
            let tag = find_tag(app, &tag).await?;
            let updated = app
                .tags
                .update_tag(&tag.id, TagUpdateInput { label, color }, user)
                .await?;
            if updated == tag {
                println!("{}", "Tag unchanged".yellow());
            } else {
                println!("{}", format!("✅ Tag '{}' updated", updated.label).green());
            }
            Ok(())
        }
        TagsCommands::Delete { tag } => {
            let tag = find_tag(app, &tag).await?;
            app.tags.delete_tag(&tag.id).await?;
            println!("{}", format!("✅ Tag '{}' deleted", tag.label).green());
            Ok(())
        }
        TagsCommands::Attach { tag, document } => {
            let tag = find_tag(app, &tag).await?;
            if app.tags.attach_to(&tag.id, &document, user).await? {
                println!("{}", format!("✅ Tagged {} with '{}'", document, tag.label).green());
            } else {
                println!("{}", format!("{} already tagged with '{}'", document, tag.label).yellow());
            }
            Ok(())
        }
        TagsCommands::Remove { tag, document } => {
            let tag = find_tag(app, &tag).await?;
            if app.tags.remove_from(&tag.id, &document, user).await? {
                println!("{}", format!("✅ Removed '{}' from {}", tag.label, document).green());
            } else {
                println!("{}", format!("{} was not tagged with '{}'", document, tag.label).yellow());
            }
            Ok(())
        }
        TagsCommands::Documents { tag } => {
            let viewer = require_viewer(user)?;
            let tag = find_tag(app, &tag).await?;
            let documents = app.tags.get_documents(&tag.id, viewer).await?;

            if documents.is_empty() {
                println!("{}", format!("No visible documents tagged '{}'", tag.label).yellow());
                return Ok(());
            }

            let mut table = new_table(["ID", "Label", "Created"]);
            for document in &documents {
                table.add_row(vec![
                    document.id.clone(),
                    truncate(&document.label, 40),
                    format_date(&document.created_at),
                ]);
            }
            println!("{}", table);
            println!("Total: {} documents", documents.len().to_string().cyan());
            Ok(())
        }
        TagsCommands::Widget { tag } => {
            let tag = find_tag(app, &tag).await?;
            println!("{}", tag.preview_widget());
            Ok(())
        }
    }
}

async fn list_tags(
    app: &App,
    user: Option<&User>,
    limit: Option<i64>,
    offset: Option<i64>,
    json: bool,
) -> Result<()> {
    let (tags, total): (Vec<Tag>, i64) = match user {
        Some(viewer) => {
            let tags = app.tags.list_tags_for_user(viewer).await?;
            let total = tags.len() as i64;
            let page = tags
                .into_iter()
                .skip(offset.unwrap_or(0).max(0) as usize)
                .take(limit.map_or(usize::MAX, |l| l.max(0) as usize))
                .collect();
            (page, total)
        }
        None => app.tags.list_tags_paginated(limit, offset).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    if tags.is_empty() {
        println!("{}", "No tags found".yellow());
        println!("{}", "Use 'folio tags add <label>' to create one".dimmed());
        return Ok(());
    }

    let mut table = new_table(["ID", "Label", "Color", "Created"]);
    for tag in &tags {
        table.add_row(vec![
            tag.id.clone(),
            truncate(&tag.label, 30),
            tag.color.to_hex(),
            format_date(&tag.created_at),
        ]);
    }

    println!("{}", table);
    println!("Showing {} of {} tags", tags.len().to_string().cyan(), total);
    Ok(())
}

fn print_tag_details(tag: &Tag) {
    let (r, g, b) = (tag.color.r, tag.color.g, tag.color.b);
    println!("{:<10} {}", "ID:".cyan(), tag.id);
    println!("{:<10} {}", "Label:".cyan(), tag.label.truecolor(r, g, b).bold());
    println!("{:<10} {}", "Color:".cyan(), tag.color);
    println!("{:<10} {}", "URL:".cyan(), tag.absolute_url());
    println!("{:<10} {}", "Created:".cyan(), format_date(&tag.created_at));
}
