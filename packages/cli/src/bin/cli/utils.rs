// ABOUTME: Shared helpers for folio subcommands
// ABOUTME: Table styling, date formatting and lookups of users and tags from command arguments

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use folio_cli::App;
use folio_security::User;
use folio_storage::StorageError;
use folio_tags::Tag;

pub fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// Commands that filter by permission need an explicit viewer
pub fn require_viewer(user: Option<&User>) -> Result<&User> {
    user.ok_or_else(|| anyhow!("This command needs a viewer; pass --as <username>"))
}

pub async fn find_user(app: &App, username: &str) -> Result<User> {
    app.users
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| anyhow!("User '{}' not found", username))
}

/// Resolve a tag by id, falling back to its label
pub async fn find_tag(app: &App, key: &str) -> Result<Tag> {
    match app.tags.get_tag(key).await {
        Ok(tag) => Ok(tag),
        Err(StorageError::NotFound(_)) => app
            .tags
            .get_tag_by_label(key)
            .await?
            .ok_or_else(|| anyhow!("Tag '{}' not found", key)),
        Err(e) => Err(e).context(format!("Failed to load tag '{}'", key)),
    }
}
