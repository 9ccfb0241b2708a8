// ABOUTME: `folio events` subcommands
// ABOUTME: Browse the event log written by tag saves and document attachment

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use folio_cli::App;
use folio_core::{ObjectKind, ObjectRef};
use folio_events::{Event, EventQuery, EventType};

use super::utils::{find_user, format_date, new_table};

#[derive(Subcommand)]
pub enum EventsCommands {
    /// List events, newest first
    List {
        /// Event type, e.g. tags.tag_attached
        #[arg(long = "type")]
        event_type: Option<EventType>,
        /// Only events performed by this username
        #[arg(long)]
        actor: Option<String>,
        /// Only events targeting this document ID
        #[arg(long)]
        document: Option<String>,
        #[arg(long, default_value = "50")]
        limit: i64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Events where an object is the target or the action object
    For {
        /// tag, document or user
        kind: ObjectKind,
        id: String,
    },
}

pub async fn handle_events_command(app: &App, command: EventsCommands) -> Result<()> {
    match command {
        EventsCommands::List {
            event_type,
            actor,
            document,
            limit,
            json,
        } => {
            let actor_id = match actor {
                Some(username) => Some(find_user(app, &username).await?.id),
                None => None,
            };

            let events = app
                .events
                .list_events(EventQuery {
                    event_type,
                    actor_id,
                    target: document.map(ObjectRef::document),
                    limit: Some(limit),
                    ..Default::default()
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
                return Ok(());
            }
            print_events(&events);
        }
        EventsCommands::For { kind, id } => {
            let events = app.events.list_for_object(&ObjectRef::new(kind, id)).await?;
            print_events(&events);
        }
    }

    Ok(())
}

fn print_events(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events found".yellow());
        return;
    }

    let mut table = new_table(["When", "Event", "Actor", "Action object", "Target"]);
    for event in events {
        table.add_row(vec![
            format_date(&event.created_at),
            event.event_type.label().to_string(),
            event.actor_id.clone().unwrap_or_else(|| "—".to_string()),
            event
                .action_object
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            event.target.to_string(),
        ]);
    }
    println!("{}", table);
}
