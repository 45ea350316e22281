//! Event management commands for CLI.

use campusboard_core::{EventDraft, EventRef};
use clap::Subcommand;

use super::open_catalog;

#[derive(Subcommand)]
pub enum EventAction {
    /// Add an event (skipped if the name already exists)
    Add {
        /// Event name
        #[arg(long)]
        name: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Category or venue
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        organizer: String,
        #[arg(long, default_value = "")]
        url: String,
    },
    /// List all events
    List,
    /// Get an event by name (case-insensitive)
    Get {
        /// Event name
        name: String,
    },
    /// List events in a category (case-insensitive)
    Category {
        /// Category name
        category: String,
    },
    /// Update an event; unspecified fields keep their value
    Update {
        /// Position in `event list` or event name
        target: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        organizer: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Position in `event list` or event name
        target: String,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_, catalog) = open_catalog()?;

    match action {
        EventAction::Add {
            name,
            date,
            category,
            description,
            organizer,
            url,
        } => {
            let draft = EventDraft {
                name,
                date,
                category,
                organizer,
                description,
                url,
            };
            let outcome = catalog.add(&draft)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        EventAction::List => {
            println!("{}", serde_json::to_string_pretty(&catalog.all()?)?);
        }
        EventAction::Get { name } => {
            println!("{}", serde_json::to_string_pretty(&catalog.get_by_name(&name)?)?);
        }
        EventAction::Category { category } => {
            println!("{}", serde_json::to_string_pretty(&catalog.by_category(&category)?)?);
        }
        EventAction::Update {
            target,
            name,
            date,
            category,
            description,
            organizer,
            url,
        } => {
            let target: EventRef = target.parse()?;
            let current = find(&catalog, &target)?.ok_or(format!("Event not found: {target}"))?;

            let mut draft = current.to_draft();
            draft.name = name.unwrap_or(draft.name);
            draft.date = date.unwrap_or(draft.date);
            draft.category = category.unwrap_or(draft.category);
            draft.description = description.unwrap_or(draft.description);
            draft.organizer = organizer.unwrap_or(draft.organizer);
            draft.url = url.unwrap_or(draft.url);

            let updated = catalog.update(&target, &draft)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        EventAction::Delete { target } => {
            let target: EventRef = target.parse()?;
            let removed = catalog.delete(&target)?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
    }
    Ok(())
}

fn find(
    catalog: &campusboard_core::Catalog,
    target: &EventRef,
) -> Result<Option<campusboard_core::Event>, Box<dyn std::error::Error>> {
    Ok(match target {
        EventRef::Index(i) => catalog.all()?.into_iter().nth(*i),
        EventRef::Name(name) => catalog.get_by_name(name)?,
    })
}
