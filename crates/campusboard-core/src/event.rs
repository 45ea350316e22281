//! College event model.
//!
//! Three shapes of the same event exist:
//! - [`Event`]: the validated, typed event held by the store.
//! - [`EventRecord`]: one element of the persisted JSON array, as read. Every
//!   field is optional and both historical field spellings are accepted.
//! - [`EventDraft`]: untyped field data handed in by a caller for add/update.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::parse_date;
use crate::error::ValidationError;

/// A college event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub category: String,
    pub organizer: String,
    pub description: String,
    pub url: String,
}

/// Persisted form of an event as it appears in the events file.
///
/// `title` and `venue` are the spellings used by older files; they are only
/// consulted when `name` / `category` are absent. Unknown fields are ignored.
/// A `date` of any JSON type is accepted; non-string values are kept as their
/// JSON text so they fail to parse instead of rejecting the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Untyped event fields supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Lower-cased form of a text field used for case-insensitive identity.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

impl Event {
    /// Validate a draft into an event.
    pub fn from_draft(draft: &EventDraft) -> Result<Self, ValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let date =
            parse_date(&draft.date).ok_or_else(|| ValidationError::InvalidDate(draft.date.clone()))?;

        Ok(Self {
            name: name.to_string(),
            date,
            category: draft.category.trim().to_string(),
            organizer: draft.organizer.trim().to_string(),
            description: draft.description.trim().to_string(),
            url: draft.url.trim().to_string(),
        })
    }

    /// Convert a persisted record, substituting `today` for a missing or
    /// unparsable date. Returns `None` when the record carries no name.
    pub fn from_record(record: &EventRecord, today: NaiveDate) -> Option<Self> {
        let name = record
            .name
            .as_deref()
            .or(record.title.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())?;

        Some(Self {
            name: name.to_string(),
            date: record.parsed_date().unwrap_or(today),
            category: record.category_text().to_string(),
            organizer: record.organizer.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            url: record.url.clone().unwrap_or_default(),
        })
    }

    /// Field data for editing this event.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            date: self.date.format(crate::dates::DATE_FORMAT).to_string(),
            category: self.category.clone(),
            organizer: self.organizer.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
        }
    }

    /// Identity key: the lower-cased name.
    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }

    /// Category bucket key.
    pub fn category_key(&self) -> String {
        normalize_key(&self.category)
    }

    /// Text the recommender indexes: name, description and category/venue.
    pub fn corpus_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.category)
    }
}

impl EventRecord {
    /// The record's date, if present and well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }

    fn category_text(&self) -> &str {
        self.category
            .as_deref()
            .or(self.venue.as_deref())
            .unwrap_or_default()
    }
}
