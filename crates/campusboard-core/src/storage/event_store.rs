//! JSON-file event store.
//!
//! Holds the canonical event list in insertion order together with two
//! derived indexes:
//! - a name index (lower-cased name -> position), unique
//! - a category index (lower-cased category -> positions, insertion order)
//!
//! Every successful mutation rewrites the whole file. The rewrite goes through
//! a temp file in the same directory and an atomic rename, so a crash can
//! lose the latest mutation but never leaves a half-written file behind.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::event::{normalize_key, Event, EventDraft, EventRecord};

/// Identifies an event for update/delete: its position or its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRef {
    Index(usize),
    Name(String),
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRef::Index(i) => write!(f, "#{i}"),
            EventRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<usize> for EventRef {
    fn from(index: usize) -> Self {
        EventRef::Index(index)
    }
}

impl From<&str> for EventRef {
    fn from(name: &str) -> Self {
        EventRef::Name(name.to_string())
    }
}

impl FromStr for EventRef {
    type Err = std::convert::Infallible;

    /// Digits select by position, anything else by name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(index) => EventRef::Index(index),
            Err(_) => EventRef::Name(s.to_string()),
        })
    }
}

/// Result of [`EventStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    /// The event was appended at `index`.
    Added { index: usize },
    /// An event with the same name (ignoring case) already exists; nothing changed.
    DuplicateSkipped,
}

/// A problem recovered from while loading the events file.
///
/// Skipped elements are not kept anywhere: the next successful mutation
/// rewrites the file from the loaded events, so they are dropped from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// The file could not be read or is not a JSON array; the store starts empty.
    MalformedFile { message: String },
    /// Element `index` is not an event object and was skipped.
    MalformedRecord { index: usize, message: String },
    /// Element `index` had no usable date; today's date was used.
    InvalidDate { index: usize, value: Option<String> },
    /// Element `index` had no name and was skipped.
    MissingName { index: usize },
    /// Element `index` repeats an earlier name and was skipped.
    DuplicateName { index: usize, name: String },
}

/// Warnings collected by a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn push(&mut self, warning: LoadWarning) {
        tracing::warn!(?warning, "recovered while loading events");
        self.warnings.push(warning);
    }
}

/// Event store backed by a JSON file.
#[derive(Debug)]
pub struct EventStore {
    path: PathBuf,
    events: Vec<Event>,
    by_name: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>,
    revision: u64,
}

impl EventStore {
    /// Open the store at `path`. A missing file gives an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with_report(path, Local::now().date_naive()).0
    }

    /// Open the store, using `today` for records without a usable date.
    pub fn open_with_report(path: impl Into<PathBuf>, today: NaiveDate) -> (Self, LoadReport) {
        let mut store = Self {
            path: path.into(),
            events: Vec::new(),
            by_name: HashMap::new(),
            by_category: HashMap::new(),
            revision: 0,
        };
        let report = store.load(today);
        (store, report)
    }

    /// Discard in-memory state and read the file again.
    pub fn reload(&mut self) -> LoadReport {
        let report = self.load(Local::now().date_naive());
        self.revision += 1;
        report
    }

    fn load(&mut self, today: NaiveDate) -> LoadReport {
        let mut report = LoadReport::default();
        self.events.clear();

        if self.path.exists() {
            match read_records(&self.path) {
                Ok(values) => {
                    for (index, value) in values.into_iter().enumerate() {
                        self.load_record(index, value, today, &mut report);
                    }
                }
                Err(message) => report.push(LoadWarning::MalformedFile { message }),
            }
        }

        self.reindex();
        tracing::debug!(path = %self.path.display(), count = self.events.len(), "loaded events");
        report
    }

    fn load_record(
        &mut self,
        index: usize,
        value: serde_json::Value,
        today: NaiveDate,
        report: &mut LoadReport,
    ) {
        let record: EventRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                report.push(LoadWarning::MalformedRecord {
                    index,
                    message: e.to_string(),
                });
                return;
            }
        };

        let Some(event) = Event::from_record(&record, today) else {
            report.push(LoadWarning::MissingName { index });
            return;
        };

        if self.events.iter().any(|e| e.key() == event.key()) {
            report.push(LoadWarning::DuplicateName {
                index,
                name: event.name,
            });
            return;
        }

        if record.parsed_date().is_none() {
            report.push(LoadWarning::InvalidDate {
                index,
                value: record.date.clone(),
            });
        }
        self.events.push(event);
    }

    /// Rewrite the whole events file.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.events)?;
        write_atomic(&self.path, content.as_bytes()).map_err(|source| StoreError::SaveFailed {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), count = self.events.len(), "saved events");
        Ok(())
    }

    /// Add an event unless one with the same name already exists.
    pub fn add(&mut self, draft: &EventDraft) -> Result<AddOutcome> {
        let event = Event::from_draft(draft)?;
        if self.by_name.contains_key(&event.key()) {
            tracing::debug!(name = %event.name, "duplicate add skipped");
            return Ok(AddOutcome::DuplicateSkipped);
        }

        let previous = self.events.clone();
        let index = self.events.len();
        tracing::info!(name = %event.name, index, "adding event");
        self.events.push(event);
        self.commit(previous)?;
        Ok(AddOutcome::Added { index })
    }

    /// Case-insensitive exact lookup by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Event> {
        self.by_name
            .get(&normalize_key(name))
            .map(|&pos| &self.events[pos])
    }

    /// Events in the given category, in insertion order.
    pub fn get_by_category(&self, category: &str) -> Vec<&Event> {
        self.by_category
            .get(&normalize_key(category))
            .map(|positions| positions.iter().map(|&pos| &self.events[pos]).collect())
            .unwrap_or_default()
    }

    /// All events in insertion order.
    pub fn get_all(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Overwrite every field of the target event, keeping its position.
    ///
    /// A changed category moves the event to the new category bucket.
    pub fn update(&mut self, target: &EventRef, draft: &EventDraft) -> Result<&Event> {
        let pos = self.resolve(target)?;
        let event = Event::from_draft(draft)?;
        if let Some(&other) = self.by_name.get(&event.key()) {
            if other != pos {
                return Err(StoreError::DuplicateName(event.name).into());
            }
        }

        let previous = self.events.clone();
        tracing::info!(event_ref = %target, name = %event.name, "updating event");
        self.events[pos] = event;
        self.commit(previous)?;
        Ok(&self.events[pos])
    }

    /// Remove the target event and return it.
    pub fn delete(&mut self, target: &EventRef) -> Result<Event> {
        let pos = self.resolve(target)?;
        let previous = self.events.clone();
        let removed = self.events.remove(pos);
        tracing::info!(event_ref = %target, name = %removed.name, "deleting event");
        self.commit(previous)?;
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Counter bumped by every successful mutation or reload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, target: &EventRef) -> Result<usize, StoreError> {
        let found = match target {
            EventRef::Index(i) => (*i < self.events.len()).then_some(*i),
            EventRef::Name(name) => self.by_name.get(&normalize_key(name)).copied(),
        };
        found.ok_or_else(|| StoreError::NotFound(target.clone()))
    }

    /// Reindex and persist; restore `previous` if the write fails.
    fn commit(&mut self, previous: Vec<Event>) -> Result<()> {
        self.reindex();
        if let Err(e) = self.save() {
            self.events = previous;
            self.reindex();
            return Err(e);
        }
        self.revision += 1;
        Ok(())
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        self.by_category.clear();
        for (pos, event) in self.events.iter().enumerate() {
            self.by_name.entry(event.key()).or_insert(pos);
            self.by_category
                .entry(event.category_key())
                .or_default()
                .push(pos);
        }
    }
}

fn read_records(path: &Path) -> std::result::Result<Vec<serde_json::Value>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
