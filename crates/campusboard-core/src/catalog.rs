//! Shared handle over the event store and the similarity index.
//!
//! One mutex guards the store, the cached index and the last-seen file stamp,
//! so mutations are serialized and every read sees a consistent snapshot.
//! The index is rebuilt lazily whenever the store revision moved past the one
//! it was built at.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::error::Result;
use crate::event::{Event, EventDraft};
use crate::recommend::SimilarityIndex;
use crate::storage::{AddOutcome, EventRef, EventStore, LoadReport};
use crate::upcoming::filter_upcoming;

/// Modification time and length of the events file.
type FileStamp = Option<(SystemTime, u64)>;

struct CachedIndex {
    revision: u64,
    index: Option<SimilarityIndex>,
}

struct State {
    store: EventStore,
    cached: Option<CachedIndex>,
    stamp: FileStamp,
}

/// Thread-safe event catalog.
pub struct Catalog {
    state: Mutex<State>,
}

fn file_stamp(path: &Path) -> FileStamp {
    let meta = std::fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

impl State {
    fn index(&mut self) -> Option<&SimilarityIndex> {
        let revision = self.store.revision();
        let fresh = matches!(&self.cached, Some(c) if c.revision == revision);
        if !fresh {
            tracing::debug!(revision, "rebuilding similarity index");
            self.cached = Some(CachedIndex {
                revision,
                index: SimilarityIndex::build(self.store.get_all()),
            });
        }
        self.cached.as_ref().and_then(|c| c.index.as_ref())
    }

    fn touch(&mut self) {
        self.stamp = file_stamp(self.store.path());
    }
}

impl Catalog {
    /// Open the catalog over the events file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::from_store(EventStore::open(path))
    }

    pub fn from_store(store: EventStore) -> Self {
        let stamp = file_stamp(store.path());
        Self {
            state: Mutex::new(State {
                store,
                cached: None,
                stamp,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        Ok(self.state.lock()?)
    }

    /// Reload the store if the file changed since it was last read or written.
    ///
    /// Returns the load report when a reload happened.
    pub fn refresh_if_changed(&self) -> Result<Option<LoadReport>> {
        let mut state = self.lock()?;
        let current = file_stamp(state.store.path());
        if current == state.stamp {
            return Ok(None);
        }
        tracing::info!(path = %state.store.path().display(), "events file changed, reloading");
        let report = state.store.reload();
        state.stamp = current;
        Ok(Some(report))
    }

    pub fn add(&self, draft: &EventDraft) -> Result<AddOutcome> {
        let mut state = self.lock()?;
        let outcome = state.store.add(draft)?;
        state.touch();
        Ok(outcome)
    }

    pub fn update(&self, target: &EventRef, draft: &EventDraft) -> Result<Event> {
        let mut state = self.lock()?;
        let updated = state.store.update(target, draft)?.clone();
        state.touch();
        Ok(updated)
    }

    pub fn delete(&self, target: &EventRef) -> Result<Event> {
        let mut state = self.lock()?;
        let removed = state.store.delete(target)?;
        state.touch();
        Ok(removed)
    }

    /// All events in insertion order.
    pub fn all(&self) -> Result<Vec<Event>> {
        Ok(self.lock()?.store.get_all().to_vec())
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Event>> {
        Ok(self.lock()?.store.get_by_name(name).cloned())
    }

    pub fn by_category(&self, category: &str) -> Result<Vec<Event>> {
        Ok(self
            .lock()?
            .store
            .get_by_category(category)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Events dated within `window_days` of `today`, in insertion order.
    pub fn upcoming(&self, today: NaiveDate, window_days: i64) -> Result<Vec<Event>> {
        let state = self.lock()?;
        Ok(filter_upcoming(state.store.get_all(), today, window_days)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Best matches for `text`, using an index no older than the last mutation.
    pub fn recommend(&self, text: &str, top_n: usize) -> Result<Vec<Event>> {
        let mut state = self.lock()?;
        let picks: Vec<usize> = match state.index() {
            Some(index) => index.query(text, top_n).into_iter().map(|r| r.index).collect(),
            None => return Ok(Vec::new()),
        };
        let events = state.store.get_all();
        Ok(picks.into_iter().map(|i| events[i].clone()).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.store.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.store.is_empty())
    }

    pub fn revision(&self) -> Result<u64> {
        Ok(self.lock()?.store.revision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn draft(name: &str, description: &str, date: &str) -> EventDraft {
        EventDraft {
            name: name.into(),
            date: date.into(),
            category: "Tech".into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn recommend_sees_mutation_immediately() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path().join("events.json"));
        assert!(catalog.recommend("robotics", 3).unwrap().is_empty());

        catalog
            .add(&draft("Robot Wars", "robotics competition", "2025-01-10"))
            .unwrap();
        let picks = catalog.recommend("robotics", 3).unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].name, "Robot Wars");

        catalog.delete(&EventRef::Index(0)).unwrap();
        assert!(catalog.recommend("robotics", 3).unwrap().is_empty());
    }

    #[test]
    fn refresh_picks_up_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        let catalog = Catalog::open(&path);
        catalog.add(&draft("Hackathon", "", "2025-01-10")).unwrap();
        assert!(catalog.refresh_if_changed().unwrap().is_none());

        std::fs::write(
            &path,
            r#"[{"name": "Hackathon", "date": "2025-01-10"}, {"name": "Career Fair", "date": "2025-01-11"}]"#,
        )
        .unwrap();
        let report = catalog.refresh_if_changed().unwrap();
        assert!(report.is_some_and(|r| r.is_clean()));
        assert_eq!(catalog.len().unwrap(), 2);
        assert!(catalog.get_by_name("career fair").unwrap().is_some());
    }

    #[test]
    fn concurrent_adds_are_serialized() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(Catalog::open(dir.path().join("events.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    catalog
                        .add(&draft(&format!("Talk {i}"), "", "2025-01-10"))
                        .unwrap();
                    // every thread also races the same duplicate
                    catalog.add(&draft("Keynote", "", "2025-01-10")).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(catalog.len().unwrap(), 9);
        let reopened = EventStore::open(dir.path().join("events.json"));
        assert_eq!(reopened.len(), 9);
    }

    #[test]
    fn upcoming_uses_snapshot() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path().join("events.json"));
        catalog.add(&draft("Soon", "", "2025-01-10")).unwrap();
        catalog.add(&draft("Later", "", "2025-03-01")).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let upcoming = catalog.upcoming(today, 7).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "Soon");
    }
}
