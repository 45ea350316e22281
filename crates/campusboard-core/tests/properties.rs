//! Property tests for the store, the upcoming filter and the recommender.

use campusboard_core::{
    filter_upcoming, AddOutcome, Event, EventDraft, EventRef, EventStore, SimilarityIndex,
};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use tempfile::TempDir;

const WORDS: &[&str] = &[
    "robotics", "music", "chess", "debate", "coding", "film", "poetry", "startup", "career",
    "hiking", "yoga", "theater", "science", "history", "design",
];

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn event(i: usize, offset: u64, words: &[usize]) -> Event {
    let description: Vec<&str> = words.iter().map(|&w| WORDS[w % WORDS.len()]).collect();
    Event::from_draft(&EventDraft {
        name: format!("Event {i}"),
        date: (base_day() + Days::new(offset)).format("%Y-%m-%d").to_string(),
        category: WORDS[i % WORDS.len()].to_string(),
        description: description.join(" "),
        ..Default::default()
    })
    .unwrap()
}

fn events_strategy() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0u64..60, prop::collection::vec(0usize..15, 0..6)), 0..20).prop_map(
        |specs| {
            specs
                .iter()
                .enumerate()
                .map(|(i, (offset, words))| event(i, *offset, words))
                .collect()
        },
    )
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0usize..15, 0..4)
        .prop_map(|ws| ws.iter().map(|&w| WORDS[w]).collect::<Vec<_>>().join(" "))
}

fn flip_case(name: &str, mask: u64) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 64) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn upcoming_stays_inside_window(
        events in events_strategy(),
        start in 0u64..60,
        window in 0i64..30,
    ) {
        let today = base_day() + Days::new(start);
        let end = today + Days::new(window as u64);
        let upcoming = filter_upcoming(&events, today, window);

        for e in &upcoming {
            prop_assert!(e.date >= today && e.date <= end);
        }
        let expected = events.iter().filter(|e| e.date >= today && e.date <= end).count();
        prop_assert_eq!(upcoming.len(), expected);
    }

    #[test]
    fn query_is_bounded_positive_and_sorted(
        events in events_strategy(),
        text in query_strategy(),
        top_n in 0usize..8,
    ) {
        let Some(index) = SimilarityIndex::build(&events) else {
            return Ok(());
        };
        let results = index.query(&text, top_n);

        prop_assert!(results.len() <= top_n);
        for r in &results {
            prop_assert!(r.score > 0.0);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].index < pair[1].index);
            }
        }
    }

    #[test]
    fn rebuild_gives_identical_ranking(events in events_strategy(), text in query_strategy()) {
        let first = SimilarityIndex::build(&events).map(|i| i.query(&text, 5));
        let second = SimilarityIndex::build(&events).map(|i| i.query(&text, 5));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn add_is_idempotent_by_name(name in "[A-Za-z][A-Za-z ]{0,15}", mask in any::<u64>()) {
        let dir = TempDir::new().unwrap();
        let mut store = EventStore::open(dir.path().join("events.json"));
        let draft = EventDraft {
            name: name.clone(),
            date: "2025-01-10".into(),
            category: "Misc".into(),
            ..Default::default()
        };

        prop_assert_eq!(store.add(&draft).unwrap(), AddOutcome::Added { index: 0 });
        let varied = flip_case(&name, mask);
        prop_assert!(store.get_by_name(&varied).is_some());

        let again = EventDraft { name: varied, ..draft };
        prop_assert_eq!(store.add(&again).unwrap(), AddOutcome::DuplicateSkipped);
        prop_assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one(count in 1usize..8, pick in 0usize..10) {
        let dir = TempDir::new().unwrap();
        let mut store = EventStore::open(dir.path().join("events.json"));
        for i in 0..count {
            store.add(&EventDraft {
                name: format!("Event {i}"),
                date: "2025-01-10".into(),
                category: if i % 2 == 0 { "Even".into() } else { "Odd".into() },
                ..Default::default()
            }).unwrap();
        }
        let before = store.get_all().to_vec();

        match store.delete(&EventRef::Index(pick)) {
            Ok(removed) => {
                prop_assert!(pick < count);
                prop_assert_eq!(store.len(), count - 1);
                let bucket = removed.category.clone();
                let expected = before.iter().filter(|e| e.category == bucket).count() - 1;
                prop_assert_eq!(store.get_by_category(&bucket).len(), expected);
                prop_assert!(store.get_by_name(&removed.name).is_none());
            }
            Err(_) => {
                prop_assert!(pick >= count);
                prop_assert_eq!(store.get_all(), before.as_slice());
            }
        }
    }

    #[test]
    fn save_then_load_round_trips(events in events_strategy()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        let mut store = EventStore::open(&path);
        for e in &events {
            store.add(&e.to_draft()).unwrap();
        }

        let reopened = EventStore::open(&path);
        prop_assert_eq!(reopened.get_all(), store.get_all());
    }
}
