//! Upcoming-window filter.
//!
//! Selects the events that fall in the inclusive range
//! `today ..= today + window_days`.

use chrono::{Days, NaiveDate};

use crate::event::{Event, EventRecord};

/// Anything that may carry a calendar date.
pub trait Dated {
    /// The item's date, or `None` when it has no usable date.
    fn event_date(&self) -> Option<NaiveDate>;
}

impl Dated for Event {
    fn event_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl Dated for EventRecord {
    fn event_date(&self) -> Option<NaiveDate> {
        self.parsed_date()
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn event_date(&self) -> Option<NaiveDate> {
        (**self).event_date()
    }
}

/// Returns the items dated within `window_days` days from `today`, in input order.
///
/// Items without a usable date are skipped. A negative window matches nothing.
pub fn filter_upcoming<T: Dated>(items: &[T], today: NaiveDate, window_days: i64) -> Vec<&T> {
    let Ok(window) = u64::try_from(window_days) else {
        return Vec::new();
    };
    let end = today
        .checked_add_days(Days::new(window))
        .unwrap_or(NaiveDate::MAX);

    items
        .iter()
        .filter(|item| {
            item.event_date()
                .is_some_and(|date| date >= today && date <= end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(name: &str, date: &str) -> Event {
        Event::from_draft(&EventDraft {
            name: name.into(),
            date: date.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let events = vec![
            event("Yesterday", "2025-01-08"),
            event("Today", "2025-01-09"),
            event("Edge", "2025-01-16"),
            event("Too Late", "2025-01-17"),
        ];
        let names: Vec<_> = filter_upcoming(&events, day(2025, 1, 9), 7)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Today", "Edge"]);
    }

    #[test]
    fn preserves_input_order() {
        let events = vec![
            event("Later", "2025-01-14"),
            event("Sooner", "2025-01-10"),
        ];
        let names: Vec<_> = filter_upcoming(&events, day(2025, 1, 9), 7)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Later", "Sooner"]);
    }

    #[test]
    fn unparsable_record_dates_are_skipped() {
        let records = vec![
            EventRecord {
                name: Some("Ok".into()),
                date: Some("2025-01-10".into()),
                ..Default::default()
            },
            EventRecord {
                name: Some("Broken".into()),
                date: Some("someday".into()),
                ..Default::default()
            },
            EventRecord {
                name: Some("Missing".into()),
                ..Default::default()
            },
        ];
        let upcoming = filter_upcoming(&records, day(2025, 1, 9), 7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name.as_deref(), Some("Ok"));
    }

    #[test]
    fn zero_and_negative_windows() {
        let events = vec![event("Today", "2025-01-09"), event("Tomorrow", "2025-01-10")];
        assert_eq!(filter_upcoming(&events, day(2025, 1, 9), 0).len(), 1);
        assert!(filter_upcoming(&events, day(2025, 1, 9), -1).is_empty());
    }

    #[test]
    fn huge_window_saturates() {
        let events = vec![event("Far", "9999-12-31")];
        assert_eq!(filter_upcoming(&events, day(2025, 1, 9), i64::MAX).len(), 1);
    }
}
