//! Lesson timetable model: calendar entries and the queries the rescheduler
//! needs over them.
//!
//! Dates are ISO-8601 strings, so lexicographic order is chronological order.

mod generate;
mod reschedule;
mod types;

pub use generate::{generate, GenerateError};
pub use reschedule::{CollisionPolicy, RescheduleError, Rescheduled, Rescheduler, Tier};
pub use types::*;
pub(crate) use types::deserialize_present;

/// Returns the first entry on `date`, if any.
pub fn find_by_date<'a>(timetable: &'a [Entry], date: &str) -> Option<&'a Entry> {
    timetable.iter().find(|e| e.date == date)
}

/// Returns every entry strictly after `date`, ascending by date.
///
/// The input does not need to be sorted.
pub fn entries_after<'a>(timetable: &'a [Entry], date: &str) -> Vec<&'a Entry> {
    let mut after: Vec<&Entry> = timetable
        .iter()
        .filter(|e| e.date.as_str() > date)
        .collect();
    after.sort_by(|a, b| a.date.cmp(&b.date));
    after
}

/// Number of entries sharing `date`.
pub fn count_on_date(timetable: &[Entry], date: &str) -> usize {
    timetable.iter().filter(|e| e.date == date).count()
}

/// Stable ascending sort by date.
pub fn sort_by_date(timetable: &mut [Entry]) {
    timetable.sort_by(|a, b| a.date.cmp(&b.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(date: &str, kind: &str) -> Entry {
        Entry::new(date, EntryKind::from(kind), json!(format!("{kind} on {date}")))
    }

    #[test]
    fn test_find_by_date() {
        let tt = vec![entry("2024-01-01", "lecture"), entry("2024-01-02", "holiday")];

        assert_eq!(find_by_date(&tt, "2024-01-02").unwrap().kind, EntryKind::Holiday);
        assert!(find_by_date(&tt, "2024-01-03").is_none());
    }

    #[test]
    fn test_entries_after_ignores_input_order() {
        let tt = vec![
            entry("2024-01-05", "vacant"),
            entry("2024-01-01", "lecture"),
            entry("2024-01-03", "holiday"),
            entry("2024-01-02", "lecture"),
        ];

        let dates: Vec<_> = entries_after(&tt, "2024-01-02")
            .iter()
            .map(|e| e.date.as_str())
            .collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-05"]);
    }

    #[test]
    fn test_count_on_date() {
        let tt = vec![
            entry("2024-01-01", "lecture"),
            entry("2024-01-01", "lecture"),
            entry("2024-01-02", "lecture"),
        ];

        assert_eq!(count_on_date(&tt, "2024-01-01"), 2);
        assert_eq!(count_on_date(&tt, "2024-01-02"), 1);
        assert_eq!(count_on_date(&tt, "2024-01-09"), 0);
    }

    #[test]
    fn test_sort_by_date_is_stable() {
        let mut tt = vec![
            entry("2024-01-02", "lecture"),
            entry("2024-01-01", "vacant"),
            entry("2024-01-01", "lecture"),
        ];
        sort_by_date(&mut tt);

        assert_eq!(tt[0].kind, EntryKind::Vacant);
        assert_eq!(tt[1].kind, EntryKind::Lecture);
        assert_eq!(tt[2].date, "2024-01-02");
    }

    #[test]
    fn test_entry_keeps_unknown_kind_and_fields() {
        let raw = json!({
            "date": "2024-01-01",
            "type": "Class",
            "details": "Algebra: Groups",
            "room": "B12"
        });

        let e: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(e.kind, EntryKind::Other("Class".to_string()));
        assert!(e.status.is_none());
        assert_eq!(serde_json::to_value(&e).unwrap(), raw);
    }

    #[test]
    fn test_entry_without_details_round_trips() {
        let raw = json!({ "date": "2024-01-01", "type": "lecture" });

        let e: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert!(e.details.is_none());
        assert_eq!(serde_json::to_value(&e).unwrap(), raw);

        let null = json!({ "date": "2024-01-01", "type": "lecture", "details": null });
        let e: Entry = serde_json::from_value(null.clone()).unwrap();
        assert_eq!(e.details, Some(Value::Null));
        assert_eq!(serde_json::to_value(&e).unwrap(), null);
    }
}
