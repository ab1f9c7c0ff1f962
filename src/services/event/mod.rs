//! Event file loading for the demo app.
//!
//! Events are read from a JSON array of `CalendarEvent` records. The grid
//! itself never touches the filesystem; this is only the app's data source.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Error as SerdeError;

use crate::models::event::CalendarEvent;

pub fn load_events(path: &Path) -> Result<Vec<CalendarEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    let events: Vec<CalendarEvent> =
        serde_json::from_str(&data).map_err(|err| map_deser_error(err, path))?;

    let untitled = events.iter().filter(|event| event.validate().is_err()).count();
    if untitled > 0 {
        log::warn!("{} events in {} have no title", untitled, path.display());
    }

    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Next free id after the largest one in `events`.
pub fn next_event_id(events: &[CalendarEvent]) -> i64 {
    events.iter().map(|event| event.id).max().map_or(1, |max| max + 1)
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize events from {}",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_load_events_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "title": "Algebra", "start": "2025-03-03T09:00:00", "end": "2025-03-03T10:00:00", "type": "class"},
                {"id": 2, "title": "Sports day", "start": "2025-03-04T00:00:00", "end": "2025-03-05T00:00:00", "isAllDay": true}
            ]"#,
        )
        .unwrap();

        let events = load_events(&path).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::Class);
        assert_eq!(
            events[0].start,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
        assert!(events[1].all_day);
        assert_eq!(events[1].event_type, EventType::Other);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_events(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read events"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(&path, r#"[{"id": "one"}]"#).unwrap();

        let err = load_events(&path).unwrap_err();
        assert!(err.to_string().contains("failed to deserialize events"));
    }

    #[test]
    fn test_next_event_id() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let events = vec![
            CalendarEvent::new(4, "Staff meeting", day.and_hms_opt(15, 30, 0).unwrap(), day.and_hms_opt(16, 30, 0).unwrap()),
            CalendarEvent::new(2, "Lunch duty", day.and_hms_opt(12, 0, 0).unwrap(), day.and_hms_opt(12, 30, 0).unwrap()),
        ];

        assert_eq!(next_event_id(&events), 5);
        assert_eq!(next_event_id(&[]), 1);
    }
}
