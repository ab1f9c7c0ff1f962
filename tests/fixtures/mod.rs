// Test fixtures - reusable test data
// Provides a consistent school week and events across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use school_calendar::models::event::{CalendarEvent, EventType};
use school_calendar::models::settings::{GridSettings, VisibleHours};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, Mar 3 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    /// Monday to Friday of the fixture week
    pub fn school_week() -> Vec<NaiveDate> {
        (0..5)
            .map(|offset| monday() + chrono::Duration::days(offset))
            .collect()
    }

    /// `hour:minute` on day `day` of the fixture week (0 = Monday)
    pub fn at(day: i64, hour: u32, minute: u32) -> NaiveDateTime {
        (monday() + chrono::Duration::days(day))
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::dates::at;
    use super::*;

    pub fn timed(id: i64, day: i64, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        CalendarEvent::new(id, format!("Lesson {id}"), at(day, start.0, start.1), at(day, end.0, end.1))
    }

    /// A[9:00,10:00) B[9:30,10:30) C[10:15,11:00) on Monday
    pub fn overlap_chain() -> Vec<CalendarEvent> {
        vec![
            timed(1, 0, (9, 0), (10, 0)),
            timed(2, 0, (9, 30), (10, 30)),
            timed(3, 0, (10, 15), (11, 0)),
        ]
    }

    pub fn assembly(id: i64, day: i64) -> CalendarEvent {
        CalendarEvent::builder()
            .id(id)
            .title("Whole school assembly")
            .start(at(day, 0, 0))
            .end(at(day + 1, 0, 0))
            .all_day(true)
            .build()
            .unwrap()
    }

    pub fn exam_block(id: i64, day: i64) -> CalendarEvent {
        CalendarEvent::builder()
            .id(id)
            .title("Mock exams")
            .start(at(day, 8, 30))
            .end(at(day, 15, 30))
            .event_type(EventType::Exam)
            .build()
            .unwrap()
    }
}

/// Detailed density, 08:00-17:59 visible, 60px per hour
pub fn school_settings() -> GridSettings {
    GridSettings {
        visible_hours: VisibleHours::new(8, 17).unwrap(),
        ..GridSettings::default()
    }
}
