// Event module
// Calendar event model consumed by the week grid layout engine

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub type EventId = i64;

/// Kind of calendar entry. Only used for coloring, never for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Class,
    Meeting,
    OfficeHours,
    Exam,
    #[default]
    Other,
}

impl EventType {
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Class => "Class",
            EventType::Meeting => "Meeting",
            EventType::OfficeHours => "Office hours",
            EventType::Exam => "Exam",
            EventType::Other => "Other",
        }
    }
}

/// Calendar event as supplied by the dashboard's event service.
///
/// `end <= start` is accepted: such events are treated as zero-duration and
/// still get a (minimum height) rectangle in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(alias = "isAllDay", default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Create a timed event of type `Other`
    ///
    /// # Examples
    /// ```
    /// use school_calendar::models::event::CalendarEvent;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    /// let event = CalendarEvent::new(
    ///     1,
    ///     "Algebra",
    ///     day.and_hms_opt(9, 0, 0).unwrap(),
    ///     day.and_hms_opt(10, 0, 0).unwrap(),
    /// );
    /// assert_eq!(event.duration().num_minutes(), 60);
    /// ```
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            start,
            end,
            event_type: EventType::Other,
            all_day: false,
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event.
    ///
    /// Times are deliberately not checked: degenerate ranges still render.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }
        Ok(())
    }

    /// Signed duration; negative for inverted events.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// End clamped so it never precedes start.
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.max(self.start)
    }

    /// Half-open interval overlap: each event starts strictly before the other ends.
    /// Inverted events count as zero-duration.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start < other.effective_end() && other.start < self.effective_end()
    }

    /// Whether the event should be drawn on `date` at all.
    pub fn touches_date(&self, date: NaiveDate) -> bool {
        self.segment_for_date(date).is_some()
    }

    /// Returns the start/end of the portion of this event that falls on `date`.
    ///
    /// Events crossing midnight are split at day boundaries. Zero-duration
    /// events only appear on their start date.
    pub fn segment_for_date(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = day_start + Duration::days(1);

        if self.is_degenerate() {
            return (self.start.date() == date).then_some((self.start, self.start));
        }

        let segment_start = self.start.max(day_start);
        let segment_end = self.end.min(day_end);

        (segment_start < segment_end).then_some((segment_start, segment_end))
    }

    /// Copy of this event restricted to the part that falls on `date`.
    pub fn clipped_to(&self, date: NaiveDate) -> Option<CalendarEvent> {
        let (start, end) = self.segment_for_date(date)?;
        Some(CalendarEvent {
            start,
            end,
            ..self.clone()
        })
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    id: Option<EventId>,
    title: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    event_type: EventType,
    all_day: bool,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    /// Set as all-day event
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Build the event
    pub fn build(self) -> Result<CalendarEvent, String> {
        let id = self.id.ok_or("Event id is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let event = CalendarEvent {
            id,
            title,
            start,
            end,
            event_type: self.event_type,
            all_day: self.all_day,
        };

        event.validate()?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_builder_basic() {
        let event = CalendarEvent::builder()
            .id(7)
            .title("Chemistry")
            .start(at(3, 9, 0))
            .end(at(3, 10, 0))
            .event_type(EventType::Class)
            .build()
            .unwrap();

        assert_eq!(event.id, 7);
        assert_eq!(event.event_type, EventType::Class);
        assert!(!event.all_day);
    }

    #[test]
    fn test_builder_missing_id() {
        let result = CalendarEvent::builder()
            .title("Chemistry")
            .start(at(3, 9, 0))
            .end(at(3, 10, 0))
            .build();
        assert_eq!(result.unwrap_err(), "Event id is required");
    }

    #[test]
    fn test_builder_accepts_inverted_times() {
        let event = CalendarEvent::builder()
            .id(1)
            .title("Backwards")
            .start(at(3, 10, 0))
            .end(at(3, 9, 0))
            .build()
            .unwrap();

        assert!(event.is_degenerate());
        assert_eq!(event.effective_end(), event.start);
    }

    #[test]
    fn test_builder_empty_title() {
        let result = CalendarEvent::builder()
            .id(1)
            .title("   ")
            .start(at(3, 9, 0))
            .end(at(3, 10, 0))
            .build();
        assert_eq!(result.unwrap_err(), "Event title cannot be empty");
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = CalendarEvent::new(1, "A", at(3, 10, 0), at(3, 11, 0));
        let b = CalendarEvent::new(2, "B", at(3, 11, 0), at(3, 12, 0));
        let c = CalendarEvent::new(3, "C", at(3, 10, 30), at(3, 11, 30));

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_segment_splits_at_midnight() {
        let event = CalendarEvent::new(1, "Night study", at(3, 22, 0), at(4, 2, 0));

        let first = event.segment_for_date(at(3, 0, 0).date()).unwrap();
        assert_eq!(first, (at(3, 22, 0), at(4, 0, 0)));

        let second = event.segment_for_date(at(4, 0, 0).date()).unwrap();
        assert_eq!(second, (at(4, 0, 0), at(4, 2, 0)));

        assert!(event.segment_for_date(at(5, 0, 0).date()).is_none());
    }

    #[test]
    fn test_event_ending_at_midnight_stays_on_one_day() {
        let event = CalendarEvent::new(1, "Evening", at(3, 20, 0), at(4, 0, 0));
        assert!(event.touches_date(at(3, 0, 0).date()));
        assert!(!event.touches_date(at(4, 0, 0).date()));
    }

    #[test]
    fn test_degenerate_segment_on_start_date() {
        let event = CalendarEvent::new(1, "Blip", at(3, 9, 0), at(3, 9, 0));
        let segment = event.segment_for_date(at(3, 0, 0).date()).unwrap();
        assert_eq!(segment, (at(3, 9, 0), at(3, 9, 0)));
    }

    #[test]
    fn test_deserialize_source_field_names() {
        let json = r#"{
            "id": 12,
            "title": "Office hours",
            "start": "2025-03-03T13:00:00",
            "end": "2025-03-03T14:00:00",
            "type": "office_hours",
            "isAllDay": false
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::OfficeHours);
        assert_eq!(event.duration(), Duration::hours(1));
    }
}
