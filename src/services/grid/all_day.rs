//! All-day lane above the timed grid.
//!
//! Holds all-day events and timed events long enough to be exempt from the
//! overlap partitioner. Each event spans the displayed columns it touches and
//! is stacked into the first row that is free across that span.

use chrono::NaiveDate;

use crate::models::event::CalendarEvent;
use crate::services::layout::LayoutPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct LaneEvent {
    pub event: CalendarEvent,
    pub first_day: usize,
    pub last_day: usize,
    pub row: usize,
    /// Event started before the first displayed day
    pub continues_before: bool,
    /// Event ends after the last displayed day
    pub continues_after: bool,
}

impl LaneEvent {
    pub fn spans(&self, day: usize) -> bool {
        (self.first_day..=self.last_day).contains(&day)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllDayLane {
    pub events: Vec<LaneEvent>,
    pub rows: usize,
    pub height: f32,
}

impl AllDayLane {
    /// Event drawn at `row` of column `day`, if any.
    pub fn event_at(&self, day: usize, row: usize) -> Option<&LaneEvent> {
        self.events
            .iter()
            .find(|lane_event| lane_event.row == row && lane_event.spans(day))
    }
}

pub fn build_all_day_lane(
    dates: &[NaiveDate],
    events: &[CalendarEvent],
    policy: &LayoutPolicy,
    row_height: f32,
) -> AllDayLane {
    let mut spans: Vec<(usize, usize, &CalendarEvent)> = events
        .iter()
        .filter(|event| policy.is_lane_event(event))
        .filter_map(|event| {
            let first = dates.iter().position(|date| event.touches_date(*date))?;
            let last = dates.iter().rposition(|date| event.touches_date(*date))?;
            Some((first, last, event))
        })
        .collect();

    // Earlier first, then wider spans, then input order (stable sort)
    spans.sort_by(|(a_first, a_last, _), (b_first, b_last, _)| {
        a_first
            .cmp(b_first)
            .then((b_last - b_first).cmp(&(a_last - a_first)))
    });

    let mut row_ends: Vec<usize> = Vec::new();
    let mut lane_events = Vec::with_capacity(spans.len());

    for (first_day, last_day, event) in spans {
        let row = match row_ends.iter().position(|end| *end < first_day) {
            Some(row) => {
                row_ends[row] = last_day;
                row
            }
            None => {
                row_ends.push(last_day);
                row_ends.len() - 1
            }
        };

        let continues_before = dates
            .first()
            .is_some_and(|first| event.start.date() < *first);
        let continues_after = dates
            .last()
            .is_some_and(|last| event.effective_end().date() > *last && !ends_at_midnight_of(event, *last));

        lane_events.push(LaneEvent {
            event: event.clone(),
            first_day,
            last_day,
            row,
            continues_before,
            continues_after,
        });
    }

    let rows = row_ends.len();
    AllDayLane {
        events: lane_events,
        rows,
        height: rows.max(1) as f32 * row_height,
    }
}

/// True when the event ends exactly at the midnight closing `date`.
fn ends_at_midnight_of(event: &CalendarEvent, date: NaiveDate) -> bool {
    date.succ_opt()
        .is_some_and(|next| event.effective_end() == next.and_time(chrono::NaiveTime::MIN))
}
