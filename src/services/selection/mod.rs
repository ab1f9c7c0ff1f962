//! Drag-to-select of a new time range on the week grid.
//!
//! The gesture is a two-state machine: idle, or selecting between a pinned
//! start point and a moving end point. Committing on pointer-up is an
//! instantaneous transition back to idle that yields the normalized range.

use chrono::{NaiveDate, NaiveDateTime};

use crate::services::layout::TimeMapper;
use crate::utils::date::at_minute_of_day;

/// Pointer position relative to the timed grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Day column index; may fall outside the displayed columns
    pub day: i32,
    /// Horizontal position inside the column, in percent of its width
    pub x_percent: f32,
    /// Pixels from the top of the timed grid
    pub y: f32,
}

/// Maps a surface position (e.g. a screen pointer) into grid-local coordinates.
///
/// Returns `None` when the position is not over the timed grid.
pub trait GridProjection {
    fn project(&self, x: f32, y: f32) -> Option<GridPoint>;
}

impl<F> GridProjection for F
where
    F: Fn(f32, f32) -> Option<GridPoint>,
{
    fn project(&self, x: f32, y: f32) -> Option<GridPoint> {
        self(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPoint {
    pub day: i32,
    /// Fractional hour of the day, e.g. 14.5 for 14:30
    pub hours: f32,
}

impl SelectionPoint {
    pub fn from_grid(point: GridPoint, mapper: &TimeMapper) -> Self {
        Self {
            day: point.day,
            hours: mapper.clamp_hours(mapper.pixel_to_hours(point.y)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionState {
    pub start: SelectionPoint,
    pub end: SelectionPoint,
}

/// Range handed to the event-creation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Highlight drawn over one day column while selecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOverlay {
    pub day: usize,
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    state: Option<SelectionState>,
    snap_minutes: Option<u32>,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snap(snap_minutes: Option<u32>) -> Self {
        Self {
            state: None,
            snap_minutes: snap_minutes.filter(|step| *step > 0),
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&SelectionState> {
        self.state.as_ref()
    }

    /// Idle -> Selecting. A pointer-down while already selecting restarts the gesture.
    pub fn pointer_down(&mut self, point: GridPoint, mapper: &TimeMapper) {
        let anchor = SelectionPoint::from_grid(point, mapper);
        self.state = Some(SelectionState {
            start: anchor,
            end: anchor,
        });
    }

    /// Selecting -> Selecting. Only the end point follows the pointer.
    pub fn pointer_move(&mut self, point: GridPoint, mapper: &TimeMapper) {
        if let Some(state) = self.state.as_mut() {
            state.end = SelectionPoint::from_grid(point, mapper);
        }
    }

    /// Selecting -> Idle, dropping the gesture without emitting anything.
    pub fn pointer_leave(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Drag selection abandoned");
        }
    }

    /// Selecting -> Idle, emitting the normalized range.
    ///
    /// Days and times are ordered independently: the range starts on the
    /// earlier day at the earlier time and ends on the later day at the later
    /// time. Returns `None` when idle or when no days are displayed.
    pub fn pointer_up(&mut self, dates: &[NaiveDate], mapper: &TimeMapper) -> Option<TimeRange> {
        let state = self.state.take()?;
        let last_day = dates.len().checked_sub(1)? as i32;

        let day_start = state.start.day.min(state.end.day).clamp(0, last_day) as usize;
        let day_end = state.start.day.max(state.end.day).clamp(0, last_day) as usize;

        let mut minute_start = mapper
            .hours_to_time(state.start.hours.min(state.end.hours))
            .total_minutes();
        let mut minute_end = mapper
            .hours_to_time(state.start.hours.max(state.end.hours))
            .total_minutes();

        if let Some(step) = self.snap_minutes.map(i64::from) {
            minute_start -= minute_start.rem_euclid(step);
            minute_end += (step - minute_end.rem_euclid(step)) % step;
        }

        let mut start = at_minute_of_day(dates[day_start], minute_start);
        let mut end = at_minute_of_day(dates[day_end], minute_end);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        log::debug!("Drag selection committed: {} -> {}", start, end);
        Some(TimeRange { start, end })
    }

    /// Highlight rectangles for the current selection, one per spanned column.
    pub fn overlay(&self, mapper: &TimeMapper, day_count: usize) -> Vec<SelectionOverlay> {
        let Some(state) = self.state.as_ref() else {
            return Vec::new();
        };
        let Some(last_day) = day_count.checked_sub(1) else {
            return Vec::new();
        };

        let first = state.start.day.min(state.end.day).clamp(0, last_day as i32) as usize;
        let last = state.start.day.max(state.end.day).clamp(0, last_day as i32) as usize;
        let top = mapper.hours_to_pixel(state.start.hours.min(state.end.hours));
        let bottom = mapper.hours_to_pixel(state.start.hours.max(state.end.hours));

        (first..=last)
            .map(|day| SelectionOverlay {
                day,
                top,
                height: bottom - top,
            })
            .collect()
    }
}
