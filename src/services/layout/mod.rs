//! Event layout for the timed week/day grid.

use chrono::Duration;

use crate::models::event::CalendarEvent;
use crate::models::settings::GridSettings;

pub mod partitioner;
pub mod time_mapper;

pub use partitioner::{layout_day, DayLayout, Placement};
pub use time_mapper::{ClockTime, TimeMapper};

/// On-screen rectangle of one event inside its day column.
///
/// Vertical values are pixels from the top of the timed grid, horizontal
/// values are percentages of the column width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub top: f32,
    pub height: f32,
    pub left_percent: f32,
    pub width_percent: f32,
}

impl LayoutRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right_percent(&self) -> f32 {
        self.left_percent + self.width_percent
    }

    pub fn contains(&self, x_percent: f32, y: f32) -> bool {
        (self.left_percent..self.right_percent()).contains(&x_percent)
            && (self.top..self.bottom()).contains(&y)
    }
}

/// Tunable constants of the partitioner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPolicy {
    /// Timed events at least this long are rendered in the all-day lane
    pub long_event_threshold: Duration,
    /// Column percentage reserved as margin, split evenly left and right
    pub margin_percent: f32,
    pub min_height: f32,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            long_event_threshold: Duration::hours(6),
            margin_percent: 8.0,
            min_height: 24.0,
        }
    }
}

impl LayoutPolicy {
    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            long_event_threshold: Duration::hours(settings.long_event_threshold_hours),
            margin_percent: settings.column_margin_percent,
            min_height: settings.min_event_height,
        }
    }

    pub fn usable_percent(&self) -> f32 {
        100.0 - self.margin_percent
    }

    pub fn left_margin_percent(&self) -> f32 {
        self.margin_percent / 2.0
    }

    /// All-day events and very long events skip the overlap partitioner.
    pub fn is_lane_event(&self, event: &CalendarEvent) -> bool {
        event.all_day || event.duration() >= self.long_event_threshold
    }
}
