//! Conversion between wall-clock time and vertical pixel offsets in the time grid.
//!
//! Offsets are measured from the top of the first visible hour row. The mapper
//! never clamps: times outside the visible window produce negative or
//! beyond-grid offsets, and callers decide whether to clip.

use crate::models::settings::{GridSettings, VisibleHours};

const MINUTES_PER_HOUR: f32 = 60.0;

/// Hour/minute pair produced by reverse mapping.
///
/// `hour` is signed and unbounded so out-of-window offsets survive the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: i32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: i32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn total_minutes(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMapper {
    range: VisibleHours,
    cell_height: f32,
}

impl TimeMapper {
    /// A non-positive or non-finite cell height is replaced by 1px so the
    /// mapper stays total; settings validation rejects such values earlier.
    pub fn new(range: VisibleHours, cell_height: f32) -> Self {
        let cell_height = if cell_height.is_finite() && cell_height > 0.0 {
            cell_height
        } else {
            1.0
        };
        Self { range, cell_height }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(settings.visible_hours, settings.cell_height())
    }

    pub fn range(&self) -> VisibleHours {
        self.range
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Height of the whole timed grid, `end` row included.
    pub fn grid_height(&self) -> f32 {
        self.range.row_count() as f32 * self.cell_height
    }

    pub fn time_to_pixel(&self, hour: i32, minute: i32) -> f32 {
        let hour_offset = (hour - self.range.start as i32) as f32;
        hour_offset * self.cell_height + (minute as f32 / MINUTES_PER_HOUR) * self.cell_height
    }

    pub fn minutes_to_pixel(&self, minute_of_day: i64) -> f32 {
        let hour = minute_of_day.div_euclid(60) as i32;
        let minute = minute_of_day.rem_euclid(60) as i32;
        self.time_to_pixel(hour, minute)
    }

    pub fn pixel_to_time(&self, offset: f32) -> ClockTime {
        let hour_offset = (offset / self.cell_height).floor();
        let remainder = offset - hour_offset * self.cell_height;
        let minute = (remainder / self.cell_height * MINUTES_PER_HOUR).round().max(0.0) as u32;

        let mut hour = self.range.start as i32 + hour_offset as i32;
        if minute > 59 {
            hour += 1;
            return ClockTime::new(hour, 0);
        }
        ClockTime::new(hour, minute)
    }

    /// Fractional hour of the day at `offset`, e.g. 14.5 for 14:30.
    pub fn pixel_to_hours(&self, offset: f32) -> f32 {
        self.range.start as f32 + offset / self.cell_height
    }

    pub fn hours_to_pixel(&self, hours: f32) -> f32 {
        (hours - self.range.start as f32) * self.cell_height
    }

    /// Fractional hour converted with the same rounding as `pixel_to_time`.
    pub fn hours_to_time(&self, hours: f32) -> ClockTime {
        self.pixel_to_time(self.hours_to_pixel(hours))
    }

    /// Window bounds as minutes of day: `[start:00, (end + 1):00]`.
    pub fn visible_minutes(&self) -> (i64, i64) {
        (self.range.start_minute(), self.range.end_minute())
    }

    /// Clamp a minute-of-day value into the visible window.
    pub fn clamp_minutes(&self, minute_of_day: i64) -> i64 {
        let (start, end) = self.visible_minutes();
        minute_of_day.clamp(start, end)
    }

    /// Clamp a fractional hour into the visible window.
    pub fn clamp_hours(&self, hours: f32) -> f32 {
        hours.clamp(self.range.start as f32, (self.range.end + 1) as f32)
    }
}
