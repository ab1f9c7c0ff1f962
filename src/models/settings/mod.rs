// Settings module
// Grid configuration: visible window, density, layout constants

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("visible hours must satisfy 0 <= start < end <= 23 (got {start}..{end})")]
    InvalidHoursRange { start: u32, end: u32 },
    #[error("cell height must be positive (got {0})")]
    InvalidCellHeight(f32),
    #[error("column margin must be within [0, 100) percent (got {0})")]
    InvalidMargin(f32),
    #[error("minimum event height must not be negative (got {0})")]
    InvalidMinHeight(f32),
    #[error("long event threshold must be at least one hour (got {0})")]
    InvalidThreshold(i64),
    #[error("current time tick interval must be at least one second")]
    InvalidTickInterval,
    #[error("first day of week must be 0-6 (got {0})")]
    InvalidFirstDay(u8),
    #[error("days shown must be 1-7 (got {0})")]
    InvalidDaysShown(u8),
    #[error("selection snap must divide an hour (got {0} minutes)")]
    InvalidSnap(u32),
}

/// Inclusive range of hour rows drawn by the timed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleHours {
    pub start: u32,
    pub end: u32,
}

impl VisibleHours {
    pub fn new(start: u32, end: u32) -> Result<Self, SettingsError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.start >= self.end || self.end > 23 {
            return Err(SettingsError::InvalidHoursRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Number of hour rows, the `end` row included.
    pub fn row_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }

    /// First visible minute of the day.
    pub fn start_minute(&self) -> i64 {
        i64::from(self.start) * 60
    }

    /// Minute of the day where the grid ends (bottom of the `end` row).
    pub fn end_minute(&self) -> i64 {
        (i64::from(self.end) + 1) * 60
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl Default for VisibleHours {
    fn default() -> Self {
        Self { start: 7, end: 18 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Compact,
    #[default]
    Detailed,
}

impl Density {
    pub fn toggled(self) -> Self {
        match self {
            Density::Compact => Density::Detailed,
            Density::Detailed => Density::Compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub density: Density,
    /// Pixels per hour row in compact density
    pub compact_cell_height: f32,
    /// Pixels per hour row in detailed density
    pub detailed_cell_height: f32,
    /// Timed events at least this long move to the all-day lane
    pub long_event_threshold_hours: i64,
    /// Horizontal margin (percent of the day column) shared by an overlap group
    pub column_margin_percent: f32,
    pub min_event_height: f32,
    pub all_day_row_height: f32,
    pub now_tick_seconds: u64,
    /// 0 = Sunday, 1 = Monday, etc.
    pub first_day_of_week: u8,
    pub days_shown: u8,
    pub selection_snap_minutes: Option<u32>,
    /// Kept last so it serializes as a trailing TOML table
    pub visible_hours: VisibleHours,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible_hours: VisibleHours::default(),
            density: Density::Detailed,
            compact_cell_height: 40.0,
            detailed_cell_height: 60.0,
            long_event_threshold_hours: 6,
            column_margin_percent: 8.0,
            min_event_height: 24.0,
            all_day_row_height: 22.0,
            now_tick_seconds: 60,
            first_day_of_week: 1, // Monday
            days_shown: 7,
            selection_snap_minutes: None,
        }
    }
}

impl GridSettings {
    /// Pixels per hour for the active density.
    pub fn cell_height(&self) -> f32 {
        match self.density {
            Density::Compact => self.compact_cell_height,
            Density::Detailed => self.detailed_cell_height,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.visible_hours.validate()?;

        for height in [self.compact_cell_height, self.detailed_cell_height] {
            if !(height.is_finite() && height > 0.0) {
                return Err(SettingsError::InvalidCellHeight(height));
            }
        }

        if !(0.0..100.0).contains(&self.column_margin_percent) {
            return Err(SettingsError::InvalidMargin(self.column_margin_percent));
        }

        if !(self.min_event_height >= 0.0) {
            return Err(SettingsError::InvalidMinHeight(self.min_event_height));
        }

        if self.long_event_threshold_hours < 1 {
            return Err(SettingsError::InvalidThreshold(
                self.long_event_threshold_hours,
            ));
        }

        if self.now_tick_seconds == 0 {
            return Err(SettingsError::InvalidTickInterval);
        }

        if self.first_day_of_week > 6 {
            return Err(SettingsError::InvalidFirstDay(self.first_day_of_week));
        }

        if !(1..=7).contains(&self.days_shown) {
            return Err(SettingsError::InvalidDaysShown(self.days_shown));
        }

        if let Some(snap) = self.selection_snap_minutes {
            if snap == 0 || 60 % snap != 0 {
                return Err(SettingsError::InvalidSnap(snap));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = GridSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.cell_height(), 60.0);
        assert_eq!(settings.long_event_threshold_hours, 6);
    }

    #[test]
    fn test_density_switches_cell_height() {
        let mut settings = GridSettings::default();
        settings.density = settings.density.toggled();
        assert_eq!(settings.density, Density::Compact);
        assert_eq!(settings.cell_height(), 40.0);
    }

    #[test]
    fn test_visible_hours_rejects_inverted_range() {
        assert_eq!(
            VisibleHours::new(12, 8).unwrap_err(),
            SettingsError::InvalidHoursRange { start: 12, end: 8 }
        );
        assert!(VisibleHours::new(8, 8).is_err());
        assert!(VisibleHours::new(0, 24).is_err());
    }

    #[test]
    fn test_visible_hours_window() {
        let range = VisibleHours::new(8, 17).unwrap();
        assert_eq!(range.row_count(), 10);
        assert_eq!(range.start_minute(), 480);
        assert_eq!(range.end_minute(), 1080);
        assert!(range.contains_hour(17));
        assert!(!range.contains_hour(18));
    }

    #[test]
    fn test_invalid_cell_height() {
        let settings = GridSettings {
            compact_cell_height: 0.0,
            ..GridSettings::default()
        };
        assert_eq!(
            settings.validate().unwrap_err(),
            SettingsError::InvalidCellHeight(0.0)
        );
    }

    #[test]
    fn test_invalid_snap() {
        let settings = GridSettings {
            selection_snap_minutes: Some(7),
            ..GridSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err(), SettingsError::InvalidSnap(7));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: GridSettings = toml::from_str(
            r#"
            density = "compact"
            days_shown = 5

            [visible_hours]
            start = 8
            end = 16
            "#,
        )
        .unwrap();

        assert_eq!(settings.density, Density::Compact);
        assert_eq!(settings.days_shown, 5);
        assert_eq!(settings.visible_hours, VisibleHours { start: 8, end: 16 });
        assert_eq!(settings.min_event_height, 24.0);
    }
}
