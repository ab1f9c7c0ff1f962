//! Grid composition for the week/day time grid.
//!
//! `compose_grid` turns events plus settings into a `GridScene`: a
//! renderer-independent description of the time axis, day headers,
//! gridlines, all-day lane, positioned timed events and the current-time
//! marker. Renderers only translate the scene into drawing calls.

use chrono::NaiveDate;

use crate::models::event::CalendarEvent;
use crate::models::settings::{Density, GridSettings};
use crate::services::layout::{layout_day, LayoutPolicy, LayoutRect, TimeMapper};
use crate::services::now_indicator::NowIndicator;
use crate::services::selection::GridPoint;
use crate::utils::date::minutes_since_midnight;

pub mod all_day;
pub mod controller;

pub use all_day::{build_all_day_lane, AllDayLane, LaneEvent};
pub use controller::{GridController, GridInteraction, PointerEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct HourLabel {
    pub hour: u32,
    pub label: String,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gridline {
    pub y: f32,
    /// Hour boundary (as opposed to a half-hour line)
    pub major: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayHeader {
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
}

/// A timed event (or the part of it falling on one day) placed in a column.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent {
    /// The event as supplied, not the per-day segment
    pub event: CalendarEvent,
    pub rect: LayoutRect,
    /// Part of the segment lies above the visible window
    pub clipped_top: bool,
    /// Part of the segment lies below the visible window
    pub clipped_bottom: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub events: Vec<PositionedEvent>,
    /// Segments ending at or before the first visible hour
    pub hidden_above: usize,
    /// Segments starting at or after the bottom of the grid
    pub hidden_below: usize,
}

impl DayColumn {
    /// Segments on this day that fall entirely outside the visible window.
    pub fn hidden_count(&self) -> usize {
        self.hidden_above + self.hidden_below
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridScene {
    pub dates: Vec<NaiveDate>,
    pub time_axis: Vec<HourLabel>,
    pub gridlines: Vec<Gridline>,
    pub headers: Vec<DayHeader>,
    pub all_day_lane: AllDayLane,
    pub columns: Vec<DayColumn>,
    pub now: NowIndicator,
    mapper: TimeMapper,
}

/// What lies under a grid-local point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridHit<'a> {
    Event(&'a PositionedEvent),
    EmptySlot(GridPoint),
    Outside,
}

impl GridScene {
    pub fn mapper(&self) -> &TimeMapper {
        &self.mapper
    }

    pub fn day_count(&self) -> usize {
        self.dates.len()
    }

    pub fn grid_height(&self) -> f32 {
        self.mapper.grid_height()
    }

    /// Event rectangles take priority over empty space; among overlapping
    /// rectangles the one drawn last (topmost) wins.
    pub fn hit_test(&self, point: GridPoint) -> GridHit<'_> {
        let Some(column) = usize::try_from(point.day)
            .ok()
            .and_then(|day| self.columns.get(day))
        else {
            return GridHit::Outside;
        };

        if !(0.0..self.grid_height()).contains(&point.y) || !(0.0..100.0).contains(&point.x_percent) {
            return GridHit::Outside;
        }

        column
            .events
            .iter()
            .rev()
            .find(|positioned| positioned.rect.contains(point.x_percent, point.y))
            .map_or(GridHit::EmptySlot(point), GridHit::Event)
    }
}

/// Assemble the scene for `dates`.
///
/// Long and all-day events go to the all-day lane; every other event is split
/// per day and positioned by the overlap partitioner.
pub fn compose_grid(
    dates: &[NaiveDate],
    events: &[CalendarEvent],
    settings: &GridSettings,
    now: NowIndicator,
) -> GridScene {
    let mapper = TimeMapper::from_settings(settings);
    let policy = LayoutPolicy::from_settings(settings);

    let columns: Vec<DayColumn> = dates
        .iter()
        .map(|date| compose_column(*date, events, &mapper, &policy))
        .collect();

    let all_day_lane = build_all_day_lane(dates, events, &policy, settings.all_day_row_height);

    let today_index = now.day_index;
    let headers = dates
        .iter()
        .enumerate()
        .map(|(index, date)| DayHeader {
            date: *date,
            label: date.format("%a %-d").to_string(),
            is_today: today_index == Some(index),
        })
        .collect();

    let hidden: usize = columns.iter().map(DayColumn::hidden_count).sum();
    log::debug!(
        "Composed grid for {} days: {} timed segments, {} hidden, {} in all-day lane",
        dates.len(),
        columns.iter().map(|column| column.events.len()).sum::<usize>(),
        hidden,
        all_day_lane.events.len()
    );

    GridScene {
        dates: dates.to_vec(),
        time_axis: time_axis(&mapper),
        gridlines: gridlines(&mapper, settings.density),
        headers,
        all_day_lane,
        columns,
        now,
        mapper,
    }
}

/// Hidden segments are dropped before partitioning so they never take a
/// column from a visible neighbour.
fn compose_column(
    date: NaiveDate,
    events: &[CalendarEvent],
    mapper: &TimeMapper,
    policy: &LayoutPolicy,
) -> DayColumn {
    let (window_start, window_end) = mapper.visible_minutes();

    let mut originals = Vec::new();
    let mut segments = Vec::new();
    let mut hidden_above = 0;
    let mut hidden_below = 0;

    for event in events.iter().filter(|event| !policy.is_lane_event(event)) {
        let Some(segment) = event.clipped_to(date) else {
            continue;
        };
        let (start_minute, end_minute) = segment_minutes(date, &segment);

        let visible = if segment.is_degenerate() {
            (window_start..window_end).contains(&start_minute)
        } else {
            start_minute < window_end && end_minute > window_start
        };

        if visible {
            originals.push(event);
            segments.push(segment);
        } else if start_minute >= window_end {
            hidden_below += 1;
        } else {
            hidden_above += 1;
        }
    }

    let layout = layout_day(&segments, mapper, policy);

    let positioned = originals
        .into_iter()
        .zip(&segments)
        .filter_map(|(original, segment)| {
            let rect = layout.get(segment.id)?;
            let (start_minute, end_minute) = segment_minutes(date, segment);
            Some(PositionedEvent {
                event: original.clone(),
                rect: *rect,
                clipped_top: start_minute < window_start,
                clipped_bottom: end_minute > window_end,
            })
        })
        .collect();

    DayColumn {
        date,
        events: positioned,
        hidden_above,
        hidden_below,
    }
}

fn segment_minutes(date: NaiveDate, segment: &CalendarEvent) -> (i64, i64) {
    (
        minutes_since_midnight(date, segment.start),
        minutes_since_midnight(date, segment.effective_end()),
    )
}

fn time_axis(mapper: &TimeMapper) -> Vec<HourLabel> {
    mapper
        .range()
        .hours()
        .map(|hour| HourLabel {
            hour,
            label: format!("{:02}:00", hour),
            y: mapper.time_to_pixel(hour as i32, 0),
        })
        .collect()
}

fn gridlines(mapper: &TimeMapper, density: Density) -> Vec<Gridline> {
    let range = mapper.range();
    let mut lines = Vec::new();

    for hour in range.hours() {
        lines.push(Gridline {
            y: mapper.time_to_pixel(hour as i32, 0),
            major: true,
        });
        if density == Density::Detailed {
            lines.push(Gridline {
                y: mapper.time_to_pixel(hour as i32, 30),
                major: false,
            });
        }
    }

    lines.push(Gridline {
        y: mapper.grid_height(),
        major: true,
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::VisibleHours;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn settings() -> GridSettings {
        GridSettings {
            visible_hours: VisibleHours::new(8, 17).unwrap(),
            ..GridSettings::default()
        }
    }

    fn dates() -> Vec<NaiveDate> {
        (3..=7)
            .map(|day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap())
            .collect()
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn point(day: i32, x_percent: f32, y: f32) -> GridPoint {
        GridPoint { day, x_percent, y }
    }

    #[test]
    fn test_time_axis_and_gridlines() {
        let scene = compose_grid(&dates(), &[], &settings(), NowIndicator::default());

        assert_eq!(scene.time_axis.len(), 10);
        assert_eq!(scene.time_axis[0].label, "08:00");
        assert_eq!(scene.time_axis[9].y, 540.0);

        // 10 hour lines, 10 half-hour lines, closing line
        assert_eq!(scene.gridlines.len(), 21);
        assert_eq!(scene.gridlines.last().unwrap().y, 600.0);
    }

    #[test]
    fn test_compact_density_drops_half_hour_lines() {
        let settings = GridSettings {
            density: Density::Compact,
            ..settings()
        };
        let scene = compose_grid(&dates(), &[], &settings, NowIndicator::default());

        assert_eq!(scene.gridlines.len(), 11);
        assert_eq!(scene.grid_height(), 400.0);
    }

    #[test]
    fn test_headers_flag_today() {
        let now = NowIndicator {
            visible: true,
            day_index: Some(1),
            pixel_offset: 30.0,
        };
        let scene = compose_grid(&dates(), &[], &settings(), now);

        assert_eq!(scene.headers[0].label, "Mon 3");
        assert!(scene.headers[1].is_today);
        assert!(!scene.headers[0].is_today);
        assert_eq!(scene.now, now);
    }

    #[test]
    fn test_events_routed_to_columns_and_lane() {
        let mut assembly = CalendarEvent::new(1, "Assembly", at(4, 0, 0), at(5, 0, 0));
        assembly.all_day = true;
        let events = vec![
            assembly,
            CalendarEvent::new(2, "Maths", at(4, 9, 0), at(4, 10, 0)),
            CalendarEvent::new(3, "Exams", at(5, 8, 0), at(5, 16, 0)),
            CalendarEvent::new(4, "Physics", at(6, 11, 0), at(6, 12, 0)),
        ];

        let scene = compose_grid(&dates(), &events, &settings(), NowIndicator::default());

        assert_eq!(scene.columns[1].events.len(), 1);
        assert_eq!(scene.columns[1].events[0].event.id, 2);
        assert!(scene.columns[2].events.is_empty());
        assert_eq!(scene.columns[3].events[0].event.id, 4);

        let lane_ids: Vec<i64> = scene.all_day_lane.events.iter().map(|e| e.event.id).collect();
        assert_eq!(lane_ids, vec![1, 3]);
    }

    #[test]
    fn test_midnight_crossing_event_split_across_columns() {
        let events = vec![CalendarEvent::new(5, "Night shift", at(3, 15, 0), at(4, 10, 0))];
        let settings = GridSettings {
            long_event_threshold_hours: 24,
            ..settings()
        };

        let scene = compose_grid(&dates(), &events, &settings, NowIndicator::default());

        let first = &scene.columns[0].events[0];
        assert_eq!(first.rect.top, 420.0);
        assert_eq!(first.rect.height, 180.0);
        assert!(first.clipped_bottom);
        assert!(!first.clipped_top);
        // the original event is carried, not the per-day segment
        assert_eq!(first.event.end, at(4, 10, 0));

        let second = &scene.columns[1].events[0];
        assert_eq!(second.rect.top, 0.0);
        assert_eq!(second.rect.height, 120.0);
        assert!(second.clipped_top);
    }

    #[test]
    fn test_segments_outside_window_are_hidden() {
        let events = vec![
            CalendarEvent::new(1, "Breakfast club", at(3, 6, 0), at(3, 7, 30)),
            CalendarEvent::new(2, "Early marker", at(3, 7, 0), at(3, 7, 0)),
            CalendarEvent::new(3, "Detention", at(3, 18, 0), at(3, 19, 0)),
            CalendarEvent::new(4, "Late start", at(3, 7, 30), at(3, 8, 30)),
        ];

        let scene = compose_grid(&dates(), &events, &settings(), NowIndicator::default());

        let column = &scene.columns[0];
        assert_eq!(column.hidden_count(), 3);
        assert_eq!(column.hidden_above, 2);
        assert_eq!(column.hidden_below, 1);
        assert_eq!(column.events.len(), 1);
        assert_eq!(column.events[0].event.id, 4);
        assert!(column.events[0].clipped_top);
    }

    #[test]
    fn test_hidden_segment_does_not_narrow_visible_neighbour() {
        let events = vec![
            CalendarEvent::new(1, "Breakfast club", at(3, 6, 0), at(3, 7, 30)),
            CalendarEvent::new(2, "Registration", at(3, 7, 0), at(3, 9, 0)),
        ];

        let scene = compose_grid(&dates(), &events, &settings(), NowIndicator::default());

        let column = &scene.columns[0];
        assert_eq!(column.hidden_above, 1);
        assert_eq!(column.events.len(), 1);
        assert_eq!(
            column.events[0].rect,
            LayoutRect {
                top: 0.0,
                height: 60.0,
                left_percent: 0.0,
                width_percent: 92.0,
            }
        );
    }

    #[test]
    fn test_hit_test_prefers_events() {
        let events = vec![
            CalendarEvent::new(1, "A", at(3, 9, 0), at(3, 10, 0)),
            CalendarEvent::new(2, "B", at(3, 9, 30), at(3, 10, 30)),
        ];
        let scene = compose_grid(&dates(), &events, &settings(), NowIndicator::default());

        match scene.hit_test(point(0, 10.0, 70.0)) {
            GridHit::Event(hit) => assert_eq!(hit.event.id, 1),
            other => panic!("expected event hit, got {:?}", other),
        }
        match scene.hit_test(point(0, 60.0, 100.0)) {
            GridHit::Event(hit) => assert_eq!(hit.event.id, 2),
            other => panic!("expected event hit, got {:?}", other),
        }
        assert_eq!(scene.hit_test(point(0, 10.0, 300.0)), GridHit::EmptySlot(point(0, 10.0, 300.0)));
        assert_eq!(scene.hit_test(point(7, 10.0, 300.0)), GridHit::Outside);
        assert_eq!(scene.hit_test(point(0, 10.0, -1.0)), GridHit::Outside);
    }
}
