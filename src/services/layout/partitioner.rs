//! Overlap partitioning for one day column.
//!
//! Each timed event is sized against its own pairwise overlap group
//! (`[event, ..every other event it overlaps]`). Groups are not merged
//! transitively, so in an A–B–C chain where A and C are disjoint the middle
//! event sees a group of three while A and C each see a group of two.

use std::collections::BTreeMap;

use super::time_mapper::TimeMapper;
use super::{LayoutPolicy, LayoutRect};
use crate::models::event::{CalendarEvent, EventId};
use crate::utils::date::minutes_since_midnight;

/// Where one event landed inside its overlap group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: LayoutRect,
    pub group_size: usize,
    pub column: usize,
}

/// Layout output for a single day, keyed by event id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayLayout {
    placements: BTreeMap<EventId, Placement>,
}

impl DayLayout {
    pub fn get(&self, id: EventId) -> Option<&LayoutRect> {
        self.placements.get(&id).map(|placement| &placement.rect)
    }

    pub fn placement(&self, id: EventId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.placements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventId, &LayoutRect)> {
        self.placements.iter().map(|(id, placement)| (*id, &placement.rect))
    }
}

/// Compute layout rectangles for one day's events.
///
/// All-day events and events at or above the long-event threshold are left
/// out; the grid composer routes them to the all-day lane. When ids repeat,
/// the later event wins.
pub fn layout_day(events: &[CalendarEvent], mapper: &TimeMapper, policy: &LayoutPolicy) -> DayLayout {
    let timed: Vec<(usize, &CalendarEvent)> = events
        .iter()
        .filter(|event| !policy.is_lane_event(event))
        .enumerate()
        .collect();

    let column_width = |group_size: usize| policy.usable_percent() / group_size as f32;

    let mut layout = DayLayout::default();
    for &(index, event) in &timed {
        let mut group: Vec<(usize, &CalendarEvent)> = timed
            .iter()
            .filter(|(other_index, other)| *other_index != index && event.overlaps(other))
            .copied()
            .collect();
        group.push((index, event));
        group.sort_by(|(a_index, a), (b_index, b)| a.start.cmp(&b.start).then(a_index.cmp(b_index)));

        let group_size = group.len();
        let column = group
            .iter()
            .position(|(member_index, _)| *member_index == index)
            .unwrap_or(0);

        let width_percent = column_width(group_size);
        let left_percent = column as f32 * width_percent + policy.left_margin_percent();

        let (top, height) = vertical_extent(event, mapper, policy);

        layout.placements.insert(
            event.id,
            Placement {
                rect: LayoutRect {
                    top,
                    height,
                    left_percent,
                    width_percent,
                },
                group_size,
                column,
            },
        );
    }

    log::debug!(
        "Laid out {} of {} events ({} routed to the all-day lane)",
        layout.len(),
        events.len(),
        events.len() - timed.len()
    );

    layout
}

/// Top offset and height, both ends clamped to the visible window.
fn vertical_extent(event: &CalendarEvent, mapper: &TimeMapper, policy: &LayoutPolicy) -> (f32, f32) {
    let day = event.start.date();
    let start_minute = mapper.clamp_minutes(minutes_since_midnight(day, event.start));
    let end_minute = mapper.clamp_minutes(minutes_since_midnight(day, event.effective_end()));

    let top = mapper.minutes_to_pixel(start_minute);
    let bottom = mapper.minutes_to_pixel(end_minute);
    (top, (bottom - top).max(policy.min_height))
}
