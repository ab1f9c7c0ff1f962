// Grid controller
// Routes pointer input over a composed scene to event clicks or drag selection

use crate::models::event::CalendarEvent;
use crate::services::selection::{DragSelection, GridProjection, SelectionOverlay, TimeRange};

use super::{GridHit, GridScene};

/// Pointer input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
}

/// Outcome of pointer handling, consumed by the edit/create dialogs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridInteraction {
    /// Event that was clicked for editing
    pub event_to_edit: Option<CalendarEvent>,
    /// Range chosen by a completed drag selection
    pub selected_range: Option<TimeRange>,
}

impl GridInteraction {
    /// Merge another result into this one; later values win.
    pub fn merge(&mut self, other: GridInteraction) {
        if other.event_to_edit.is_some() {
            self.event_to_edit = other.event_to_edit;
        }
        if other.selected_range.is_some() {
            self.selected_range = other.selected_range;
        }
    }

    pub fn has_actions(&self) -> bool {
        self.event_to_edit.is_some() || self.selected_range.is_some()
    }
}

/// Owns the drag gesture for one grid view.
#[derive(Debug, Clone, Default)]
pub struct GridController {
    selection: DragSelection,
}

impl GridController {
    pub fn new(snap_minutes: Option<u32>) -> Self {
        Self {
            selection: DragSelection::with_snap(snap_minutes),
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    pub fn handle(
        &mut self,
        pointer: PointerEvent,
        scene: &GridScene,
        projection: &impl GridProjection,
    ) -> GridInteraction {
        let mut result = GridInteraction::default();

        match pointer {
            PointerEvent::Down { x, y } => {
                let Some(point) = projection.project(x, y) else {
                    return result;
                };
                match scene.hit_test(point) {
                    // event rectangles swallow the press
                    GridHit::Event(positioned) => {
                        log::debug!("Event {} clicked", positioned.event.id);
                        result.event_to_edit = Some(positioned.event.clone());
                    }
                    GridHit::EmptySlot(point) => self.selection.pointer_down(point, scene.mapper()),
                    GridHit::Outside => {}
                }
            }
            PointerEvent::Move { x, y } => match projection.project(x, y) {
                Some(point) => self.selection.pointer_move(point, scene.mapper()),
                None => self.selection.pointer_leave(),
            },
            PointerEvent::Up => {
                result.selected_range = self.selection.pointer_up(&scene.dates, scene.mapper());
            }
            PointerEvent::Leave => self.selection.pointer_leave(),
        }

        result
    }

    /// Click on the all-day lane at column `day`, stacking row `row`.
    pub fn click_lane(&self, scene: &GridScene, day: usize, row: usize) -> GridInteraction {
        GridInteraction {
            event_to_edit: scene
                .all_day_lane
                .event_at(day, row)
                .map(|lane_event| lane_event.event.clone()),
            selected_range: None,
        }
    }

    pub fn overlay(&self, scene: &GridScene) -> Vec<SelectionOverlay> {
        self.selection.overlay(scene.mapper(), scene.day_count())
    }

    pub fn cancel(&mut self) {
        self.selection.pointer_leave();
    }
}
