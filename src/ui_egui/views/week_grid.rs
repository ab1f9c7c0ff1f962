//! egui renderer for the week/day time grid.
//!
//! Paints a `GridScene` and feeds egui pointer input to the `GridController`.
//! All layout decisions live in the services; this module only converts
//! scene coordinates to screen coordinates.

use chrono::NaiveDate;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::{event_fill, event_text, TimeGridPalette};
use crate::models::event::CalendarEvent;
use crate::models::settings::GridSettings;
use crate::services::grid::{compose_grid, GridController, GridInteraction, GridScene, PointerEvent};
use crate::services::layout::TimeMapper;
use crate::services::now_indicator::{Clock, LiveIndicator, SystemClock};
use crate::services::selection::GridPoint;

pub const TIME_LABEL_WIDTH: f32 = 50.0;
pub const HEADER_HEIGHT: f32 = 28.0;
const EVENT_ROUNDING: f32 = 3.0;

pub struct WeekGridView {
    controller: GridController,
    live: LiveIndicator,
    clock: Box<dyn Clock>,
    /// Inputs of the last indicator computation; a change forces a refresh
    last_dates: Vec<NaiveDate>,
    last_mapper: Option<TimeMapper>,
}

impl WeekGridView {
    pub fn new(settings: &GridSettings) -> Self {
        Self::with_clock(settings, Box::new(SystemClock))
    }

    pub fn with_clock(settings: &GridSettings, clock: Box<dyn Clock>) -> Self {
        Self {
            controller: GridController::new(settings.selection_snap_minutes),
            live: LiveIndicator::new(settings.now_tick_seconds),
            clock,
            last_dates: Vec::new(),
            last_mapper: None,
        }
    }

    /// Rebuild the controller and ticker after a settings change.
    pub fn apply_settings(&mut self, settings: &GridSettings) {
        self.unmount();
        self.controller = GridController::new(settings.selection_snap_minutes);
        self.live = LiveIndicator::new(settings.now_tick_seconds);
        self.last_mapper = None;
    }

    /// Stop the current-time ticker; the view no longer requests repaints.
    pub fn unmount(&mut self) {
        self.live.cancel();
        self.controller.cancel();
    }

    pub fn is_ticking(&self) -> bool {
        !self.live.ticker().is_cancelled()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        dates: &[NaiveDate],
        events: &[CalendarEvent],
        settings: &GridSettings,
    ) -> GridInteraction {
        let mapper = TimeMapper::from_settings(settings);
        let force = self.last_dates != dates || self.last_mapper != Some(mapper);
        if force {
            self.last_dates = dates.to_vec();
            self.last_mapper = Some(mapper);
        }

        let now_time = self.clock.now();
        let now = self.live.refresh(self.clock.as_ref(), dates, &mapper, force);
        let scene = compose_grid(dates, events, settings, now);
        let palette = TimeGridPalette::from_visuals(ui.visuals());

        let mut result = GridInteraction::default();

        let width = ui.available_width().max(TIME_LABEL_WIDTH + 1.0);
        let col_width = (width - TIME_LABEL_WIDTH) / dates.len().max(1) as f32;

        draw_headers(ui, &scene, width, col_width, &palette);
        result.merge(self.draw_all_day_lane(ui, &scene, width, col_width, settings, now_time));

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(width, scene.grid_height()), Sense::click_and_drag());

                let grid_left = rect.left() + TIME_LABEL_WIDTH;
                let projection = move |x: f32, y: f32| {
                    let local_x = x - grid_left;
                    let day = (local_x / col_width).floor();
                    Some(GridPoint {
                        day: day as i32,
                        x_percent: (local_x - day * col_width) / col_width * 100.0,
                        y: y - rect.top(),
                    })
                };

                for pointer in pointer_events(ui, &response, rect, self.controller.is_selecting()) {
                    result.merge(self.controller.handle(pointer, &scene, &projection));
                }

                let painter = ui.painter_at(rect);
                draw_time_grid(&painter, &scene, rect, col_width, &palette);
                draw_events(&painter, &scene, rect, col_width, now_time, &palette);

                for overlay in self.controller.overlay(&scene) {
                    let left = grid_left + overlay.day as f32 * col_width;
                    let selection = Rect::from_min_size(
                        Pos2::new(left, rect.top() + overlay.top),
                        Vec2::new(col_width, overlay.height),
                    );
                    painter.rect_filled(selection, 2.0, palette.selection);
                }

                draw_now_indicator(&painter, &scene, rect, col_width, &palette);
            });

        if let Some(delay) = self.live.ticker().time_until_next(now_time) {
            ui.ctx().request_repaint_after(delay);
        }

        result
    }

    fn draw_all_day_lane(
        &self,
        ui: &mut egui::Ui,
        scene: &GridScene,
        width: f32,
        col_width: f32,
        settings: &GridSettings,
        now_time: chrono::NaiveDateTime,
    ) -> GridInteraction {
        let lane = &scene.all_day_lane;
        let (rect, response) = ui.allocate_exact_size(Vec2::new(width, lane.height), Sense::click());
        let painter = ui.painter_at(rect);
        let grid_left = rect.left() + TIME_LABEL_WIDTH;
        let row_height = settings.all_day_row_height;

        painter.text(
            Pos2::new(rect.left() + TIME_LABEL_WIDTH - 5.0, rect.top() + row_height / 2.0),
            Align2::RIGHT_CENTER,
            "all-day",
            FontId::proportional(10.0),
            Color32::GRAY,
        );

        for lane_event in &lane.events {
            let left = grid_left + lane_event.first_day as f32 * col_width + 1.0;
            let right = grid_left + (lane_event.last_day + 1) as f32 * col_width - 1.0;
            let top = rect.top() + lane_event.row as f32 * row_height + 1.0;
            let bar = Rect::from_min_max(Pos2::new(left, top), Pos2::new(right, top + row_height - 2.0));

            let is_past = lane_event.event.effective_end() < now_time;
            painter.rect_filled(bar, EVENT_ROUNDING, event_fill(lane_event.event.event_type, is_past));

            let mut title = String::new();
            if lane_event.continues_before {
                title.push_str("◀ ");
            }
            title.push_str(&lane_event.event.title);
            if lane_event.continues_after {
                title.push_str(" ▶");
            }
            painter.with_clip_rect(bar).text(
                Pos2::new(bar.left() + 4.0, bar.center().y),
                Align2::LEFT_CENTER,
                title,
                FontId::proportional(11.0),
                event_text(is_past),
            );
        }

        let mut result = GridInteraction::default();
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local_x = pos.x - grid_left;
                if local_x >= 0.0 && row_height > 0.0 {
                    let day = (local_x / col_width) as usize;
                    let row = ((pos.y - rect.top()) / row_height) as usize;
                    result = self.controller.click_lane(scene, day, row);
                }
            }
        }
        result
    }
}

impl Drop for WeekGridView {
    fn drop(&mut self) {
        self.unmount();
        log::debug!("Week grid dropped; current time ticker cancelled");
    }
}

/// Translate this frame's egui input into controller events.
fn pointer_events(ui: &egui::Ui, response: &egui::Response, rect: Rect, selecting: bool) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let press_origin = ui.input(|i| i.pointer.press_origin());

    if response.clicked() {
        if let Some(origin) = press_origin {
            events.push(PointerEvent::Down { x: origin.x, y: origin.y });
            events.push(PointerEvent::Up);
        }
        return events;
    }

    if response.drag_started() {
        if let Some(origin) = press_origin {
            events.push(PointerEvent::Down { x: origin.x, y: origin.y });
        }
    }

    let hover = ui.input(|i| i.pointer.hover_pos());
    let inside = hover.is_some_and(|pos| rect.contains(pos));

    if response.dragged() {
        match hover {
            Some(pos) if inside => events.push(PointerEvent::Move { x: pos.x, y: pos.y }),
            _ => events.push(PointerEvent::Leave),
        }
    } else if selecting && !inside {
        events.push(PointerEvent::Leave);
    }

    if response.drag_stopped() {
        events.push(PointerEvent::Up);
    }

    events
}

fn draw_headers(ui: &mut egui::Ui, scene: &GridScene, width: f32, col_width: f32, palette: &TimeGridPalette) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, HEADER_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.header_bg);

    for (index, header) in scene.headers.iter().enumerate() {
        let left = rect.left() + TIME_LABEL_WIDTH + index as f32 * col_width;
        let cell = Rect::from_min_size(Pos2::new(left, rect.top()), Vec2::new(col_width, HEADER_HEIGHT));
        if header.is_today {
            painter.rect_filled(cell, 0.0, palette.today_bg);
        }
        let font = if header.is_today {
            FontId::proportional(13.0)
        } else {
            FontId::proportional(12.0)
        };
        painter.text(cell.center(), Align2::CENTER_CENTER, &header.label, font, palette.header_text);
    }
}

fn draw_time_grid(painter: &egui::Painter, scene: &GridScene, rect: Rect, col_width: f32, palette: &TimeGridPalette) {
    let grid_left = rect.left() + TIME_LABEL_WIDTH;

    painter.rect_filled(
        Rect::from_min_max(rect.min, Pos2::new(grid_left, rect.bottom())),
        0.0,
        palette.axis_bg,
    );
    for (index, header) in scene.headers.iter().enumerate() {
        let left = grid_left + index as f32 * col_width;
        let column = Rect::from_min_max(Pos2::new(left, rect.top()), Pos2::new(left + col_width, rect.bottom()));
        let fill = if header.is_today { palette.today_bg } else { palette.column_bg };
        painter.rect_filled(column, 0.0, fill);
        painter.line_segment(
            [column.left_top(), column.left_bottom()],
            Stroke::new(1.0, palette.hour_line),
        );
    }

    for line in &scene.gridlines {
        let y = rect.top() + line.y;
        let stroke = if line.major {
            Stroke::new(1.0, palette.hour_line)
        } else {
            Stroke::new(0.5, palette.slot_line)
        };
        painter.line_segment([Pos2::new(grid_left, y), Pos2::new(rect.right(), y)], stroke);
    }

    for label in &scene.time_axis {
        painter.text(
            Pos2::new(grid_left - 5.0, rect.top() + label.y + 2.0),
            Align2::RIGHT_TOP,
            &label.label,
            FontId::proportional(12.0),
            palette.label_text,
        );
    }
}

/// Marker for segments outside the visible hours, e.g. "▲ +2".
fn hidden_marker(count: usize, above: bool) -> Option<String> {
    if count == 0 {
        return None;
    }
    let arrow = if above { '▲' } else { '▼' };
    Some(format!("{} +{}", arrow, count))
}

fn draw_events(
    painter: &egui::Painter,
    scene: &GridScene,
    rect: Rect,
    col_width: f32,
    now: chrono::NaiveDateTime,
    palette: &TimeGridPalette,
) {
    let grid_left = rect.left() + TIME_LABEL_WIDTH;

    for (day, column) in scene.columns.iter().enumerate() {
        let column_left = grid_left + day as f32 * col_width;
        let column_right = column_left + col_width - 3.0;

        if let Some(marker) = hidden_marker(column.hidden_above, true) {
            painter.text(
                Pos2::new(column_right, rect.top() + 2.0),
                Align2::RIGHT_TOP,
                marker,
                FontId::proportional(10.0),
                palette.label_text,
            );
        }
        if let Some(marker) = hidden_marker(column.hidden_below, false) {
            painter.text(
                Pos2::new(column_right, rect.top() + scene.grid_height() - 2.0),
                Align2::RIGHT_BOTTOM,
                marker,
                FontId::proportional(10.0),
                palette.label_text,
            );
        }

        for positioned in &column.events {
            let layout = positioned.rect;
            let block = Rect::from_min_size(
                Pos2::new(
                    column_left + layout.left_percent / 100.0 * col_width,
                    rect.top() + layout.top,
                ),
                Vec2::new(layout.width_percent / 100.0 * col_width, layout.height),
            )
            .shrink2(Vec2::new(1.0, 0.5));

            let is_past = positioned.event.effective_end() < now;
            let rounding = egui::Rounding {
                nw: if positioned.clipped_top { 0.0 } else { EVENT_ROUNDING },
                ne: if positioned.clipped_top { 0.0 } else { EVENT_ROUNDING },
                sw: if positioned.clipped_bottom { 0.0 } else { EVENT_ROUNDING },
                se: if positioned.clipped_bottom { 0.0 } else { EVENT_ROUNDING },
            };
            painter.rect_filled(block, rounding, event_fill(positioned.event.event_type, is_past));

            let text_color = event_text(is_past);
            let clipped = painter.with_clip_rect(block.intersect(painter.clip_rect()));
            clipped.text(
                block.left_top() + Vec2::new(4.0, 3.0),
                Align2::LEFT_TOP,
                &positioned.event.title,
                FontId::proportional(11.0),
                text_color,
            );
            if block.height() > 30.0 {
                let times = format!(
                    "{} - {}",
                    positioned.event.start.format("%H:%M"),
                    positioned.event.end.format("%H:%M")
                );
                clipped.text(
                    block.left_top() + Vec2::new(4.0, 17.0),
                    Align2::LEFT_TOP,
                    times,
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        }
    }
}

fn draw_now_indicator(painter: &egui::Painter, scene: &GridScene, rect: Rect, col_width: f32, palette: &TimeGridPalette) {
    let (true, Some(day_index)) = (scene.now.visible, scene.now.day_index) else {
        return;
    };

    let y = rect.top() + scene.now.pixel_offset;
    let x_start = rect.left() + TIME_LABEL_WIDTH + day_index as f32 * col_width;
    let x_end = x_start + col_width;

    painter.circle_filled(Pos2::new(x_start + 3.0, y), 3.0, palette.now_line);
    painter.line_segment(
        [Pos2::new(x_start, y), Pos2::new(x_end, y)],
        Stroke::new(2.0, palette.now_line),
    );
}
