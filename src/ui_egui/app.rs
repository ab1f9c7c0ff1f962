use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::models::event::{CalendarEvent, EventType};
use crate::models::settings::{Density, GridSettings};
use crate::services::event::next_event_id;
use crate::services::grid::GridInteraction;
use crate::services::selection::TimeRange;
use crate::services::settings::SettingsService;
use crate::ui_egui::views::week_grid::WeekGridView;
use crate::utils::date::week_dates;

/// Placeholder length for events created from a plain click.
const DEFAULT_NEW_EVENT_MINUTES: i64 = 60;

pub struct CalendarApp {
    settings: GridSettings,
    settings_service: SettingsService,
    events: Vec<CalendarEvent>,
    current_date: NaiveDate,
    grid: WeekGridView,
    /// Feedback line for the last edit/create action
    status: Option<String>,
}

impl eframe::App for CalendarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_toolbar(ctx);
        self.render_status_bar(ctx);

        let dates = week_dates(
            self.current_date,
            self.settings.first_day_of_week,
            self.settings.days_shown,
        );

        let interaction = egui::CentralPanel::default()
            .show(ctx, |ui| self.grid.show(ui, &dates, &self.events, &self.settings))
            .inner;

        if interaction.has_actions() {
            self.apply_interaction(interaction);
        }
    }
}

impl CalendarApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings_service: SettingsService,
        events: Vec<CalendarEvent>,
    ) -> Self {
        let settings = settings_service.load_or_default();
        log::info!(
            "Showing {} days, hours {}..={}",
            settings.days_shown,
            settings.visible_hours.start,
            settings.visible_hours.end
        );

        Self {
            grid: WeekGridView::new(&settings),
            settings,
            settings_service,
            events,
            current_date: Local::now().date_naive(),
            status: None,
        }
    }

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("◀").on_hover_text("Previous week").clicked() {
                    self.current_date -= Duration::weeks(1);
                }
                if ui.button("Today").clicked() {
                    self.current_date = Local::now().date_naive();
                }
                if ui.button("▶").on_hover_text("Next week").clicked() {
                    self.current_date += Duration::weeks(1);
                }

                ui.separator();
                ui.heading(self.current_date.format("%B %Y").to_string());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = match self.settings.density.toggled() {
                        Density::Compact => "Compact",
                        Density::Detailed => "Detailed",
                    };
                    if ui.button(label).on_hover_text("Switch grid density").clicked() {
                        self.toggle_density();
                    }
                });
            });
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let text = self
                .status
                .as_deref()
                .unwrap_or("Drag across the grid to create an event; click an event to edit it");
            ui.label(egui::RichText::new(text).size(12.0));
        });
    }

    fn toggle_density(&mut self) {
        self.settings.density = self.settings.density.toggled();
        if let Err(e) = self.settings_service.save(&self.settings) {
            log::warn!("Failed to save settings: {:#}", e);
        }
        self.grid.apply_settings(&self.settings);
    }

    fn apply_interaction(&mut self, interaction: GridInteraction) {
        if let Some(event) = interaction.event_to_edit {
            log::info!("Edit requested for event {}", event.id);
            self.status = Some(format!(
                "Editing {} \"{}\" ({} - {})",
                event.event_type.label(),
                event.title,
                event.start.format("%a %H:%M"),
                event.end.format("%a %H:%M")
            ));
        }

        if let Some(range) = interaction.selected_range {
            let event = placeholder_event(next_event_id(&self.events), range);
            log::info!("Created event {} from {} to {}", event.id, event.start, event.end);
            self.status = Some(format!(
                "Created \"{}\" ({} - {})",
                event.title,
                event.start.format("%a %H:%M"),
                event.end.format("%a %H:%M")
            ));
            self.events.push(event);
        }
    }
}

/// Event standing in for the creation dialog's result.
pub fn placeholder_event(id: i64, range: TimeRange) -> CalendarEvent {
    let end = if range.end > range.start {
        range.end
    } else {
        range.start + Duration::minutes(DEFAULT_NEW_EVENT_MINUTES)
    };
    CalendarEvent::new(id, "New event", range.start, end)
}

/// A week of sample lessons around `anchor`, used when no event file is given.
pub fn sample_events(anchor: NaiveDate, first_day_of_week: u8) -> Vec<CalendarEvent> {
    let days = week_dates(anchor, first_day_of_week, 7);
    let at = |day: usize, hour: u32, minute: u32| -> Option<NaiveDateTime> {
        days.get(day)?.and_hms_opt(hour, minute, 0)
    };

    let mut events = Vec::new();
    let mut push = |title: &str, event_type: EventType, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>, all_day: bool| {
        let (Some(start), Some(end)) = (start, end) else {
            return;
        };
        let built = CalendarEvent::builder()
            .id(events.len() as i64 + 1)
            .title(title)
            .start(start)
            .end(end)
            .event_type(event_type)
            .all_day(all_day)
            .build();
        match built {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("Skipping sample event {}: {}", title, e),
        }
    };

    push("Algebra", EventType::Class, at(0, 9, 0), at(0, 10, 0), false);
    push("Department meeting", EventType::Meeting, at(0, 9, 30), at(0, 10, 30), false);
    push("Parent call", EventType::Meeting, at(0, 10, 15), at(0, 11, 0), false);
    push("Office hours", EventType::OfficeHours, at(1, 13, 0), at(1, 15, 0), false);
    push("Chemistry", EventType::Class, at(2, 11, 0), at(2, 12, 30), false);
    push("Sports day", EventType::Other, at(2, 0, 0), at(3, 0, 0), true);
    push("Mock exams", EventType::Exam, at(3, 8, 30), at(3, 15, 30), false);
    push("Late rehearsal", EventType::Other, at(4, 16, 0), at(4, 19, 30), false);
    push("Field trip", EventType::Other, at(3, 0, 0), at(5, 0, 0), true);

    events
}
