// School Calendar Application
// Main entry point

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Local;
use school_calendar::services::event::load_events;
use school_calendar::services::settings::SettingsService;
use school_calendar::ui_egui::{sample_events, CalendarApp};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting School Calendar");

    let settings_service = SettingsService::from_project_dirs();
    log::info!("Using settings file {}", settings_service.path().display());

    // Optional first argument: JSON file with an array of events
    let events = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_events(&path)?,
        None => {
            let settings = settings_service.load_or_default();
            log::info!("No event file given; showing sample week");
            sample_events(Local::now().date_naive(), settings.first_day_of_week)
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("School Calendar"),
        ..Default::default()
    };

    eframe::run_native(
        "School Calendar",
        options,
        Box::new(move |cc| Ok(Box::new(CalendarApp::new(cc, settings_service, events)))),
    )
    .map_err(|e| anyhow!("failed to run calendar window: {e}"))
}
