mod app;
pub mod views;

pub use app::{placeholder_event, sample_events, CalendarApp};
