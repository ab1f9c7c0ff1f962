// School Calendar Library
// Week/day time-grid layout engine, interaction services and egui renderer

pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
