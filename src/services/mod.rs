// Service module exports
// Layout, interaction and persistence services behind the week grid

pub mod event;
pub mod grid;
pub mod layout;
pub mod now_indicator;
pub mod selection;
pub mod settings;
