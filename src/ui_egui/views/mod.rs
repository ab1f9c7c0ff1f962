pub mod palette;
pub mod week_grid;

pub use week_grid::WeekGridView;
