//! Terminal probe components

mod app;
pub mod input;
pub mod theme;
mod widgets;

pub use app::{App, AppState, LogEntry};
pub use theme::ThemeColors;
pub use widgets::*;
