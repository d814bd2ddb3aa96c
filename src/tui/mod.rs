//! Terminal User Interface module
//!
//! Interactive dashboard over the generated artifacts: a search box,
//! category chips, stat tiles and a scrollable list of result cards.

mod app;
mod input;
mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
