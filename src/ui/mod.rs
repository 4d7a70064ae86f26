//! Ratatui front end: a numbered menu, one dialog per catalog action, and a
//! scrollable book list. Raw text is parsed here; the catalog only ever sees
//! typed values.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
