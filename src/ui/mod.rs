//! Ratatui front-end. It turns key presses into navigation events and draws
//! whatever screen the controller currently holds; it never talks to the
//! store directly.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
