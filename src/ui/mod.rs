//! Ratatui front-end. It owns no records of its own: every action calls into
//! the [`crate::store::Store`] held by [`App`] and every frame re-reads it.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, StatusKind};
pub use screens::Tab;
pub use terminal::run_app;
