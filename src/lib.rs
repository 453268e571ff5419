//! Core library surface for the Grade Manager TUI application.
//!
//! The record store, its file format and the query helpers are usable on their
//! own; the `ui` module layers the terminal front-end on top of them.
pub mod config;
pub mod error;
pub mod grading;
pub mod logging;
pub mod models;
pub mod query;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use models::{Grade, GradeId, Lecture, LectureId, Scores, Student, StudentId};
pub use store::{Removal, Store};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
