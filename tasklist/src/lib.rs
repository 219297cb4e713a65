//! `Tasklist`: terminal task list backed by a REST task service.

pub mod api;
pub mod app;
pub mod config;
pub mod store;
pub mod sync;
pub mod ui;
