//! Local web server for the interactive report view.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
