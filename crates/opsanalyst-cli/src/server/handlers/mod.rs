//! API request handlers.

mod analyze;
mod models;
mod preview;

pub use analyze::*;
pub use models::*;
pub use preview::*;
