// Embedded SQLite dialect
// Reads telemetry databases produced by test runners, never writes them

mod hydrate;
mod local;
mod queries;
mod store;

pub mod error;

// Public API
pub use error::{Error, Result};
pub use local::Local;
pub use store::Store;
