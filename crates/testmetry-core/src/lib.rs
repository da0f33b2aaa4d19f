// Backend contract shared by every telemetry source

pub mod dialect;
pub mod filter;

pub use dialect::Dialect;
pub use filter::TagFilter;

/// Largest number of metrics a resource ranking returns, whatever the
/// caller asked for.
pub const RESOURCE_HARD_CAP: usize = 500;

/// Sentinel returned by count operations when the backend cannot answer.
pub const COUNT_UNAVAILABLE: i64 = -1;
