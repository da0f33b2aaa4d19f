mod context;
mod metric;
mod session;

pub use context::Context;
pub use metric::Metric;
pub use session::Session;
