// Remote HTTP dialect
// Talks to telemetry servers speaking the paginated monitor protocol

mod http;
mod remote;
mod wire;

pub mod error;

// Public API
pub use error::{Error, Result};
pub use http::ClientOptions;
pub use remote::Remote;
