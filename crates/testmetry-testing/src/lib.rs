// Shared fixtures for the workspace test suites: a canned telemetry
// dataset, a seeded on-disk database and a wire-faithful HTTP backend.
// Everything here is test support; the error handling style is
// deliberately expect-heavy.

pub mod dataset;
pub mod server;
pub mod store;

pub use server::{FakeServer, unused_port_url};
pub use store::StoreFixture;
