//! testmetry-sdk: query client for test-execution telemetry.
//!
//! # Overview
//!
//! Test runners instrumented with a monitoring plugin record what every
//! test cost (wall time, CPU split, memory) along with the session it
//! ran in and the machine it ran on. This SDK queries that telemetry,
//! whether it sits in a local SQLite file next to your checkout or
//! behind a central collection server, through one API: you connect a
//! [`Monitor`] to an address and the right backend is picked from its
//! shape.
//!
//! Queries never fail after connection. An unreachable backend answers
//! with sentinels instead: listings come back empty, point lookups come
//! back `None` and counts come back [`COUNT_UNAVAILABLE`]. Counts are
//! the way to tell an empty backend (0) from an unreachable one (-1).
//!
//! # Quickstart
//!
//! ```no_run
//! use testmetry_sdk::{Monitor, Ranking, Resource, TagFilter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A file path connects to an embedded store; an http(s) URL
//!     // would connect to a telemetry server instead.
//!     let monitor = Monitor::connect("ci/telemetry.db")?;
//!
//!     let nightly = monitor.list_sessions(
//!         &TagFilter::new().tag_value("pipeline_branch", "nightly"),
//!     );
//!     println!("{} nightly sessions", nightly.len());
//!
//!     for metric in &monitor.list_metrics_resources(Resource::Memory, Ranking::Top, 5) {
//!         println!("{:>8.1} MB  {}", metric.memory_usage, metric.variant);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod monitor;

pub use error::{Error, Result};
pub use monitor::{ConnectOptions, Monitor};
pub use testmetry_core::{COUNT_UNAVAILABLE, RESOURCE_HARD_CAP, TagFilter};
pub use testmetry_types as types;
pub use testmetry_types::{MatchMode, Ranking, Resource, Scope};
