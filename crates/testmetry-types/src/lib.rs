//! Core domain types for test-execution telemetry: measurement entities,
//! field projection, tag handling and dedup-aware collections.

pub mod collections;
pub mod domain;
pub mod enums;
pub mod fields;
pub mod tags;
mod util;

pub use collections::{Contexts, Metrics, Sessions};
pub use domain::{Context, Metric, Session};
pub use enums::{MatchMode, Ranking, Resource, Scope};
pub use fields::{CONTEXT_FIELDS, Field, METRIC_FIELDS, Record, SESSION_FIELDS};
pub use tags::{Tags, tags_from_json, tags_from_value};
pub use util::*;
