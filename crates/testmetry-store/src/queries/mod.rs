//! One module per query family. All functions are read-only and return
//! the crate [`Result`](crate::Result); the [`Local`](crate::Local)
//! dialect is the layer that degrades failures into sentinels.

pub(crate) mod components;
pub(crate) mod contexts;
pub(crate) mod metrics;
pub(crate) mod pipelines;
pub(crate) mod resources;
pub(crate) mod sessions;

// CI runners tag sessions with the pipeline they ran under. These are the
// JSON paths of those two well-known tags inside RUN_DESCRIPTION.
pub(crate) const PIPELINE_TAG: &str = "$.pipeline_branch";
pub(crate) const BUILD_TAG: &str = "$.pipeline_build_no";
