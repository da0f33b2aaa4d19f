use std::path::Path;

use testmetry_core::{COUNT_UNAVAILABLE, Dialect, RESOURCE_HARD_CAP, TagFilter};
use testmetry_types::{Context, Contexts, Metrics, Ranking, Resource, Scope, Session, Sessions};

use crate::Result;
use crate::queries;
use crate::store::Store;

/// Dialect over an embedded SQLite telemetry file.
///
/// Construction surfaces errors; queries never do. A failing query, a
/// file without the telemetry tables included, degrades into the
/// sentinels the [`Dialect`] contract defines.
pub struct Local {
    store: Store,
}

impl Local {
    /// Open a telemetry file, creating an empty database when missing.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: Store::open(path)?,
        })
    }

    /// Open an existing telemetry file without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        Ok(Self {
            store: Store::open_read_only(path)?,
        })
    }

    /// An in-memory database. It has no telemetry tables, so every query
    /// answers with sentinels.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
        })
    }
}

impl Dialect for Local {
    fn sessions(&self, filter: &TagFilter) -> Sessions {
        queries::sessions::list(self.store.conn(), filter).unwrap_or_default()
    }

    fn session_details(&self, session_h: &str) -> Option<Session> {
        queries::sessions::get(self.store.conn(), session_h).unwrap_or_default()
    }

    fn session_metrics(&self, session_h: &str) -> Metrics {
        queries::metrics::by_session(self.store.conn(), session_h).unwrap_or_default()
    }

    fn sessions_from_build(&self, pipeline: &str, build: &str) -> Sessions {
        queries::sessions::from_build(self.store.conn(), pipeline, build).unwrap_or_default()
    }

    fn count_sessions(&self) -> i64 {
        queries::sessions::count(self.store.conn()).unwrap_or(COUNT_UNAVAILABLE)
    }

    fn contexts(&self) -> Contexts {
        queries::contexts::list(self.store.conn()).unwrap_or_default()
    }

    fn context_details(&self, context_h: &str) -> Option<Context> {
        queries::contexts::get(self.store.conn(), context_h).unwrap_or_default()
    }

    fn context_metrics(&self, context_h: &str) -> Metrics {
        queries::metrics::by_context(self.store.conn(), context_h).unwrap_or_default()
    }

    fn count_contexts(&self) -> i64 {
        queries::contexts::count(self.store.conn()).unwrap_or(COUNT_UNAVAILABLE)
    }

    fn metrics(&self) -> Metrics {
        queries::metrics::all(self.store.conn()).unwrap_or_default()
    }

    fn metrics_with_scm_ref(&self, scm_ref: &str) -> Metrics {
        queries::metrics::by_scm(self.store.conn(), scm_ref).unwrap_or_default()
    }

    fn metrics_by_scope(&self, scope: Scope) -> Metrics {
        queries::metrics::by_scope(self.store.conn(), scope).unwrap_or_default()
    }

    fn metrics_by_pattern(&self, item: Option<&str>, variant: Option<&str>) -> Metrics {
        match (item, variant) {
            (Some(item), None) => {
                queries::metrics::by_item_prefix(self.store.conn(), item).unwrap_or_default()
            }
            (None, Some(variant)) => {
                queries::metrics::by_variant_prefix(self.store.conn(), variant).unwrap_or_default()
            }
            _ => Metrics::new(),
        }
    }

    fn item_metrics(&self, item: &str) -> Metrics {
        queries::metrics::by_item(self.store.conn(), item).unwrap_or_default()
    }

    fn variant_metrics(&self, variant: &str, component: Option<&str>) -> Metrics {
        queries::metrics::by_variant(self.store.conn(), variant, component).unwrap_or_default()
    }

    fn count_metrics(
        &self,
        session_h: Option<&str>,
        context_h: Option<&str>,
        scm_ref: Option<&str>,
    ) -> i64 {
        queries::metrics::count(self.store.conn(), session_h, context_h, scm_ref)
            .unwrap_or(COUNT_UNAVAILABLE)
    }

    fn components(&self) -> Vec<String> {
        queries::components::list(self.store.conn()).unwrap_or_default()
    }

    fn component_metrics(&self, component: Option<&str>) -> Metrics {
        queries::components::metrics(self.store.conn(), component).unwrap_or_default()
    }

    fn component_pipelines(&self, component: &str) -> Vec<String> {
        queries::components::pipelines(self.store.conn(), component).unwrap_or_default()
    }

    fn component_pipeline_builds(&self, component: &str, pipeline: &str) -> Vec<String> {
        queries::components::pipeline_builds(self.store.conn(), component, pipeline)
            .unwrap_or_default()
    }

    fn count_components(&self) -> i64 {
        queries::components::count(self.store.conn()).unwrap_or(COUNT_UNAVAILABLE)
    }

    fn pipelines(&self) -> Vec<String> {
        queries::pipelines::list(self.store.conn()).unwrap_or_default()
    }

    fn pipeline_builds(&self, pipeline: &str) -> Vec<String> {
        queries::pipelines::builds(self.store.conn(), pipeline).unwrap_or_default()
    }

    fn metrics_by_resource(
        &self,
        resource: Resource,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        queries::resources::rank(self.store.conn(), resource, ranking, limit).unwrap_or_default()
    }

    fn metrics_by_component_resource(
        &self,
        resource: Resource,
        component: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        queries::resources::rank_by_component(self.store.conn(), resource, component, ranking, limit)
            .unwrap_or_default()
    }

    fn metrics_by_pipeline_resource(
        &self,
        resource: Resource,
        pipeline: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        queries::resources::rank_by_pipeline(self.store.conn(), resource, pipeline, ranking, limit)
            .unwrap_or_default()
    }

    fn metrics_by_build_resource(
        &self,
        resource: Resource,
        pipeline: &str,
        build: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        queries::resources::rank_by_build(
            self.store.conn(),
            resource,
            pipeline,
            build,
            ranking,
            limit,
        )
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // An in-memory connection has no telemetry tables, which is exactly
    // the degraded backend the sentinel contract covers.

    #[test]
    fn missing_tables_degrade_counts_to_sentinel() {
        let local = Local::open_in_memory().unwrap();

        assert_eq!(local.count_sessions(), COUNT_UNAVAILABLE);
        assert_eq!(local.count_contexts(), COUNT_UNAVAILABLE);
        assert_eq!(local.count_components(), COUNT_UNAVAILABLE);
        assert_eq!(local.count_metrics(None, None, None), COUNT_UNAVAILABLE);
        assert_eq!(local.count_metrics(Some("s"), None, None), COUNT_UNAVAILABLE);
    }

    #[test]
    fn missing_tables_degrade_listings_to_empty() {
        let local = Local::open_in_memory().unwrap();

        assert!(local.metrics().is_empty());
        assert!(local.sessions(&TagFilter::new()).is_empty());
        assert!(local.contexts().is_empty());
        assert!(local.components().is_empty());
        assert!(local.pipelines().is_empty());
        assert!(
            local
                .metrics_by_resource(Resource::TotalTime, Ranking::Top, 10)
                .is_empty()
        );
    }

    #[test]
    fn missing_tables_degrade_lookups_to_none() {
        let local = Local::open_in_memory().unwrap();

        assert!(local.session_details("deadbeef").is_none());
        assert!(local.context_details("deadbeef").is_none());
    }
}
