use testmetry_types::{Context, Contexts, Metrics, Ranking, Resource, Scope, Session, Sessions};

use crate::filter::TagFilter;

/// A queryable telemetry source.
///
/// Implementations never surface storage or transport failures. When the
/// backend cannot answer, counts return [`COUNT_UNAVAILABLE`], listings
/// return empty collections and point lookups return `None`. Count
/// operations are the only way to tell an empty backend (0) from an
/// unreachable one (-1).
///
/// [`COUNT_UNAVAILABLE`]: crate::COUNT_UNAVAILABLE
pub trait Dialect: Send {
    // --- Sessions ---

    /// Sessions matching `filter`, an empty filter selecting all of them.
    fn sessions(&self, filter: &TagFilter) -> Sessions;

    /// The session with the given identifier.
    fn session_details(&self, session_h: &str) -> Option<Session>;

    /// Metrics recorded under the given session.
    fn session_metrics(&self, session_h: &str) -> Metrics;

    /// Sessions recorded by one build of a pipeline.
    fn sessions_from_build(&self, pipeline: &str, build: &str) -> Sessions;

    /// Number of stored sessions.
    fn count_sessions(&self) -> i64;

    // --- Contexts ---

    /// Every stored execution context.
    fn contexts(&self) -> Contexts;

    /// The execution context with the given identifier.
    fn context_details(&self, context_h: &str) -> Option<Context>;

    /// Metrics measured on the given execution context.
    fn context_metrics(&self, context_h: &str) -> Metrics;

    /// Number of stored execution contexts.
    fn count_contexts(&self) -> i64;

    // --- Metrics ---

    /// Every stored metric.
    fn metrics(&self) -> Metrics;

    /// Metrics of sessions recorded against the given SCM reference.
    fn metrics_with_scm_ref(&self, scm_ref: &str) -> Metrics;

    /// Metrics measured at the given scope.
    fn metrics_by_scope(&self, scope: Scope) -> Metrics;

    /// Metrics whose item or variant starts with the given prefix.
    /// Exactly one prefix must be given; anything else selects nothing.
    fn metrics_by_pattern(&self, item: Option<&str>, variant: Option<&str>) -> Metrics;

    /// Metrics whose bare item name is exactly `item`.
    fn item_metrics(&self, item: &str) -> Metrics;

    /// Metrics of one exact variant, optionally restricted to a component.
    fn variant_metrics(&self, variant: &str, component: Option<&str>) -> Metrics;

    /// Number of stored metrics, narrowed to one session, context or SCM
    /// reference when given. The first narrowing argument wins, in that
    /// order.
    fn count_metrics(
        &self,
        session_h: Option<&str>,
        context_h: Option<&str>,
        scm_ref: Option<&str>,
    ) -> i64;

    // --- Components and pipelines ---

    /// Distinct component names, the unassigned (empty) one included.
    fn components(&self) -> Vec<String>;

    /// Metrics of one component, or of no component when `None`.
    fn component_metrics(&self, component: Option<&str>) -> Metrics;

    /// Pipelines whose sessions produced metrics for `component`.
    fn component_pipelines(&self, component: &str) -> Vec<String>;

    /// Builds of `pipeline` whose sessions produced metrics for
    /// `component`.
    fn component_pipeline_builds(&self, component: &str, pipeline: &str) -> Vec<String>;

    /// Number of distinct named components, the unassigned one excluded.
    fn count_components(&self) -> i64;

    /// Distinct pipeline names found in session tags.
    fn pipelines(&self) -> Vec<String>;

    /// Distinct build numbers of one pipeline.
    fn pipeline_builds(&self, pipeline: &str) -> Vec<String>;

    // --- Resource rankings ---

    /// The `max_element` heaviest (or lightest) metrics by `resource`.
    /// `max_element` is clamped to [`RESOURCE_HARD_CAP`].
    ///
    /// [`RESOURCE_HARD_CAP`]: crate::RESOURCE_HARD_CAP
    fn metrics_by_resource(
        &self,
        resource: Resource,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics;

    /// Resource ranking restricted to one component.
    fn metrics_by_component_resource(
        &self,
        resource: Resource,
        component: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics;

    /// Resource ranking restricted to one pipeline.
    fn metrics_by_pipeline_resource(
        &self,
        resource: Resource,
        pipeline: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics;

    /// Resource ranking restricted to one build of a pipeline.
    fn metrics_by_build_resource(
        &self,
        resource: Resource,
        pipeline: &str,
        build: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics;

    // --- Derived traversals ---

    /// Union of the metrics of the given sessions and contexts,
    /// deduplicated by content hash.
    fn metrics_from(&self, sessions: Option<&Sessions>, contexts: Option<&Contexts>) -> Metrics {
        let mut metrics = Metrics::new();
        if let Some(sessions) = sessions {
            for h in sessions.ids() {
                metrics = Metrics::merge(&metrics, &self.session_metrics(h));
            }
        }
        if let Some(contexts) = contexts {
            for h in contexts.ids() {
                metrics = Metrics::merge(&metrics, &self.context_metrics(h));
            }
        }
        metrics
    }

    /// Sessions referenced by the given metrics. Identifiers the backend
    /// cannot resolve are skipped.
    fn sessions_from(&self, metrics: &Metrics) -> Sessions {
        let mut sessions = Sessions::new();
        for metric in metrics {
            if !sessions.contains(&metric.session_h)
                && let Some(session) = self.session_details(&metric.session_h)
            {
                sessions.insert(session);
            }
        }
        sessions
    }

    /// Contexts referenced by the given metrics. Identifiers the backend
    /// cannot resolve are skipped.
    fn contexts_from(&self, metrics: &Metrics) -> Contexts {
        let mut contexts = Contexts::new();
        for metric in metrics {
            if !contexts.contains(&metric.context_h)
                && let Some(context) = self.context_details(&metric.context_h)
            {
                contexts.insert(context);
            }
        }
        contexts
    }
}
