use std::path::Path;
use std::time::Duration;

use testmetry_client::{ClientOptions, Remote};
use testmetry_core::{Dialect, TagFilter};
use testmetry_store::Local;
use testmetry_types::{
    Context, Contexts, Metrics, Ranking, Resource, Scope, Session, Sessions,
};

use crate::error::Result;

/// Connection tuning for [`Monitor::connect_with`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// HTTP request timeout. Remote sources only.
    pub timeout: Duration,
    /// Override the User-Agent header. Remote sources only.
    pub user_agent: Option<String>,
    /// Open the database without write access. Local sources only.
    pub read_only: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            read_only: false,
        }
    }
}

/// Entry point for querying a telemetry source.
///
/// The source kind is decided once, at connection time, from the shape
/// of the address. After that every operation behaves identically over
/// both kinds: listings come back empty and counts come back `-1` when
/// the backend cannot answer, and counts are the only way to tell an
/// empty backend (0) from an unreachable one (-1).
pub struct Monitor {
    dialect: Box<dyn Dialect>,
}

impl Monitor {
    /// Connect to a telemetry source with default options.
    ///
    /// Addresses starting with `http://` or `https://` are remote
    /// servers; anything else is a path to an embedded database file.
    pub fn connect(source: &str) -> Result<Self> {
        Self::connect_with(source, &ConnectOptions::default())
    }

    pub fn connect_with(source: &str, options: &ConnectOptions) -> Result<Self> {
        let dialect: Box<dyn Dialect> = if source.starts_with("http://")
            || source.starts_with("https://")
        {
            let defaults = ClientOptions::default();
            let client = ClientOptions {
                timeout: options.timeout,
                user_agent: options.user_agent.clone().unwrap_or(defaults.user_agent),
            };
            Box::new(Remote::connect_with(source, &client)?)
        } else if options.read_only {
            Box::new(Local::open_read_only(Path::new(source))?)
        } else {
            Box::new(Local::open(Path::new(source))?)
        };
        Ok(Self { dialect })
    }

    // --- Sessions ---

    /// Sessions matching `filter`, an empty filter selecting all of them.
    pub fn list_sessions(&self, filter: &TagFilter) -> Sessions {
        self.dialect.sessions(filter)
    }

    /// The session with the given identifier.
    pub fn get_session(&self, session_h: &str) -> Option<Session> {
        self.dialect.session_details(session_h)
    }

    /// Metrics recorded under one session.
    pub fn list_session_metrics(&self, session_h: &str) -> Metrics {
        self.dialect.session_metrics(session_h)
    }

    /// Sessions recorded by one build of a pipeline.
    pub fn list_build_sessions(&self, pipeline: &str, build: &str) -> Sessions {
        self.dialect.sessions_from_build(pipeline, build)
    }

    pub fn count_sessions(&self) -> i64 {
        self.dialect.count_sessions()
    }

    // --- Contexts ---

    /// Every known execution context.
    pub fn list_contexts(&self) -> Contexts {
        self.dialect.contexts()
    }

    /// The execution context with the given identifier.
    pub fn get_context(&self, context_h: &str) -> Option<Context> {
        self.dialect.context_details(context_h)
    }

    /// Metrics measured on one execution context.
    pub fn list_context_metrics(&self, context_h: &str) -> Metrics {
        self.dialect.context_metrics(context_h)
    }

    pub fn count_contexts(&self) -> i64 {
        self.dialect.count_contexts()
    }

    // --- Metrics ---

    /// Every known metric.
    pub fn list_metrics(&self) -> Metrics {
        self.dialect.metrics()
    }

    /// Metrics of sessions recorded against one SCM reference.
    pub fn list_metrics_by_scm_id(&self, scm_ref: &str) -> Metrics {
        self.dialect.metrics_with_scm_ref(scm_ref)
    }

    /// Metrics measured at one scope.
    pub fn list_metrics_by_scope(&self, scope: Scope) -> Metrics {
        self.dialect.metrics_by_scope(scope)
    }

    /// Metrics whose item or variant starts with the given prefix.
    /// Exactly one prefix must be given; anything else selects nothing.
    pub fn list_metrics_from_pattern(
        &self,
        item: Option<&str>,
        variant: Option<&str>,
    ) -> Metrics {
        self.dialect.metrics_by_pattern(item, variant)
    }

    /// Metrics whose bare item name is exactly `item`.
    pub fn list_item_metrics(&self, item: &str) -> Metrics {
        self.dialect.item_metrics(item)
    }

    /// Metrics of one exact variant, optionally restricted to a component.
    pub fn list_metrics_of_variant(&self, variant: &str, component: Option<&str>) -> Metrics {
        self.dialect.variant_metrics(variant, component)
    }

    /// Number of known metrics, narrowed to one session, context or SCM
    /// reference when given. The first narrowing argument wins.
    pub fn count_metrics(
        &self,
        session_h: Option<&str>,
        context_h: Option<&str>,
        scm_ref: Option<&str>,
    ) -> i64 {
        self.dialect.count_metrics(session_h, context_h, scm_ref)
    }

    // --- Components and pipelines ---

    /// Distinct component names, the unassigned (empty) one included.
    pub fn list_components(&self) -> Vec<String> {
        self.dialect.components()
    }

    /// Metrics of one component, or of no component when `None`.
    pub fn list_component_metrics(&self, component: Option<&str>) -> Metrics {
        self.dialect.component_metrics(component)
    }

    /// Pipelines whose sessions produced metrics for `component`.
    pub fn list_component_pipelines(&self, component: &str) -> Vec<String> {
        self.dialect.component_pipelines(component)
    }

    /// Builds of `pipeline` whose sessions produced metrics for
    /// `component`.
    pub fn list_component_pipeline_builds(&self, component: &str, pipeline: &str) -> Vec<String> {
        self.dialect.component_pipeline_builds(component, pipeline)
    }

    /// Number of distinct named components, the unassigned one excluded.
    pub fn count_components(&self) -> i64 {
        self.dialect.count_components()
    }

    /// Distinct pipeline names found in session tags.
    pub fn list_pipelines(&self) -> Vec<String> {
        self.dialect.pipelines()
    }

    /// Distinct build numbers of one pipeline.
    pub fn list_pipeline_builds(&self, pipeline: &str) -> Vec<String> {
        self.dialect.pipeline_builds(pipeline)
    }

    // --- Resource rankings ---

    /// The `max_element` heaviest (or lightest) metrics by `resource`.
    /// At most 500 rows come back however large `max_element` is.
    pub fn list_metrics_resources(
        &self,
        resource: Resource,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        self.dialect.metrics_by_resource(resource, ranking, max_element)
    }

    /// Resource ranking restricted to one component.
    pub fn list_metrics_resources_from_component(
        &self,
        resource: Resource,
        component: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        self.dialect
            .metrics_by_component_resource(resource, component, ranking, max_element)
    }

    /// Resource ranking restricted to one pipeline.
    pub fn list_metrics_resources_from_pipeline(
        &self,
        resource: Resource,
        pipeline: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        self.dialect
            .metrics_by_pipeline_resource(resource, pipeline, ranking, max_element)
    }

    /// Resource ranking restricted to one build of a pipeline.
    pub fn list_metrics_resources_from_build(
        &self,
        resource: Resource,
        pipeline: &str,
        build: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        self.dialect
            .metrics_by_build_resource(resource, pipeline, build, ranking, max_element)
    }

    // --- Cross-collection traversals ---

    /// Union of the metrics of the given sessions and contexts,
    /// deduplicated by content hash.
    pub fn list_metrics_from(
        &self,
        sessions: Option<&Sessions>,
        contexts: Option<&Contexts>,
    ) -> Metrics {
        self.dialect.metrics_from(sessions, contexts)
    }

    /// Sessions referenced by the given metrics.
    pub fn list_sessions_from(&self, metrics: &Metrics) -> Sessions {
        self.dialect.sessions_from(metrics)
    }

    /// Contexts referenced by the given metrics.
    pub fn list_contexts_from(&self, metrics: &Metrics) -> Contexts {
        self.dialect.contexts_from(metrics)
    }
}
