use testmetry_core::{COUNT_UNAVAILABLE, Dialect, RESOURCE_HARD_CAP, TagFilter};
use testmetry_types::{
    Context, Contexts, Metrics, Ranking, Resource, Scope, Session, Sessions,
};

use crate::error::{Error, Result};
use crate::http::{ClientOptions, HttpClient};
use crate::wire::{self, ContextDto, SessionDto};

/// Dialect over a remote telemetry server.
///
/// Construction surfaces errors; queries never do. An unreachable
/// server, a broken page or an unexpected status all degrade into the
/// sentinels the [`Dialect`] contract defines, and a failure partway
/// through a paginated listing discards the pages already fetched.
pub struct Remote {
    http: HttpClient,
}

impl Remote {
    /// Connect to a server with default options.
    pub fn connect(url: &str) -> Result<Self> {
        Self::connect_with(url, &ClientOptions::default())
    }

    pub fn connect_with(url: &str, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(url, options)?,
        })
    }

    fn list_metrics(&self, path: &str) -> Result<Metrics> {
        wire::decode_metrics(self.http.items(path, "metrics")?)
    }

    fn list_sessions(&self, path: &str) -> Result<Sessions> {
        wire::decode_sessions(self.http.items(path, "sessions")?)
    }

    fn list_names(&self, path: &str, key: &'static str) -> Result<Vec<String>> {
        Ok(wire::decode_strings(self.http.items(path, key)?))
    }

    fn fetch_session(&self, session_h: &str) -> Result<Option<Session>> {
        let Some(body) = self.http.lookup(&format!("/sessions/{session_h}"))? else {
            return Ok(None);
        };
        // Point lookups come wrapped in the same envelope key as listings
        let Some(payload) = body.get("sessions") else {
            return Err(Error::Envelope("sessions"));
        };
        let dto: SessionDto = serde_json::from_value(payload.clone())?;
        Ok(Some(dto.into_session()))
    }

    fn fetch_context(&self, context_h: &str) -> Result<Option<Context>> {
        let Some(body) = self.http.lookup(&format!("/contexts/{context_h}"))? else {
            return Ok(None);
        };
        let dto: ContextDto = serde_json::from_value(body)?;
        Ok(Some(dto.into_context()))
    }

    /// Build listings carry bare session identifiers, resolved here one
    /// by one. Identifiers the server cannot resolve are skipped.
    fn fetch_build_sessions(&self, pipeline: &str, build: &str) -> Result<Sessions> {
        let ids = self.list_names(
            &format!("/pipelines/{pipeline}/builds/{build}/sessions"),
            "sessions",
        )?;
        let mut sessions = Sessions::new();
        for id in ids {
            if let Some(session) = self.session_details(&id) {
                sessions.insert(session);
            }
        }
        Ok(sessions)
    }
}

/// Listing query for sessions. Filter parameters only appear when the
/// filter constrains something; value lists keep their positions, so a
/// trailing presence-only constraint still emits its empty slot.
fn sessions_url(filter: &TagFilter) -> String {
    if filter.is_empty() {
        return "/sessions/".to_string();
    }
    let names: Vec<&str> = filter.names().collect();
    let values: Vec<&str> = filter.values().collect();
    format!(
        "/sessions/?with_tags={}&restrict_flags={}&method={}",
        names.join(","),
        values.join(","),
        filter.match_mode().as_str()
    )
}

fn direction(ranking: Ranking) -> &'static str {
    match ranking {
        Ranking::Top => "head",
        Ranking::Lowest => "tail",
    }
}

impl Dialect for Remote {
    fn sessions(&self, filter: &TagFilter) -> Sessions {
        self.list_sessions(&sessions_url(filter)).unwrap_or_default()
    }

    fn session_details(&self, session_h: &str) -> Option<Session> {
        self.fetch_session(session_h).unwrap_or_default()
    }

    fn session_metrics(&self, session_h: &str) -> Metrics {
        self.list_metrics(&format!("/sessions/{session_h}/metrics"))
            .unwrap_or_default()
    }

    fn sessions_from_build(&self, pipeline: &str, build: &str) -> Sessions {
        self.fetch_build_sessions(pipeline, build).unwrap_or_default()
    }

    fn count_sessions(&self) -> i64 {
        self.http.count("/sessions/count").unwrap_or(COUNT_UNAVAILABLE)
    }

    fn contexts(&self) -> Contexts {
        self.http
            .items("/contexts/", "contexts")
            .and_then(wire::decode_contexts)
            .unwrap_or_default()
    }

    fn context_details(&self, context_h: &str) -> Option<Context> {
        self.fetch_context(context_h).unwrap_or_default()
    }

    fn context_metrics(&self, context_h: &str) -> Metrics {
        self.list_metrics(&format!("/contexts/{context_h}/metrics"))
            .unwrap_or_default()
    }

    fn count_contexts(&self) -> i64 {
        self.http.count("/contexts/count").unwrap_or(COUNT_UNAVAILABLE)
    }

    fn metrics(&self) -> Metrics {
        self.list_metrics("/metrics/").unwrap_or_default()
    }

    fn metrics_with_scm_ref(&self, scm_ref: &str) -> Metrics {
        self.list_metrics(&format!("/filters/scm/{scm_ref}/metrics"))
            .unwrap_or_default()
    }

    fn metrics_by_scope(&self, scope: Scope) -> Metrics {
        self.list_metrics(&format!("/filters/scope/{}/metrics", scope.as_str()))
            .unwrap_or_default()
    }

    fn metrics_by_pattern(&self, item: Option<&str>, variant: Option<&str>) -> Metrics {
        match (item, variant) {
            (Some(item), None) => self
                .list_metrics(&format!("/items/like/{item}/metrics"))
                .unwrap_or_default(),
            (None, Some(variant)) => self
                .list_metrics(&format!("/variants/like/{variant}/metrics"))
                .unwrap_or_default(),
            _ => Metrics::new(),
        }
    }

    fn item_metrics(&self, item: &str) -> Metrics {
        self.list_metrics(&format!("/items/{item}/metrics"))
            .unwrap_or_default()
    }

    fn variant_metrics(&self, variant: &str, component: Option<&str>) -> Metrics {
        let path = match component {
            Some(component) => format!("/components/{component}/variants/{variant}/metrics"),
            None => format!("/variants/{variant}/metrics"),
        };
        self.list_metrics(&path).unwrap_or_default()
    }

    fn count_metrics(
        &self,
        session_h: Option<&str>,
        context_h: Option<&str>,
        scm_ref: Option<&str>,
    ) -> i64 {
        let path = match (session_h, context_h, scm_ref) {
            (Some(h), _, _) => format!("/sessions/{h}/metrics/count"),
            (None, Some(h), _) => format!("/contexts/{h}/metrics/count"),
            (None, None, Some(scm)) => format!("/filters/scm/{scm}/metrics/count"),
            (None, None, None) => "/metrics/count".to_string(),
        };
        self.http.count(&path).unwrap_or(COUNT_UNAVAILABLE)
    }

    fn components(&self) -> Vec<String> {
        self.list_names("/components/", "components").unwrap_or_default()
    }

    fn component_metrics(&self, component: Option<&str>) -> Metrics {
        let path = match component {
            Some(component) => format!("/components/{component}/metrics"),
            None => "/components/metrics".to_string(),
        };
        self.list_metrics(&path).unwrap_or_default()
    }

    fn component_pipelines(&self, component: &str) -> Vec<String> {
        self.list_names(&format!("/components/{component}/pipelines"), "pipelines")
            .unwrap_or_default()
    }

    fn component_pipeline_builds(&self, component: &str, pipeline: &str) -> Vec<String> {
        self.list_names(
            &format!("/components/{component}/pipelines/{pipeline}/builds"),
            "builds",
        )
        .unwrap_or_default()
    }

    fn count_components(&self) -> i64 {
        self.http.count("/components/count").unwrap_or(COUNT_UNAVAILABLE)
    }

    fn pipelines(&self) -> Vec<String> {
        self.list_names("/pipelines/", "pipelines").unwrap_or_default()
    }

    fn pipeline_builds(&self, pipeline: &str) -> Vec<String> {
        self.list_names(&format!("/pipelines/{pipeline}/builds"), "builds")
            .unwrap_or_default()
    }

    fn metrics_by_resource(
        &self,
        resource: Resource,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        self.list_metrics(&format!(
            "/resources/{}/{}/{limit}/metrics",
            resource.as_str(),
            direction(ranking)
        ))
        .unwrap_or_default()
    }

    fn metrics_by_component_resource(
        &self,
        resource: Resource,
        component: &str,
        ranking: Ranking,
        max_element: usize,
    ) -> Metrics {
        let limit = max_element.min(RESOURCE_HARD_CAP);
        self.list_metrics(&format!(
            "/resources/{}/components/{component}/{}/{limit}/metrics",
            resource.as_str(),
            direction(ranking)
        ))
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
        self.list_metrics(&format!(
            "/resources/{}/pipelines/{pipeline}/{}/{limit}/metrics",
            resource.as_str(),
            direction(ranking)
        ))
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
        self.list_metrics(&format!(
            "/resources/{}/pipelines/{pipeline}/builds/{build}/{}/{limit}/metrics",
            resource.as_str(),
            direction(ranking)
        ))
        .unwrap_or_default()
    }
}
