//! A real HTTP server speaking the telemetry wire protocol, backed by
//! the canned dataset. Runs on an ephemeral port in a background thread
//! and shuts down when dropped.
//!
//! Listings page when constructed with a page size, answering with the
//! `{"<key>": [...], "total_page": n, "next_url": ...}` envelopes the
//! client walks. Counts answer `{"count": n}`. Point lookups answer the
//! entity or 204.

use std::collections::{BTreeSet, HashMap};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};
use testmetry_types::{
    Context, Contexts, Metric, Metrics, Ranking, Resource, Scope, Session, Sessions, iso_timestamp,
};
use tiny_http::{Header, Response, Server};

use crate::dataset;

/// A URL on a port nothing listens on.
pub fn unused_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("probe port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

struct Data {
    sessions: Sessions,
    contexts: Contexts,
    metrics: Metrics,
}

impl Data {
    fn seeded() -> Self {
        Self {
            sessions: dataset::sessions(),
            contexts: dataset::contexts(),
            metrics: dataset::metrics(),
        }
    }

    fn empty() -> Self {
        Self {
            sessions: Sessions::new(),
            contexts: Contexts::new(),
            metrics: Metrics::new(),
        }
    }
}

enum Reply {
    Json(Value),
    NoContent,
    NotFound,
    Error,
}

pub struct FakeServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// The canned dataset, everything on one page.
    pub fn seeded() -> Self {
        Self::start(Data::seeded(), usize::MAX, None)
    }

    /// The canned dataset, listings split into pages of `per_page`.
    pub fn seeded_paged(per_page: usize) -> Self {
        Self::start(Data::seeded(), per_page, None)
    }

    /// A reachable backend with no data at all.
    pub fn empty() -> Self {
        Self::start(Data::empty(), usize::MAX, None)
    }

    /// Responds 500 to everything.
    pub fn erroring() -> Self {
        Self::start(Data::seeded(), usize::MAX, Some(0))
    }

    /// Serves `ok_requests` requests normally, then responds 500. With a
    /// small `per_page` this fails a pagination walk partway through.
    pub fn failing_after(per_page: usize, ok_requests: usize) -> Self {
        Self::start(Data::seeded(), per_page, Some(ok_requests))
    }

    fn start(data: Data, per_page: usize, fail_after: Option<usize>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind fake server");
        let addr = server.server_addr().to_ip().expect("server ip");
        let url = format!("http://{}", addr);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let log = Arc::clone(&requests);
        let stop = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            let mut served = 0usize;
            while !stop.load(Ordering::SeqCst) {
                match server.recv_timeout(Duration::from_millis(20)) {
                    Ok(Some(request)) => {
                        log.lock().expect("request log").push(request.url().to_string());
                        let reply = if fail_after.is_some_and(|limit| served >= limit) {
                            Reply::Error
                        } else {
                            route(&data, per_page, request.url())
                        };
                        served += 1;
                        let _ = match reply {
                            Reply::Json(value) => request.respond(json_response(&value)),
                            Reply::NoContent => request.respond(
                                Response::from_string(String::new()).with_status_code(204),
                            ),
                            Reply::NotFound => request.respond(
                                Response::from_string("not found").with_status_code(404),
                            ),
                            Reply::Error => request.respond(
                                Response::from_string("internal error").with_status_code(500),
                            ),
                        };
                    }
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
        });

        Self {
            url,
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw request lines (path plus query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn json_response(value: &Value) -> Response<std::io::Cursor<Vec<u8>>> {
    let header =
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).expect("header");
    Response::from_string(value.to_string()).with_header(header)
}

// --- Routing ---

fn route(data: &Data, per_page: usize, raw_url: &str) -> Reply {
    let (path, query) = raw_url.split_once('?').unwrap_or((raw_url, ""));
    let params: HashMap<&str, &str> = query
        .split('&')
        .filter(|kv| !kv.is_empty())
        .filter_map(|kv| kv.split_once('='))
        .collect();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["sessions"] => paged(
            "sessions",
            filter_sessions(data, &params).iter().map(|s| session_json(s)).collect(),
            path,
            &params,
            per_page,
        ),
        ["sessions", "count"] => count(data.sessions.len()),
        ["sessions", h] => match data.sessions.get(h) {
            Some(session) => Reply::Json(json!({ "sessions": session_json(session) })),
            None => Reply::NoContent,
        },
        ["sessions", h, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.session_h == *h),
            path,
            &params,
            per_page,
        ),
        ["sessions", h, "metrics", "count"] => {
            count(data.metrics.filter_with(|m| m.session_h == *h).len())
        }

        ["contexts"] => paged(
            "contexts",
            data.contexts.iter().map(context_json).collect(),
            path,
            &params,
            per_page,
        ),
        ["contexts", "count"] => count(data.contexts.len()),
        ["contexts", h] => match data.contexts.get(h) {
            Some(context) => Reply::Json(context_json(context)),
            None => Reply::NoContent,
        },
        ["contexts", h, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.context_h == *h),
            path,
            &params,
            per_page,
        ),
        ["contexts", h, "metrics", "count"] => {
            count(data.metrics.filter_with(|m| m.context_h == *h).len())
        }

        ["metrics"] => metrics_page(data.metrics.filter_with(|_| true), path, &params, per_page),
        ["metrics", "count"] => count(data.metrics.len()),

        ["components"] => paged(
            "components",
            components(data).into_iter().map(Value::String).collect(),
            path,
            &params,
            per_page,
        ),
        ["components", "count"] => {
            count(components(data).iter().filter(|c| !c.is_empty()).count())
        }
        ["components", "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.component.is_empty()),
            path,
            &params,
            per_page,
        ),
        ["components", c, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.component == *c),
            path,
            &params,
            per_page,
        ),
        ["components", c, "pipelines"] => paged(
            "pipelines",
            pipelines_of(component_sessions(data, c).into_iter())
                .into_iter()
                .map(Value::String)
                .collect(),
            path,
            &params,
            per_page,
        ),
        ["components", c, "pipelines", p, "builds"] => paged(
            "builds",
            builds_of(component_sessions(data, c).into_iter(), p)
                .into_iter()
                .map(Value::String)
                .collect(),
            path,
            &params,
            per_page,
        ),
        ["components", c, "variants", v, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.variant == *v && m.component == *c),
            path,
            &params,
            per_page,
        ),

        ["items", "like", prefix, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.item.starts_with(prefix)),
            path,
            &params,
            per_page,
        ),
        ["items", item, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.item == *item),
            path,
            &params,
            per_page,
        ),
        ["variants", "like", prefix, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.variant.starts_with(prefix)),
            path,
            &params,
            per_page,
        ),
        ["variants", v, "metrics"] => metrics_page(
            data.metrics.filter_with(|m| m.variant == *v),
            path,
            &params,
            per_page,
        ),

        ["filters", "scope", scope, "metrics"] => {
            let scope = Scope::parse(scope);
            metrics_page(
                data.metrics.filter_with(|m| m.kind == scope),
                path,
                &params,
                per_page,
            )
        }
        ["filters", "scm", scm, "metrics"] => {
            metrics_page(scm_metrics(data, scm), path, &params, per_page)
        }
        ["filters", "scm", scm, "metrics", "count"] => count(scm_metrics(data, scm).len()),

        ["pipelines"] => paged(
            "pipelines",
            pipelines_of(data.sessions.iter()).into_iter().map(Value::String).collect(),
            path,
            &params,
            per_page,
        ),
        ["pipelines", p, "builds"] => paged(
            "builds",
            builds_of(data.sessions.iter(), p).into_iter().map(Value::String).collect(),
            path,
            &params,
            per_page,
        ),
        ["pipelines", p, "builds", b, "sessions"] => paged(
            "sessions",
            build_sessions(data, p, b)
                .into_iter()
                .map(|s| Value::String(s.h.clone()))
                .collect(),
            path,
            &params,
            per_page,
        ),

        ["resources", res, dir, n, "metrics"] => {
            rank_page(data, res, dir, n, |_| true, path, &params, per_page)
        }
        ["resources", res, "components", c, dir, n, "metrics"] => {
            rank_page(data, res, dir, n, |m| m.component == *c, path, &params, per_page)
        }
        ["resources", res, "pipelines", p, dir, n, "metrics"] => {
            let ids = pipeline_session_ids(data, p, None);
            rank_page(data, res, dir, n, |m| ids.contains(m.session_h.as_str()), path, &params, per_page)
        }
        ["resources", res, "pipelines", p, "builds", b, dir, n, "metrics"] => {
            let ids = pipeline_session_ids(data, p, Some(b));
            rank_page(data, res, dir, n, |m| ids.contains(m.session_h.as_str()), path, &params, per_page)
        }

        _ => Reply::NotFound,
    }
}

fn count(n: usize) -> Reply {
    Reply::Json(json!({ "count": n }))
}

fn metrics_page(
    metrics: Metrics,
    path: &str,
    params: &HashMap<&str, &str>,
    per_page: usize,
) -> Reply {
    paged(
        "metrics",
        metrics.iter().map(metric_json).collect(),
        path,
        params,
        per_page,
    )
}

#[allow(clippy::too_many_arguments)]
fn rank_page(
    data: &Data,
    resource: &str,
    direction: &str,
    max: &str,
    keep: impl Fn(&Metric) -> bool,
    path: &str,
    params: &HashMap<&str, &str>,
    per_page: usize,
) -> Reply {
    let Some(resource) = resource_from(resource) else {
        return Reply::NotFound;
    };
    let ranking = match direction {
        "head" => Ranking::Top,
        "tail" => Ranking::Lowest,
        _ => return Reply::NotFound,
    };
    let Ok(max) = max.parse::<usize>() else {
        return Reply::NotFound;
    };

    let mut picked: Vec<Metric> = data.metrics.iter().filter(|m| keep(m)).cloned().collect();
    picked.sort_by(|a, b| {
        resource_value(a, resource)
            .partial_cmp(&resource_value(b, resource))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if ranking == Ranking::Top {
        picked.reverse();
    }
    picked.truncate(max);

    paged(
        "metrics",
        picked.iter().map(metric_json).collect(),
        path,
        params,
        per_page,
    )
}

fn paged(
    key: &str,
    items: Vec<Value>,
    path: &str,
    params: &HashMap<&str, &str>,
    per_page: usize,
) -> Reply {
    // Empty result sets answer 204, the way monitor servers do
    if items.is_empty() {
        return Reply::NoContent;
    }
    let page = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let total_page = items.len().div_ceil(per_page.max(1));
    let start = (page - 1).saturating_mul(per_page);
    let slice: Vec<Value> = items.iter().skip(start).take(per_page).cloned().collect();

    let mut body = json!({ key: slice, "total_page": total_page });
    if page < total_page {
        body["next_url"] = Value::String(page_url(path, params, page + 1));
    }
    if page > 1 {
        body["prev_url"] = Value::String(page_url(path, params, page - 1));
    }

    Reply::Json(body)
}

/// Server-relative cursor preserving the filter parameters, the shape
/// the client is expected to join onto its base URL.
fn page_url(path: &str, params: &HashMap<&str, &str>, page: usize) -> String {
    let mut query = String::new();
    for key in ["with_tags", "restrict_flags", "method"] {
        if let Some(value) = params.get(key) {
            query.push_str(&format!("{key}={value}&"));
        }
    }
    format!("{path}?{query}page={page}")
}

// --- Wire encoding ---

fn session_json(session: &Session) -> Value {
    let tags: Vec<Value> = session
        .tags
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    json!({
        "h": session.h,
        "run_date": iso_timestamp(&session.run_date),
        "scm_ref": session.scm_ref,
        "tags": tags,
    })
}

fn context_json(context: &Context) -> Value {
    json!({
        "h": context.h,
        "cpu_count": context.cpu_count,
        "cpu_frequency": context.cpu_freq,
        "cpu_type": context.cpu_type,
        "cpu_vendor": context.cpu_vendor,
        "ram_total": context.ram_total,
        "machine_node": context.machine_node,
        "machine_type": context.machine_type,
        "machine_arch": context.machine_arch,
        "system_info": context.sys_info,
        "python_info": context.py_info,
    })
}

fn metric_json(metric: &Metric) -> Value {
    json!({
        "session_h": metric.session_h,
        "context_h": metric.context_h,
        "item_start_time": iso_timestamp(&metric.start_time),
        "item_path": metric.item_path,
        "item": metric.item,
        "item_variant": metric.variant,
        "item_fs_loc": metric.path,
        "kind": metric.kind.as_str(),
        "component": metric.component,
        "total_time": metric.wall_time,
        "user_time": metric.user_time,
        "kernel_time": metric.kernel_time,
        "cpu_usage": metric.cpu_usage,
        "mem_usage": metric.memory_usage,
    })
}

// --- Dataset queries, mirroring the store's semantics ---

fn filter_sessions<'a>(data: &'a Data, params: &HashMap<&str, &str>) -> Vec<&'a Session> {
    let names: Vec<&str> = params
        .get("with_tags")
        .map(|v| v.split(',').filter(|n| !n.is_empty()).collect())
        .unwrap_or_default();
    if names.is_empty() {
        return data.sessions.iter().collect();
    }
    let values: Vec<&str> = params
        .get("restrict_flags")
        .map(|v| v.split(',').collect())
        .unwrap_or_default();
    let match_any = params.get("method").copied() == Some("match_any");

    data.sessions
        .iter()
        .filter(|session| {
            let mut checks = names.iter().enumerate().map(|(i, name)| {
                let value = values.get(i).copied().unwrap_or("");
                if value.is_empty() {
                    session.tags.get(*name).is_some_and(|v| !v.is_empty())
                } else {
                    session.tags.get(*name).is_some_and(|v| v == value)
                }
            });
            if match_any {
                checks.any(|ok| ok)
            } else {
                checks.all(|ok| ok)
            }
        })
        .collect()
}

fn scm_metrics(data: &Data, scm_ref: &str) -> Metrics {
    let ids: BTreeSet<&str> = data
        .sessions
        .iter()
        .filter(|s| s.scm_ref == scm_ref)
        .map(|s| s.h.as_str())
        .collect();
    data.metrics.filter_with(|m| ids.contains(m.session_h.as_str()))
}

fn components(data: &Data) -> Vec<String> {
    let mut names: Vec<String> = data.metrics.iter().map(|m| m.component.clone()).collect();
    names.sort();
    names.dedup();
    names
}

fn component_sessions<'a>(data: &'a Data, component: &str) -> Vec<&'a Session> {
    let ids: BTreeSet<&str> = data
        .metrics
        .iter()
        .filter(|m| m.component == component)
        .map(|m| m.session_h.as_str())
        .collect();
    ids.iter().filter_map(|h| data.sessions.get(h)).collect()
}

fn pipelines_of<'a>(sessions: impl Iterator<Item = &'a Session>) -> Vec<String> {
    let mut names: Vec<String> = sessions
        .filter_map(|s| s.tags.get("pipeline_branch"))
        .filter(|v| !v.is_empty())
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    names
}

fn builds_of<'a>(sessions: impl Iterator<Item = &'a Session>, pipeline: &str) -> Vec<String> {
    let mut builds: Vec<String> = sessions
        .filter(|s| s.tags.get("pipeline_branch").is_some_and(|v| v == pipeline))
        .filter_map(|s| s.tags.get("pipeline_build_no"))
        .filter(|v| !v.is_empty())
        .cloned()
        .collect();
    builds.sort();
    builds.dedup();
    builds
}

fn build_sessions<'a>(data: &'a Data, pipeline: &str, build: &str) -> Vec<&'a Session> {
    data.sessions
        .iter()
        .filter(|s| {
            s.tags.get("pipeline_branch").is_some_and(|v| v == pipeline)
                && s.tags.get("pipeline_build_no").is_some_and(|v| v == build)
        })
        .collect()
}

fn pipeline_session_ids<'a>(
    data: &'a Data,
    pipeline: &str,
    build: Option<&str>,
) -> BTreeSet<&'a str> {
    data.sessions
        .iter()
        .filter(|s| s.tags.get("pipeline_branch").is_some_and(|v| v == pipeline))
        .filter(|s| match build {
            Some(build) => s.tags.get("pipeline_build_no").is_some_and(|v| v == build),
            None => true,
        })
        .map(|s| s.h.as_str())
        .collect()
}

fn resource_from(token: &str) -> Option<Resource> {
    match token {
        "total_time" => Some(Resource::TotalTime),
        "user_time" => Some(Resource::UserTime),
        "kernel_time" => Some(Resource::KernelTime),
        "cpu" => Some(Resource::Cpu),
        "memory" => Some(Resource::Memory),
        _ => None,
    }
}

fn resource_value(metric: &Metric, resource: Resource) -> f64 {
    match resource {
        Resource::TotalTime => metric.wall_time,
        Resource::UserTime => metric.user_time,
        Resource::KernelTime => metric.kernel_time,
        Resource::Cpu => metric.cpu_usage,
        Resource::Memory => metric.memory_usage,
    }
}
