//! Every facade operation answered by the embedded store and by the
//! HTTP server over the same dataset must agree.

use testmetry_sdk::{ConnectOptions, Monitor, Ranking, Resource, Scope, TagFilter};
use testmetry_testing::dataset::{
    CONTEXT_LAPTOP, SCM_NIGHTLY, SESSION_NIGHTLY_512, SESSION_NIGHTLY_513,
};
use testmetry_testing::{FakeServer, StoreFixture};
use testmetry_types::{MatchMode, Metrics};

fn monitors() -> (StoreFixture, FakeServer, Monitor, Monitor) {
    let fixture = StoreFixture::seeded();
    let server = FakeServer::seeded();
    let local = Monitor::connect(fixture.path().to_str().expect("utf8 path")).expect("local");
    let remote = Monitor::connect(server.url()).expect("remote");
    (fixture, server, local, remote)
}

/// Metrics listings are sets as far as the contract cares; only the
/// ranked queries promise an order.
fn assert_same_metrics(label: &str, left: &Metrics, right: &Metrics) {
    assert_eq!(left.len(), right.len(), "{label}: sizes differ");
    for metric in left.iter() {
        assert!(
            right.iter().any(|m| m == metric),
            "{label}: {} missing on one side",
            metric.variant
        );
    }
}

#[test]
fn counts_agree() {
    let (_fixture, _server, local, remote) = monitors();

    assert_eq!(local.count_sessions(), remote.count_sessions());
    assert_eq!(local.count_contexts(), remote.count_contexts());
    assert_eq!(local.count_components(), remote.count_components());
    assert_eq!(
        local.count_metrics(None, None, None),
        remote.count_metrics(None, None, None)
    );
    assert_eq!(
        local.count_metrics(Some(SESSION_NIGHTLY_512), None, None),
        remote.count_metrics(Some(SESSION_NIGHTLY_512), None, None)
    );
    assert_eq!(
        local.count_metrics(None, Some(CONTEXT_LAPTOP), None),
        remote.count_metrics(None, Some(CONTEXT_LAPTOP), None)
    );
    assert_eq!(
        local.count_metrics(None, None, Some(SCM_NIGHTLY)),
        remote.count_metrics(None, None, Some(SCM_NIGHTLY))
    );
    assert_eq!(
        local.count_metrics(Some(SESSION_NIGHTLY_512), Some(CONTEXT_LAPTOP), Some(SCM_NIGHTLY)),
        remote.count_metrics(Some(SESSION_NIGHTLY_512), Some(CONTEXT_LAPTOP), Some(SCM_NIGHTLY))
    );
}

#[test]
fn session_queries_agree() {
    let (_fixture, _server, local, remote) = monitors();

    assert_eq!(
        local.list_sessions(&TagFilter::new()),
        remote.list_sessions(&TagFilter::new())
    );

    let value = TagFilter::new().tag_value("pipeline_branch", "nightly");
    assert_eq!(local.list_sessions(&value), remote.list_sessions(&value));

    let presence = TagFilter::new().tag("python");
    assert_eq!(local.list_sessions(&presence), remote.list_sessions(&presence));

    let any = TagFilter::new()
        .tag_value("pipeline_branch", "release")
        .tag_value("python", "3.11")
        .mode(MatchMode::Any);
    assert_eq!(local.list_sessions(&any), remote.list_sessions(&any));

    assert_eq!(
        local.get_session(SESSION_NIGHTLY_512),
        remote.get_session(SESSION_NIGHTLY_512)
    );
    assert_eq!(local.get_session("ses-9999"), remote.get_session("ses-9999"));

    assert_same_metrics(
        "session metrics",
        &local.list_session_metrics(SESSION_NIGHTLY_512),
        &remote.list_session_metrics(SESSION_NIGHTLY_512),
    );

    assert_eq!(
        local.list_build_sessions("nightly", "513"),
        remote.list_build_sessions("nightly", "513")
    );
    assert_eq!(
        local.list_build_sessions("nightly", "999"),
        remote.list_build_sessions("nightly", "999")
    );
}

#[test]
fn context_queries_agree() {
    let (_fixture, _server, local, remote) = monitors();

    assert_eq!(local.list_contexts(), remote.list_contexts());
    assert_eq!(
        local.get_context(CONTEXT_LAPTOP),
        remote.get_context(CONTEXT_LAPTOP)
    );
    assert_eq!(local.get_context("ctx-9999"), remote.get_context("ctx-9999"));
    assert_same_metrics(
        "context metrics",
        &local.list_context_metrics(CONTEXT_LAPTOP),
        &remote.list_context_metrics(CONTEXT_LAPTOP),
    );
}

#[test]
fn metric_queries_agree() {
    let (_fixture, _server, local, remote) = monitors();

    assert_same_metrics("all metrics", &local.list_metrics(), &remote.list_metrics());
    assert_same_metrics(
        "scm metrics",
        &local.list_metrics_by_scm_id(SCM_NIGHTLY),
        &remote.list_metrics_by_scm_id(SCM_NIGHTLY),
    );

    for scope in [Scope::Function, Scope::Module, Scope::Package] {
        assert_same_metrics(
            "scope metrics",
            &local.list_metrics_by_scope(scope),
            &remote.list_metrics_by_scope(scope),
        );
    }

    assert_same_metrics(
        "item prefix",
        &local.list_metrics_from_pattern(Some("test_tokenize"), None),
        &remote.list_metrics_from_pattern(Some("test_tokenize"), None),
    );
    assert_same_metrics(
        "variant prefix",
        &local.list_metrics_from_pattern(None, Some("test_tokenize_unicode[")),
        &remote.list_metrics_from_pattern(None, Some("test_tokenize_unicode[")),
    );
    assert!(local.list_metrics_from_pattern(None, None).is_empty());
    assert!(remote.list_metrics_from_pattern(None, None).is_empty());
    assert!(local.list_metrics_from_pattern(Some("a"), Some("b")).is_empty());
    assert!(remote.list_metrics_from_pattern(Some("a"), Some("b")).is_empty());

    assert_same_metrics(
        "exact item",
        &local.list_item_metrics("test_eval_constant"),
        &remote.list_item_metrics("test_eval_constant"),
    );
    assert_same_metrics(
        "exact variant",
        &local.list_metrics_of_variant("test_eval_constant[big]", None),
        &remote.list_metrics_of_variant("test_eval_constant[big]", None),
    );
    assert_same_metrics(
        "variant in component",
        &local.list_metrics_of_variant("test_eval_constant", Some("engine")),
        &remote.list_metrics_of_variant("test_eval_constant", Some("engine")),
    );
}

#[test]
fn component_and_pipeline_queries_agree() {
    let (_fixture, _server, local, remote) = monitors();

    assert_eq!(local.list_components(), remote.list_components());
    assert_same_metrics(
        "unassigned component",
        &local.list_component_metrics(None),
        &remote.list_component_metrics(None),
    );
    assert_same_metrics(
        "parser component",
        &local.list_component_metrics(Some("parser")),
        &remote.list_component_metrics(Some("parser")),
    );
    assert_eq!(
        local.list_component_pipelines("parser"),
        remote.list_component_pipelines("parser")
    );
    assert_eq!(
        local.list_component_pipelines(""),
        remote.list_component_pipelines("")
    );
    assert_eq!(
        local.list_component_pipeline_builds("parser", "nightly"),
        remote.list_component_pipeline_builds("parser", "nightly")
    );
    assert_eq!(local.list_pipelines(), remote.list_pipelines());
    assert_eq!(
        local.list_pipeline_builds("nightly"),
        remote.list_pipeline_builds("nightly")
    );
    assert_eq!(
        local.list_pipeline_builds("hotfix"),
        remote.list_pipeline_builds("hotfix")
    );
}

#[test]
fn rankings_agree_in_order() {
    let (_fixture, _server, local, remote) = monitors();

    // Ranked listings promise an order, so compare exactly
    assert_eq!(
        local.list_metrics_resources(Resource::TotalTime, Ranking::Top, 3),
        remote.list_metrics_resources(Resource::TotalTime, Ranking::Top, 3)
    );
    assert_eq!(
        local.list_metrics_resources(Resource::Memory, Ranking::Lowest, 2),
        remote.list_metrics_resources(Resource::Memory, Ranking::Lowest, 2)
    );
    assert_eq!(
        local.list_metrics_resources_from_component(Resource::TotalTime, "parser", Ranking::Top, 2),
        remote.list_metrics_resources_from_component(Resource::TotalTime, "parser", Ranking::Top, 2)
    );
    assert_eq!(
        local.list_metrics_resources_from_pipeline(Resource::Cpu, "nightly", Ranking::Top, 4),
        remote.list_metrics_resources_from_pipeline(Resource::Cpu, "nightly", Ranking::Top, 4)
    );
    assert_eq!(
        local.list_metrics_resources_from_build(Resource::UserTime, "nightly", "513", Ranking::Top, 2),
        remote.list_metrics_resources_from_build(Resource::UserTime, "nightly", "513", Ranking::Top, 2)
    );
    assert_eq!(
        local.list_metrics_resources(Resource::KernelTime, Ranking::Top, 9999).len(),
        remote.list_metrics_resources(Resource::KernelTime, Ranking::Top, 9999).len()
    );
}

#[test]
fn cross_collection_traversals_agree() {
    let (_fixture, _server, local, remote) = monitors();

    let sessions = local.list_sessions(&TagFilter::new().tag_value("pipeline_branch", "nightly"));
    let contexts = local.list_contexts();

    assert_same_metrics(
        "metrics from sessions",
        &local.list_metrics_from(Some(&sessions), None),
        &remote.list_metrics_from(Some(&sessions), None),
    );
    assert_same_metrics(
        "metrics from both",
        &local.list_metrics_from(Some(&sessions), Some(&contexts)),
        &remote.list_metrics_from(Some(&sessions), Some(&contexts)),
    );
    assert!(local.list_metrics_from(None, None).is_empty());
    assert!(remote.list_metrics_from(None, None).is_empty());

    let eval = local.list_item_metrics("test_eval_constant");
    assert_eq!(local.list_sessions_from(&eval), remote.list_sessions_from(&eval));
    assert_eq!(
        local.list_contexts_from(&local.list_metrics()),
        remote.list_contexts_from(&remote.list_metrics())
    );
}

#[test]
fn address_shape_picks_the_backend() {
    let fixture = StoreFixture::seeded();
    let local = Monitor::connect(fixture.path().to_str().expect("utf8 path")).expect("local");
    assert_eq!(local.count_sessions(), 4);

    let server = FakeServer::seeded();
    let remote = Monitor::connect(server.url()).expect("remote");
    assert_eq!(remote.count_sessions(), 4);
    // The count really did go over the wire
    assert!(server.requests().iter().any(|r| r.contains("/sessions/count")));
}

#[test]
fn read_only_connections_require_an_existing_file() {
    let fixture = StoreFixture::seeded();
    let missing = fixture.path().with_file_name("absent.db");

    let options = ConnectOptions {
        read_only: true,
        ..ConnectOptions::default()
    };
    assert!(Monitor::connect_with(missing.to_str().expect("utf8 path"), &options).is_err());

    // Read-write opens create the file; with no tables inside, it then
    // answers with sentinels
    let created = Monitor::connect(missing.to_str().expect("utf8 path")).expect("create");
    assert_eq!(created.count_sessions(), -1);

    let seeded = Monitor::connect_with(fixture.path().to_str().expect("utf8 path"), &options)
        .expect("read only open");
    assert_eq!(seeded.count_sessions(), 4);
}
