use testmetry_core::{COUNT_UNAVAILABLE, Dialect, TagFilter};
use testmetry_store::Local;
use testmetry_testing::StoreFixture;
use testmetry_testing::dataset::{
    self, CONTEXT_LAPTOP, SCM_NIGHTLY, SESSION_DEV, SESSION_NIGHTLY_512, SESSION_NIGHTLY_513,
    SESSION_RELEASE_88,
};
use testmetry_types::{MatchMode, Ranking, Resource, Scope};

fn seeded() -> (StoreFixture, Local) {
    let fixture = StoreFixture::seeded();
    let local = Local::open_read_only(fixture.path()).expect("open seeded db");
    (fixture, local)
}

#[test]
fn listings_hydrate_the_whole_dataset() {
    let (_fixture, local) = seeded();

    // Row order is not part of the contract, membership is
    let metrics = local.metrics();
    assert_eq!(metrics.len(), 12);
    for expected in dataset::metrics().iter() {
        assert!(metrics.iter().any(|m| m == expected), "missing {}", expected.variant);
    }

    assert_eq!(local.sessions(&TagFilter::new()), dataset::sessions());
    assert_eq!(local.contexts(), dataset::contexts());
}

#[test]
fn counts_report_real_sizes() {
    let (_fixture, local) = seeded();

    assert_eq!(local.count_sessions(), 4);
    assert_eq!(local.count_contexts(), 2);
    assert_eq!(local.count_components(), 2);
    assert_eq!(local.count_metrics(None, None, None), 12);
    assert_eq!(local.count_metrics(Some(SESSION_NIGHTLY_512), None, None), 5);
    assert_eq!(local.count_metrics(None, Some(CONTEXT_LAPTOP), None), 3);
    assert_eq!(local.count_metrics(None, None, Some(SCM_NIGHTLY)), 8);
    // The first narrowing argument wins
    assert_eq!(
        local.count_metrics(Some(SESSION_NIGHTLY_512), Some(CONTEXT_LAPTOP), Some(SCM_NIGHTLY)),
        5
    );
}

#[test]
fn point_lookups_resolve_and_miss() {
    let (_fixture, local) = seeded();

    let session = local.session_details(SESSION_DEV).expect("known session");
    assert_eq!(session.scm_ref, "b9e8d7f");
    assert!(session.tags.is_empty());
    assert!(local.session_details("ses-9999").is_none());

    let context = local.context_details(CONTEXT_LAPTOP).expect("known context");
    assert_eq!(context.cpu_count, 4);
    assert_eq!(context.py_info, "3.12.1 (main)");
    assert!(local.context_details("ctx-9999").is_none());
}

#[test]
fn tag_filters_compile_to_json_lookups() {
    let (_fixture, local) = seeded();

    let nightly = local.sessions(&TagFilter::new().tag_value("pipeline_branch", "nightly"));
    assert_eq!(nightly.len(), 2);
    assert!(nightly.contains(SESSION_NIGHTLY_512));
    assert!(nightly.contains(SESSION_NIGHTLY_513));

    // Presence only, any value
    let piped = local.sessions(&TagFilter::new().tag("pipeline_branch"));
    assert_eq!(piped.len(), 3);

    // All constraints must hold by default
    let narrowed = local.sessions(
        &TagFilter::new()
            .tag_value("pipeline_branch", "nightly")
            .tag_value("python", "3.11"),
    );
    assert_eq!(narrowed.len(), 1);
    assert!(narrowed.contains(SESSION_NIGHTLY_512));

    // Any-mode unions the constraints
    let either = local.sessions(
        &TagFilter::new()
            .tag_value("pipeline_branch", "release")
            .tag_value("python", "3.11")
            .mode(MatchMode::Any),
    );
    assert_eq!(either.len(), 2);
    assert!(either.contains(SESSION_NIGHTLY_512));
    assert!(either.contains(SESSION_RELEASE_88));

    let none = local.sessions(&TagFilter::new().tag_value("pipeline_branch", "hotfix"));
    assert!(none.is_empty());
}

#[test]
fn narrow_listings_match_their_filters() {
    let (_fixture, local) = seeded();

    assert_eq!(local.session_metrics(SESSION_NIGHTLY_512).len(), 5);
    assert_eq!(local.context_metrics(CONTEXT_LAPTOP).len(), 3);
    assert_eq!(local.metrics_with_scm_ref(SCM_NIGHTLY).len(), 8);
    assert_eq!(local.metrics_by_scope(Scope::Function).len(), 10);
    assert_eq!(local.metrics_by_scope(Scope::Module).len(), 1);
    assert_eq!(local.metrics_by_scope(Scope::Package).len(), 1);

    assert_eq!(local.metrics_by_pattern(Some("test_tokenize"), None).len(), 5);
    assert_eq!(
        local.metrics_by_pattern(None, Some("test_tokenize_unicode[")).len(),
        2
    );
    assert!(local.metrics_by_pattern(None, None).is_empty());
    assert!(local.metrics_by_pattern(Some("a"), Some("b")).is_empty());

    assert_eq!(local.item_metrics("test_eval_constant").len(), 3);
    assert_eq!(local.variant_metrics("test_eval_constant[big]", None).len(), 1);
    assert_eq!(local.variant_metrics("test_eval_constant", Some("engine")).len(), 2);
    assert!(
        local
            .variant_metrics("test_eval_constant", Some("parser"))
            .is_empty()
    );
}

#[test]
fn component_and_pipeline_listings_stay_sorted() {
    let (_fixture, local) = seeded();

    // The unassigned component lists, but is not counted
    assert_eq!(local.components(), ["", "engine", "parser"]);
    assert_eq!(local.count_components(), 2);

    assert_eq!(local.component_metrics(None).len(), 2);
    assert_eq!(local.component_metrics(Some("parser")).len(), 7);
    assert_eq!(local.component_pipelines("parser"), ["nightly", "release"]);
    assert!(local.component_pipelines("").is_empty());
    assert_eq!(local.component_pipeline_builds("parser", "nightly"), ["512", "513"]);

    assert_eq!(local.pipelines(), ["nightly", "release"]);
    assert_eq!(local.pipeline_builds("nightly"), ["512", "513"]);
    assert_eq!(local.pipeline_builds("release"), ["88"]);
    assert!(local.pipeline_builds("hotfix").is_empty());
}

#[test]
fn build_sessions_join_on_both_tags() {
    let (_fixture, local) = seeded();

    let sessions = local.sessions_from_build("nightly", "513");
    assert_eq!(sessions.len(), 1);
    assert!(sessions.contains(SESSION_NIGHTLY_513));

    assert!(local.sessions_from_build("nightly", "999").is_empty());
    assert!(local.sessions_from_build("hotfix", "512").is_empty());
}

#[test]
fn rankings_respect_direction() {
    let (_fixture, local) = seeded();

    let top = local.metrics_by_resource(Resource::TotalTime, Ranking::Top, 3);
    let variants: Vec<&str> = top.iter().map(|m| m.variant.as_str()).collect();
    assert_eq!(variants, ["parser", "test_lexer", "test_eval_constant[big]"]);

    let lowest = local.metrics_by_resource(Resource::TotalTime, Ranking::Lowest, 1);
    assert_eq!(lowest.iter().next().map(|m| m.variant.as_str()), Some("test_cli_help"));

    let heaviest = local.metrics_by_resource(Resource::Memory, Ranking::Top, 1);
    let m = heaviest.iter().next().expect("one metric");
    assert_eq!(m.session_h, SESSION_NIGHTLY_513);
    assert_eq!(m.memory_usage, 512.0);

    let parser = local.metrics_by_component_resource(Resource::TotalTime, "parser", Ranking::Top, 2);
    let variants: Vec<&str> = parser.iter().map(|m| m.variant.as_str()).collect();
    assert_eq!(variants, ["parser", "test_lexer"]);

    let nightly = local.metrics_by_pipeline_resource(Resource::TotalTime, "nightly", Ranking::Top, 2);
    assert_eq!(nightly.len(), 2);

    let build = local.metrics_by_build_resource(Resource::TotalTime, "nightly", "513", Ranking::Top, 1);
    assert_eq!(build.iter().next().map(|m| m.variant.as_str()), Some("parser"));

    // Oversized limits are capped, not errors
    let all = local.metrics_by_resource(Resource::Cpu, Ranking::Top, 9999);
    assert_eq!(all.len(), 12);
}

#[test]
fn derived_traversals_walk_point_queries() {
    let (_fixture, local) = seeded();

    let nightly = local.sessions(&TagFilter::new().tag_value("pipeline_branch", "nightly"));
    let metrics = local.metrics_from(Some(&nightly), None);
    assert_eq!(metrics.len(), 8);

    let eval = local.item_metrics("test_eval_constant");
    let sessions = local.sessions_from(&eval);
    assert_eq!(sessions.len(), 3);
    assert!(sessions.contains(SESSION_RELEASE_88));

    let contexts = local.contexts_from(&local.metrics());
    assert_eq!(contexts.len(), 2);
}

#[test]
fn empty_database_reports_zero_not_sentinel() {
    let fixture = StoreFixture::empty();
    let local = Local::open(fixture.path()).expect("open empty db");

    assert_eq!(local.count_sessions(), 0);
    assert_eq!(local.count_contexts(), 0);
    assert_eq!(local.count_components(), 0);
    assert_eq!(local.count_metrics(None, None, None), 0);
    assert!(local.metrics().is_empty());
    assert!(local.sessions(&TagFilter::new()).is_empty());
    assert!(local.session_details(SESSION_DEV).is_none());
}

#[test]
fn database_without_tables_degrades_to_sentinels() {
    let fixture = StoreFixture::without_tables();
    let local = Local::open(fixture.path()).expect("open bare file");

    assert_eq!(local.count_sessions(), COUNT_UNAVAILABLE);
    assert_eq!(local.count_metrics(None, None, None), COUNT_UNAVAILABLE);
    assert!(local.metrics().is_empty());
    assert!(local.sessions(&TagFilter::new()).is_empty());
    assert!(local.session_details(SESSION_DEV).is_none());
    assert!(
        local
            .metrics_by_resource(Resource::TotalTime, Ranking::Top, 10)
            .is_empty()
    );
}
