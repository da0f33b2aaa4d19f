//! The canned telemetry dataset shared by every integration suite.
//!
//! The same entities are seeded into store fixtures and served by the
//! fake server, so dialect parity tests can compare both backends over
//! identical data. Everything here is a literal: content hashes stay
//! stable across runs and across dialects.

use testmetry_types::{
    Context, Contexts, Metric, Metrics, Scope, Session, Sessions, Tags, parse_timestamp,
};

pub const CONTEXT_CI: &str = "ctx-4f9a";
pub const CONTEXT_LAPTOP: &str = "ctx-77b2";

pub const SESSION_NIGHTLY_512: &str = "ses-0001";
pub const SESSION_NIGHTLY_513: &str = "ses-0002";
pub const SESSION_DEV: &str = "ses-0003";
pub const SESSION_RELEASE_88: &str = "ses-0004";

/// SCM reference shared by both nightly sessions.
pub const SCM_NIGHTLY: &str = "a3f2c1d";
pub const SCM_DEV: &str = "b9e8d7f";
pub const SCM_RELEASE: &str = "c5a4b3e";

pub fn contexts() -> Contexts {
    [
        Context {
            h: CONTEXT_CI.to_string(),
            cpu_count: 8,
            cpu_freq: 3600,
            cpu_type: "x86_64".to_string(),
            cpu_vendor: "GenuineIntel".to_string(),
            ram_total: 32768,
            machine_node: "ci-runner-01.example.org".to_string(),
            machine_type: "x86_64".to_string(),
            machine_arch: "64bit".to_string(),
            sys_info: "Linux-5.15.0-generic".to_string(),
            py_info: "3.11.4 (main)".to_string(),
        },
        Context {
            h: CONTEXT_LAPTOP.to_string(),
            cpu_count: 4,
            cpu_freq: 2400,
            cpu_type: "arm64".to_string(),
            cpu_vendor: "Apple".to_string(),
            ram_total: 16384,
            machine_node: "dev-laptop.local".to_string(),
            machine_type: "arm64".to_string(),
            machine_arch: "64bit".to_string(),
            sys_info: "Darwin-23.1.0".to_string(),
            py_info: "3.12.1 (main)".to_string(),
        },
    ]
    .into_iter()
    .collect()
}

pub fn sessions() -> Sessions {
    [
        session(
            SESSION_NIGHTLY_512,
            SCM_NIGHTLY,
            "2025-06-01T09:00:00",
            &[
                ("pipeline_branch", "nightly"),
                ("pipeline_build_no", "512"),
                ("python", "3.11"),
            ],
        ),
        session(
            SESSION_NIGHTLY_513,
            SCM_NIGHTLY,
            "2025-06-01T21:30:00",
            &[("pipeline_branch", "nightly"), ("pipeline_build_no", "513")],
        ),
        session(SESSION_DEV, SCM_DEV, "2025-06-02T10:15:00", &[]),
        session(
            SESSION_RELEASE_88,
            SCM_RELEASE,
            "2025-06-03T08:45:00",
            &[
                ("pipeline_branch", "release"),
                ("pipeline_build_no", "88"),
                ("python", "3.12"),
            ],
        ),
    ]
    .into_iter()
    .collect()
}

/// Twelve metrics over two contexts, four sessions, three components
/// (one of them the unassigned empty one), all three scopes, and two
/// parametrized variant families. Resource values are all distinct so
/// ranking order is unambiguous.
pub fn metrics() -> Metrics {
    vec![
        metric(
            SESSION_NIGHTLY_512, CONTEXT_CI, "2025-06-01T09:00:05",
            "tests.parser.test_lexer", "test_tokenize_simple", "test_tokenize_simple",
            "tests/parser/test_lexer.py", Scope::Function, "parser",
            0.82, 0.61, 0.05, 80.5, 48.2,
        ),
        metric(
            SESSION_NIGHTLY_512, CONTEXT_CI, "2025-06-01T09:00:06.500000",
            "tests.parser.test_lexer", "test_tokenize_unicode", "test_tokenize_unicode[utf8]",
            "tests/parser/test_lexer.py", Scope::Function, "parser",
            1.34, 1.02, 0.11, 84.3, 65.7,
        ),
        metric(
            SESSION_NIGHTLY_512, CONTEXT_CI, "2025-06-01T09:00:08",
            "tests.parser.test_lexer", "test_tokenize_unicode", "test_tokenize_unicode[latin1]",
            "tests/parser/test_lexer.py", Scope::Function, "parser",
            1.27, 0.95, 0.09, 82.1, 64.0,
        ),
        metric(
            SESSION_NIGHTLY_512, CONTEXT_CI, "2025-06-01T09:00:12",
            "tests.parser", "test_lexer", "test_lexer",
            "tests/parser/test_lexer.py", Scope::Module, "parser",
            3.41, 2.58, 0.25, 83.0, 110.5,
        ),
        metric(
            SESSION_NIGHTLY_512, CONTEXT_CI, "2025-06-01T09:00:15",
            "tests.engine.test_eval", "test_eval_constant", "test_eval_constant",
            "tests/engine/test_eval.py", Scope::Function, "engine",
            2.05, 1.77, 0.08, 90.2, 256.0,
        ),
        metric(
            SESSION_NIGHTLY_513, CONTEXT_CI, "2025-06-01T21:30:04",
            "tests.parser.test_lexer", "test_tokenize_simple", "test_tokenize_simple",
            "tests/parser/test_lexer.py", Scope::Function, "parser",
            0.79, 0.58, 0.06, 81.0, 47.9,
        ),
        metric(
            SESSION_NIGHTLY_513, CONTEXT_CI, "2025-06-01T21:30:07",
            "tests.engine.test_eval", "test_eval_constant", "test_eval_constant",
            "tests/engine/test_eval.py", Scope::Function, "engine",
            1.95, 1.70, 0.07, 89.8, 512.0,
        ),
        metric(
            SESSION_NIGHTLY_513, CONTEXT_CI, "2025-06-01T21:30:20",
            "tests", "parser", "parser",
            "tests/parser/__init__.py", Scope::Package, "parser",
            6.88, 5.16, 0.52, 82.5, 130.2,
        ),
        metric(
            SESSION_DEV, CONTEXT_LAPTOP, "2025-06-02T10:15:02",
            "tests.test_cli", "test_cli_help", "test_cli_help",
            "tests/test_cli.py", Scope::Function, "",
            0.12, 0.08, 0.01, 75.0, 21.0,
        ),
        metric(
            SESSION_DEV, CONTEXT_LAPTOP, "2025-06-02T10:15:03",
            "tests.test_cli", "test_config_roundtrip", "test_config_roundtrip",
            "tests/test_cli.py", Scope::Function, "",
            0.33, 0.24, 0.03, 77.2, 30.1,
        ),
        metric(
            SESSION_RELEASE_88, CONTEXT_CI, "2025-06-03T08:45:10",
            "tests.parser.test_lexer", "test_tokenize_simple", "test_tokenize_simple",
            "tests/parser/test_lexer.py", Scope::Function, "parser",
            0.85, 0.63, 0.05, 80.9, 49.0,
        ),
        metric(
            SESSION_RELEASE_88, CONTEXT_LAPTOP, "2025-06-03T08:45:11.250000",
            "tests.engine.test_eval", "test_eval_constant", "test_eval_constant[big]",
            "tests/engine/test_eval.py", Scope::Function, "engine",
            2.31, 2.02, 0.10, 91.5, 384.6,
        ),
    ]
    .into()
}

fn session(h: &str, scm_ref: &str, run_date: &str, tags: &[(&str, &str)]) -> Session {
    Session {
        h: h.to_string(),
        scm_ref: scm_ref.to_string(),
        run_date: parse_timestamp(run_date),
        tags: tags
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<Tags>(),
    }
}

#[allow(clippy::too_many_arguments)]
fn metric(
    session_h: &str,
    context_h: &str,
    start: &str,
    item_path: &str,
    item: &str,
    variant: &str,
    path: &str,
    kind: Scope,
    component: &str,
    wall: f64,
    user: f64,
    kernel: f64,
    cpu: f64,
    mem: f64,
) -> Metric {
    Metric {
        session_h: session_h.to_string(),
        context_h: context_h.to_string(),
        start_time: parse_timestamp(start),
        item_path: item_path.to_string(),
        item: item.to_string(),
        variant: variant.to_string(),
        path: path.to_string(),
        kind,
        component: component.to_string(),
        wall_time: wall,
        user_time: user,
        kernel_time: kernel,
        cpu_usage: cpu,
        memory_usage: mem,
    }
}
