//! Wire representations served by telemetry servers and their mapping
//! onto the domain types. Every field is defaulted so a sparse payload
//! hydrates instead of failing the whole page.

use serde::Deserialize;
use serde_json::Value;
use testmetry_types::{
    Context, Contexts, Metric, Metrics, Scope, Session, Sessions, parse_timestamp, tags_from_value,
};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub(crate) struct SessionDto {
    #[serde(default)]
    h: String,
    #[serde(default)]
    run_date: String,
    #[serde(default)]
    scm_ref: String,
    #[serde(default)]
    tags: Value,
}

impl SessionDto {
    pub(crate) fn into_session(self) -> Session {
        Session {
            h: self.h,
            scm_ref: self.scm_ref,
            run_date: parse_timestamp(&self.run_date),
            tags: tags_from_value(&self.tags),
        }
    }
}

fn one_core() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContextDto {
    #[serde(default)]
    h: String,
    // A machine always has at least one core
    #[serde(default = "one_core")]
    cpu_count: i64,
    #[serde(default)]
    cpu_frequency: i64,
    #[serde(default)]
    cpu_type: String,
    #[serde(default)]
    cpu_vendor: String,
    #[serde(default)]
    ram_total: i64,
    #[serde(default)]
    machine_node: String,
    #[serde(default)]
    machine_type: String,
    #[serde(default)]
    machine_arch: String,
    #[serde(default)]
    system_info: String,
    #[serde(default)]
    python_info: String,
}

impl ContextDto {
    pub(crate) fn into_context(self) -> Context {
        Context {
            h: self.h,
            cpu_count: self.cpu_count,
            cpu_freq: self.cpu_frequency,
            cpu_type: self.cpu_type,
            cpu_vendor: self.cpu_vendor,
            ram_total: self.ram_total,
            machine_node: self.machine_node,
            machine_type: self.machine_type,
            machine_arch: self.machine_arch,
            sys_info: self.system_info,
            py_info: self.python_info,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricDto {
    #[serde(default)]
    session_h: String,
    #[serde(default)]
    context_h: String,
    #[serde(default)]
    item_start_time: String,
    #[serde(default)]
    item_path: String,
    #[serde(default)]
    item: String,
    #[serde(default)]
    item_variant: String,
    #[serde(default)]
    item_fs_loc: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    component: String,
    #[serde(default)]
    total_time: f64,
    #[serde(default)]
    user_time: f64,
    #[serde(default)]
    kernel_time: f64,
    #[serde(default)]
    cpu_usage: f64,
    #[serde(default)]
    mem_usage: f64,
}

impl MetricDto {
    pub(crate) fn into_metric(self) -> Metric {
        Metric {
            context_h: self.context_h,
            session_h: self.session_h,
            start_time: parse_timestamp(&self.item_start_time),
            item_path: self.item_path,
            item: self.item,
            variant: self.item_variant,
            path: self.item_fs_loc,
            kind: Scope::parse(&self.kind),
            component: self.component,
            wall_time: self.total_time,
            user_time: self.user_time,
            kernel_time: self.kernel_time,
            cpu_usage: self.cpu_usage,
            memory_usage: self.mem_usage,
        }
    }
}

// --- Page payload decoding ---

pub(crate) fn decode_metrics(values: Vec<Value>) -> Result<Metrics> {
    values
        .into_iter()
        .map(|value| serde_json::from_value::<MetricDto>(value).map(MetricDto::into_metric))
        .collect::<std::result::Result<Metrics, serde_json::Error>>()
        .map_err(Error::from)
}

pub(crate) fn decode_sessions(values: Vec<Value>) -> Result<Sessions> {
    values
        .into_iter()
        .map(|value| serde_json::from_value::<SessionDto>(value).map(SessionDto::into_session))
        .collect::<std::result::Result<Sessions, serde_json::Error>>()
        .map_err(Error::from)
}

pub(crate) fn decode_contexts(values: Vec<Value>) -> Result<Contexts> {
    values
        .into_iter()
        .map(|value| serde_json::from_value::<ContextDto>(value).map(ContextDto::into_context))
        .collect::<std::result::Result<Contexts, serde_json::Error>>()
        .map_err(Error::from)
}

/// Listings of plain names (components, pipelines, builds, session ids).
/// Non-string entries are skipped.
pub(crate) fn decode_strings(values: Vec<Value>) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}
