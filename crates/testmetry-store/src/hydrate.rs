//! Row-to-entity hydration.
//!
//! Every SELECT in this crate names its columns explicitly, in the
//! orders fixed here. Malformed cell content (bad timestamps, invalid
//! tag JSON, unknown scopes, NULLs) hydrates to entity defaults instead
//! of failing the whole query.

use rusqlite::Row;
use testmetry_types::{Context, Metric, Scope, Session, parse_timestamp, tags_from_json};

pub(crate) const SESSION_COLUMNS: &str = "SESSION_H, RUN_DATE, SCM_ID, RUN_DESCRIPTION";

pub(crate) const CONTEXT_COLUMNS: &str = "ENV_H, CPU_COUNT, CPU_FREQUENCY_MHZ, CPU_TYPE, \
     CPU_VENDOR, RAM_TOTAL_MB, MACHINE_NODE, MACHINE_TYPE, MACHINE_ARCH, SYSTEM_INFO, PYTHON_INFO";

pub(crate) const METRIC_COLUMNS: &str = "SESSION_H, ENV_H, ITEM_START_TIME, ITEM_PATH, ITEM, \
     ITEM_VARIANT, ITEM_FS_LOC, KIND, COMPONENT, TOTAL_TIME, USER_TIME, KERNEL_TIME, CPU_USAGE, \
     MEM_USAGE";

/// [`METRIC_COLUMNS`] qualified with the `M` alias, for joined queries.
pub(crate) const METRIC_COLUMNS_M: &str = "M.SESSION_H, M.ENV_H, M.ITEM_START_TIME, M.ITEM_PATH, \
     M.ITEM, M.ITEM_VARIANT, M.ITEM_FS_LOC, M.KIND, M.COMPONENT, M.TOTAL_TIME, M.USER_TIME, \
     M.KERNEL_TIME, M.CPU_USAGE, M.MEM_USAGE";

pub(crate) fn session_from_row(row: &Row) -> rusqlite::Result<Session> {
    let run_date: Option<String> = row.get(1)?;
    let description: Option<String> = row.get(3)?;
    Ok(Session {
        h: row.get(0)?,
        run_date: parse_timestamp(run_date.as_deref().unwrap_or_default()),
        scm_ref: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tags: tags_from_json(description.as_deref().unwrap_or_default()),
    })
}

pub(crate) fn metric_from_row(row: &Row) -> rusqlite::Result<Metric> {
    let start: Option<String> = row.get(2)?;
    let kind: Option<String> = row.get(7)?;
    Ok(Metric {
        session_h: row.get(0)?,
        context_h: row.get(1)?,
        start_time: parse_timestamp(start.as_deref().unwrap_or_default()),
        item_path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        item: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        variant: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        path: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        kind: Scope::parse(kind.as_deref().unwrap_or_default()),
        component: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        wall_time: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
        user_time: row.get::<_, Option<f64>>(10)?.unwrap_or_default(),
        kernel_time: row.get::<_, Option<f64>>(11)?.unwrap_or_default(),
        cpu_usage: row.get::<_, Option<f64>>(12)?.unwrap_or_default(),
        memory_usage: row.get::<_, Option<f64>>(13)?.unwrap_or_default(),
    })
}

pub(crate) fn context_from_row(row: &Row) -> rusqlite::Result<Context> {
    Ok(Context {
        h: row.get(0)?,
        cpu_count: row.get::<_, Option<i64>>(1)?.unwrap_or(1),
        cpu_freq: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        cpu_type: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        cpu_vendor: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        ram_total: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
        machine_node: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        machine_type: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        machine_arch: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        sys_info: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        py_info: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
    })
}
