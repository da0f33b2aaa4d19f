use rusqlite::{Connection, Params, params};
use testmetry_types::{Metrics, Ranking, Resource};

use crate::Result;
use crate::hydrate::{METRIC_COLUMNS, METRIC_COLUMNS_M, metric_from_row};
use crate::queries::{BUILD_TAG, PIPELINE_TAG};

fn column(resource: Resource) -> &'static str {
    match resource {
        Resource::TotalTime => "TOTAL_TIME",
        Resource::UserTime => "USER_TIME",
        Resource::KernelTime => "KERNEL_TIME",
        Resource::Cpu => "CPU_USAGE",
        Resource::Memory => "MEM_USAGE",
    }
}

fn direction(ranking: Ranking) -> &'static str {
    match ranking {
        Ranking::Top => "DESC",
        Ranking::Lowest => "ASC",
    }
}

fn fetch(conn: &Connection, query: &str, params: impl Params) -> Result<Metrics> {
    let mut stmt = conn.prepare(query)?;
    let metrics = stmt
        .query_map(params, metric_from_row)?
        .collect::<std::result::Result<Metrics, rusqlite::Error>>()?;
    Ok(metrics)
}

/// The `limit` heaviest (or lightest) metrics by one resource. The caller
/// is expected to have clamped `limit` already.
pub fn rank(conn: &Connection, resource: Resource, ranking: Ranking, limit: usize) -> Result<Metrics> {
    let query = format!(
        "SELECT {METRIC_COLUMNS} FROM TEST_METRICS ORDER BY {} {} LIMIT ?1",
        column(resource),
        direction(ranking),
    );

    fetch(conn, &query, [limit as i64])
}

pub fn rank_by_component(
    conn: &Connection,
    resource: Resource,
    component: &str,
    ranking: Ranking,
    limit: usize,
) -> Result<Metrics> {
    let query = format!(
        "SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE COMPONENT = ?1 \
         ORDER BY {} {} LIMIT ?2",
        column(resource),
        direction(ranking),
    );

    fetch(conn, &query, params![component, limit as i64])
}

pub fn rank_by_pipeline(
    conn: &Connection,
    resource: Resource,
    pipeline: &str,
    ranking: Ranking,
    limit: usize,
) -> Result<Metrics> {
    let query = format!(
        "SELECT {METRIC_COLUMNS_M} FROM TEST_METRICS M \
         JOIN TEST_SESSIONS S ON M.SESSION_H = S.SESSION_H \
         WHERE CAST(json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) = ?1 \
         ORDER BY M.{} {} LIMIT ?2",
        column(resource),
        direction(ranking),
    );

    fetch(conn, &query, params![pipeline, limit as i64])
}

pub fn rank_by_build(
    conn: &Connection,
    resource: Resource,
    pipeline: &str,
    build: &str,
    ranking: Ranking,
    limit: usize,
) -> Result<Metrics> {
    let query = format!(
        "SELECT {METRIC_COLUMNS_M} FROM TEST_METRICS M \
         JOIN TEST_SESSIONS S ON M.SESSION_H = S.SESSION_H \
         WHERE CAST(json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) = ?1 \
         AND CAST(json_extract(S.RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) = ?2 \
         ORDER BY M.{} {} LIMIT ?3",
        column(resource),
        direction(ranking),
    );

    fetch(conn, &query, params![pipeline, build, limit as i64])
}
