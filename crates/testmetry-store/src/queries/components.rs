use rusqlite::{Connection, params};
use testmetry_types::Metrics;

use crate::Result;
use crate::hydrate::{METRIC_COLUMNS, metric_from_row};
use crate::queries::{BUILD_TAG, PIPELINE_TAG};

/// Distinct component names. Metrics recorded outside any component
/// carry the empty name, which lists like any other.
pub fn list(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT COMPONENT FROM TEST_METRICS ORDER BY COMPONENT")?;
    let components = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(components)
}

/// Distinct named components. The unassigned (empty) one does not count.
pub fn count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(DISTINCT COMPONENT) FROM TEST_METRICS WHERE COMPONENT != ''",
        [],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Metrics of one component, `None` selecting the unassigned ones.
pub fn metrics(conn: &Connection, component: Option<&str>) -> Result<Metrics> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE COMPONENT = ?1"
    ))?;
    let metrics = stmt
        .query_map([component.unwrap_or_default()], metric_from_row)?
        .collect::<std::result::Result<Metrics, rusqlite::Error>>()?;

    Ok(metrics)
}

/// Pipelines whose sessions produced metrics for one component.
pub fn pipelines(conn: &Connection, component: &str) -> Result<Vec<String>> {
    let query = format!(
        "SELECT DISTINCT CAST(json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) AS PIPELINE \
         FROM TEST_SESSIONS S JOIN TEST_METRICS M ON M.SESSION_H = S.SESSION_H \
         WHERE M.COMPONENT = ?1 \
         AND json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') IS NOT NULL \
         AND CAST(json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) != '' \
         ORDER BY PIPELINE"
    );

    let mut stmt = conn.prepare(&query)?;
    let pipelines = stmt
        .query_map([component], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(pipelines)
}

/// Builds of one pipeline whose sessions produced metrics for one
/// component.
pub fn pipeline_builds(conn: &Connection, component: &str, pipeline: &str) -> Result<Vec<String>> {
    let query = format!(
        "SELECT DISTINCT CAST(json_extract(S.RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) AS BUILD \
         FROM TEST_SESSIONS S JOIN TEST_METRICS M ON M.SESSION_H = S.SESSION_H \
         WHERE M.COMPONENT = ?1 \
         AND CAST(json_extract(S.RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) = ?2 \
         AND json_extract(S.RUN_DESCRIPTION, '{BUILD_TAG}') IS NOT NULL \
         AND CAST(json_extract(S.RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) != '' \
         ORDER BY BUILD"
    );

    let mut stmt = conn.prepare(&query)?;
    let builds = stmt
        .query_map(params![component, pipeline], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(builds)
}
