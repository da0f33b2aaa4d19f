use rusqlite::Connection;

use crate::Result;
use crate::queries::{BUILD_TAG, PIPELINE_TAG};

/// Distinct pipeline names found in session tags. Build numbers and
/// pipeline names are normalized to text so numeric tags list the same
/// as string ones.
pub fn list(conn: &Connection) -> Result<Vec<String>> {
    let query = format!(
        "SELECT DISTINCT CAST(json_extract(RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) AS PIPELINE \
         FROM TEST_SESSIONS \
         WHERE json_extract(RUN_DESCRIPTION, '{PIPELINE_TAG}') IS NOT NULL \
         AND CAST(json_extract(RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) != '' \
         ORDER BY PIPELINE"
    );

    let mut stmt = conn.prepare(&query)?;
    let pipelines = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(pipelines)
}

/// Distinct build numbers of one pipeline.
pub fn builds(conn: &Connection, pipeline: &str) -> Result<Vec<String>> {
    let query = format!(
        "SELECT DISTINCT CAST(json_extract(RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) AS BUILD \
         FROM TEST_SESSIONS \
         WHERE CAST(json_extract(RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) = ?1 \
         AND json_extract(RUN_DESCRIPTION, '{BUILD_TAG}') IS NOT NULL \
         AND CAST(json_extract(RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) != '' \
         ORDER BY BUILD"
    );

    let mut stmt = conn.prepare(&query)?;
    let builds = stmt
        .query_map([pipeline], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(builds)
}
