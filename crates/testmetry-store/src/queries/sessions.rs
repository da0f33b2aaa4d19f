use rusqlite::{Connection, OptionalExtension};
use testmetry_core::TagFilter;
use testmetry_types::{MatchMode, Session, Sessions};

use crate::Result;
use crate::hydrate::{SESSION_COLUMNS, session_from_row};
use crate::queries::{BUILD_TAG, PIPELINE_TAG};

/// List sessions, optionally narrowed by tags.
///
/// Each presence constraint compiles to `json_extract(...) != ''`, which
/// also rejects sessions where the tag is present but empty. Tag names
/// reach the statement as bound JSON paths, never by string splicing.
pub fn list(conn: &Connection, filter: &TagFilter) -> Result<Sessions> {
    let mut query = format!("SELECT {SESSION_COLUMNS} FROM TEST_SESSIONS");
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if !filter.is_empty() {
        let mut conditions = Vec::new();
        for (name, value) in filter.entries() {
            if value.is_empty() {
                conditions.push("json_extract(RUN_DESCRIPTION, ?) != ''");
                params.push(Box::new(format!("$.{}", name)));
            } else {
                conditions.push("json_extract(RUN_DESCRIPTION, ?) = ?");
                params.push(Box::new(format!("$.{}", name)));
                params.push(Box::new(value.to_string()));
            }
        }
        let joiner = match filter.match_mode() {
            MatchMode::All => " AND ",
            MatchMode::Any => " OR ",
        };
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(joiner));
    }

    let mut stmt = conn.prepare(&query)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let sessions = stmt
        .query_map(param_refs.as_slice(), session_from_row)?
        .collect::<std::result::Result<Sessions, rusqlite::Error>>()?;

    Ok(sessions)
}

pub fn get(conn: &Connection, session_h: &str) -> Result<Option<Session>> {
    let session = conn
        .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM TEST_SESSIONS WHERE SESSION_H = ?1"),
            [session_h],
            session_from_row,
        )
        .optional()?;

    Ok(session)
}

/// Sessions tagged as produced by one build of a pipeline.
pub fn from_build(conn: &Connection, pipeline: &str, build: &str) -> Result<Sessions> {
    let query = format!(
        "SELECT {SESSION_COLUMNS} FROM TEST_SESSIONS \
         WHERE CAST(json_extract(RUN_DESCRIPTION, '{PIPELINE_TAG}') AS TEXT) = ?1 \
         AND CAST(json_extract(RUN_DESCRIPTION, '{BUILD_TAG}') AS TEXT) = ?2"
    );

    let mut stmt = conn.prepare(&query)?;
    let sessions = stmt
        .query_map([pipeline, build], session_from_row)?
        .collect::<std::result::Result<Sessions, rusqlite::Error>>()?;

    Ok(sessions)
}

pub fn count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM TEST_SESSIONS", [], |row| row.get(0))?;
    Ok(count)
}
