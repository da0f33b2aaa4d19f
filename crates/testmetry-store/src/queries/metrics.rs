use rusqlite::{Connection, Params, params};
use testmetry_types::{Metrics, Scope};

use crate::Result;
use crate::hydrate::{METRIC_COLUMNS, metric_from_row};

fn fetch(conn: &Connection, query: &str, params: impl Params) -> Result<Metrics> {
    let mut stmt = conn.prepare(query)?;
    let metrics = stmt
        .query_map(params, metric_from_row)?
        .collect::<std::result::Result<Metrics, rusqlite::Error>>()?;
    Ok(metrics)
}

pub fn all(conn: &Connection) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS"),
        [],
    )
}

pub fn by_session(conn: &Connection, session_h: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE SESSION_H = ?1"),
        [session_h],
    )
}

pub fn by_context(conn: &Connection, context_h: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE ENV_H = ?1"),
        [context_h],
    )
}

/// Metrics of every session recorded against one SCM reference.
pub fn by_scm(conn: &Connection, scm_ref: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!(
            "SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE SESSION_H IN \
             (SELECT SESSION_H FROM TEST_SESSIONS WHERE SCM_ID = ?1)"
        ),
        [scm_ref],
    )
}

pub fn by_scope(conn: &Connection, scope: Scope) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE KIND = ?1"),
        [scope.as_str()],
    )
}

pub fn by_item_prefix(conn: &Connection, prefix: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE ITEM LIKE ?1"),
        [format!("{}%", prefix)],
    )
}

pub fn by_variant_prefix(conn: &Connection, prefix: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE ITEM_VARIANT LIKE ?1"),
        [format!("{}%", prefix)],
    )
}

pub fn by_item(conn: &Connection, item: &str) -> Result<Metrics> {
    fetch(
        conn,
        &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE ITEM = ?1"),
        [item],
    )
}

pub fn by_variant(conn: &Connection, variant: &str, component: Option<&str>) -> Result<Metrics> {
    match component {
        Some(component) => fetch(
            conn,
            &format!(
                "SELECT {METRIC_COLUMNS} FROM TEST_METRICS \
                 WHERE ITEM_VARIANT = ?1 AND COMPONENT = ?2"
            ),
            params![variant, component],
        ),
        None => fetch(
            conn,
            &format!("SELECT {METRIC_COLUMNS} FROM TEST_METRICS WHERE ITEM_VARIANT = ?1"),
            [variant],
        ),
    }
}

/// Count metrics, narrowed by the first given scope in session, context,
/// SCM order.
pub fn count(
    conn: &Connection,
    session_h: Option<&str>,
    context_h: Option<&str>,
    scm_ref: Option<&str>,
) -> Result<i64> {
    let count = match (session_h, context_h, scm_ref) {
        (Some(session_h), _, _) => conn.query_row(
            "SELECT COUNT(*) FROM TEST_METRICS WHERE SESSION_H = ?1",
            [session_h],
            |row| row.get(0),
        )?,
        (None, Some(context_h), _) => conn.query_row(
            "SELECT COUNT(*) FROM TEST_METRICS WHERE ENV_H = ?1",
            [context_h],
            |row| row.get(0),
        )?,
        (None, None, Some(scm_ref)) => conn.query_row(
            "SELECT COUNT(*) FROM TEST_METRICS WHERE SESSION_H IN \
             (SELECT SESSION_H FROM TEST_SESSIONS WHERE SCM_ID = ?1)",
            [scm_ref],
            |row| row.get(0),
        )?,
        (None, None, None) => {
            conn.query_row("SELECT COUNT(*) FROM TEST_METRICS", [], |row| row.get(0))?
        }
    };

    Ok(count)
}
