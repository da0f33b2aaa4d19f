use rusqlite::{Connection, OptionalExtension};
use testmetry_types::{Context, Contexts};

use crate::Result;
use crate::hydrate::{CONTEXT_COLUMNS, context_from_row};

pub fn list(conn: &Connection) -> Result<Contexts> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTEXT_COLUMNS} FROM EXECUTION_CONTEXTS"
    ))?;
    let contexts = stmt
        .query_map([], context_from_row)?
        .collect::<std::result::Result<Contexts, rusqlite::Error>>()?;

    Ok(contexts)
}

pub fn get(conn: &Connection, context_h: &str) -> Result<Option<Context>> {
    let context = conn
        .query_row(
            &format!("SELECT {CONTEXT_COLUMNS} FROM EXECUTION_CONTEXTS WHERE ENV_H = ?1"),
            [context_h],
            context_from_row,
        )
        .optional()?;

    Ok(context)
}

pub fn count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM EXECUTION_CONTEXTS", [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
