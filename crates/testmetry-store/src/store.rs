use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::Result;

/// Connection handle over a telemetry database file.
///
/// The file is produced by test runners; this crate only ever reads it.
/// Opening a path that does not exist creates an empty database file, as
/// any SQLite connect does, but never creates the telemetry tables. A
/// file without those tables fails every query, which the [`Local`]
/// dialect turns into the unreachable sentinels.
///
/// [`Local`]: crate::Local
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a database file, creating it when missing.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an existing database file without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
