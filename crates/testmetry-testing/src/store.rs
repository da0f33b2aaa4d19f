//! Store fixtures.
//!
//! The read side never creates the telemetry schema, so fixtures write
//! it the way test runners do, then seed it from the canned dataset.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tempfile::TempDir;
use testmetry_types::iso_timestamp;

use crate::dataset;

/// A telemetry database file in a temporary directory. The directory
/// lives as long as the fixture.
pub struct StoreFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl StoreFixture {
    /// Schema plus the canned dataset.
    pub fn seeded() -> Self {
        let fixture = Self::empty();
        let conn = Connection::open(&fixture.path).expect("open fixture db");
        seed(&conn);
        fixture
    }

    /// Schema with no rows: a reachable backend with nothing in it.
    pub fn empty() -> Self {
        let fixture = Self::without_tables();
        let conn = Connection::open(&fixture.path).expect("open fixture db");
        create_tables(&conn);
        fixture
    }

    /// A bare SQLite file without the telemetry tables, which the read
    /// side treats as an unreachable backend.
    pub fn without_tables() -> Self {
        let dir = TempDir::new().expect("create fixture dir");
        let path = dir.path().join("monitor.db");
        Connection::open(&path).expect("create fixture db");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn create_tables(conn: &Connection) {
    // Column order intentionally differs from the read side's SELECT
    // lists; readers must name their columns.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS TEST_SESSIONS (
            SESSION_H varchar(64) primary key not null unique,
            RUN_DATE varchar(64),
            SCM_ID varchar(128),
            RUN_DESCRIPTION json
        );

        CREATE TABLE IF NOT EXISTS EXECUTION_CONTEXTS (
            ENV_H varchar(64) primary key not null unique,
            CPU_COUNT integer,
            CPU_FREQUENCY_MHZ integer,
            CPU_TYPE varchar(64),
            CPU_VENDOR varchar(256),
            RAM_TOTAL_MB integer,
            MACHINE_NODE varchar(512),
            MACHINE_TYPE varchar(256),
            MACHINE_ARCH varchar(16),
            SYSTEM_INFO varchar(256),
            PYTHON_INFO varchar(512)
        );

        CREATE TABLE IF NOT EXISTS TEST_METRICS (
            ITEM_START_TIME varchar(64),
            ITEM_PATH varchar(4096),
            ITEM varchar(2048),
            ITEM_VARIANT varchar(2048),
            ITEM_FS_LOC varchar(2048),
            KIND varchar(64),
            COMPONENT varchar(512) null,
            SESSION_H varchar(64),
            ENV_H varchar(64),
            TOTAL_TIME float,
            USER_TIME float,
            KERNEL_TIME float,
            CPU_USAGE float,
            MEM_USAGE float,
            FOREIGN KEY (ENV_H) REFERENCES EXECUTION_CONTEXTS(ENV_H),
            FOREIGN KEY (SESSION_H) REFERENCES TEST_SESSIONS(SESSION_H)
        );
        "#,
    )
    .expect("create telemetry schema");
}

fn seed(conn: &Connection) {
    for context in dataset::contexts() {
        conn.execute(
            "INSERT INTO EXECUTION_CONTEXTS (ENV_H, CPU_COUNT, CPU_FREQUENCY_MHZ, CPU_TYPE, \
             CPU_VENDOR, RAM_TOTAL_MB, MACHINE_NODE, MACHINE_TYPE, MACHINE_ARCH, SYSTEM_INFO, \
             PYTHON_INFO) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                context.h,
                context.cpu_count,
                context.cpu_freq,
                context.cpu_type,
                context.cpu_vendor,
                context.ram_total,
                context.machine_node,
                context.machine_type,
                context.machine_arch,
                context.sys_info,
                context.py_info,
            ],
        )
        .expect("seed context");
    }

    for session in dataset::sessions() {
        let description = serde_json::to_string(&session.tags).expect("encode tags");
        conn.execute(
            "INSERT INTO TEST_SESSIONS (SESSION_H, RUN_DATE, SCM_ID, RUN_DESCRIPTION) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.h,
                iso_timestamp(&session.run_date),
                session.scm_ref,
                description,
            ],
        )
        .expect("seed session");
    }

    for metric in dataset::metrics() {
        conn.execute(
            "INSERT INTO TEST_METRICS (SESSION_H, ENV_H, ITEM_START_TIME, ITEM_PATH, ITEM, \
             ITEM_VARIANT, ITEM_FS_LOC, KIND, COMPONENT, TOTAL_TIME, USER_TIME, KERNEL_TIME, \
             CPU_USAGE, MEM_USAGE) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, \
             ?13, ?14)",
            params![
                metric.session_h,
                metric.context_h,
                iso_timestamp(&metric.start_time),
                metric.item_path,
                metric.item,
                metric.variant,
                metric.path,
                metric.kind.as_str(),
                metric.component,
                metric.wall_time,
                metric.user_time,
                metric.kernel_time,
                metric.cpu_usage,
                metric.memory_usage,
            ],
        )
        .expect("seed metric");
    }
}
