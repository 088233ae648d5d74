//! Idempotent schema creation and the guarded rewrite of the task table.
//!
//! SQLite cannot alter a `CHECK` constraint in place, so when the persisted
//! `tasks` table still carries an older status enumeration the table is
//! rebuilt: the old table is renamed aside, a canonical table is created, the
//! rows are copied through an explicit status remapping table, and the old
//! table is dropped. The rebuild runs inside one immediate transaction with
//! foreign-key enforcement suspended around it. A leftover renamed table
//! from an interrupted run is detected and the rebuild resumes from it.

use super::{Database, StoreError};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::SqliteConnection;
use tracing::{error, info, warn};

/// Name the outdated task table is moved to while it is rebuilt.
pub const LEGACY_TASKS_TABLE: &str = "tasks_legacy";

/// Status constraint carried by an up-to-date task table.
pub const CANONICAL_STATUS_CHECK: &str =
    "CHECK (status IN ('todo', 'in_progress', 'blocked', 'review', 'done'))";

/// Legacy status labels and the canonical label each one is rewritten to.
///
/// Lookups are made against the trimmed, lowercased legacy value. Any label
/// missing from this table becomes `todo`.
pub const LEGACY_STATUS_REMAP: &[(&str, &str)] = &[
    ("todo", "todo"),
    ("open", "todo"),
    ("pending", "todo"),
    ("new", "todo"),
    ("backlog", "todo"),
    ("in_progress", "in_progress"),
    ("in-progress", "in_progress"),
    ("doing", "in_progress"),
    ("active", "in_progress"),
    ("started", "in_progress"),
    ("wip", "in_progress"),
    ("blocked", "blocked"),
    ("on_hold", "blocked"),
    ("waiting", "blocked"),
    ("stuck", "blocked"),
    ("review", "review"),
    ("in_review", "review"),
    ("testing", "review"),
    ("qa", "review"),
    ("done", "done"),
    ("completed", "done"),
    ("closed", "done"),
    ("resolved", "done"),
    ("finished", "done"),
];

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (type IN ('epic', 'task', 'subtask')),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'todo' CHECK (status IN ('todo', 'in_progress', 'blocked', 'review', 'done')),
    code TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const CREATE_TASK_CODE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_code_unique ON tasks (code)";

const CREATE_TASK_LINKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS task_links (
    parent_id INTEGER NOT NULL,
    child_id INTEGER NOT NULL,
    PRIMARY KEY (parent_id, child_id),
    CHECK (parent_id <> child_id)
)";

const CREATE_TASK_LINKS_CHILD_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_task_links_child ON task_links (child_id)";

const CREATE_ARTIFACTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS artifacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('text', 'diagram')),
    category TEXT NOT NULL CHECK (category IN ('requirements', 'use_case_diagram', 'sequence_diagram', 'class_diagram', 'entity_diagram', 'component_diagram', 'activity_diagram')),
    created_at TEXT NOT NULL
)";

const CREATE_ARTIFACT_VERSIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS artifact_versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_id INTEGER NOT NULL REFERENCES artifacts (id) ON DELETE CASCADE,
    version INTEGER NOT NULL CHECK (version >= 1),
    format TEXT NOT NULL CHECK (format IN ('markdown', 'plantuml', 'text')),
    content TEXT NOT NULL,
    render_url TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (artifact_id, version)
)";

const CREATE_ARTIFACT_SOURCES_TABLE: &str = "CREATE TABLE IF NOT EXISTS artifact_sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_id INTEGER NOT NULL REFERENCES artifacts (id) ON DELETE CASCADE,
    source_type TEXT NOT NULL CHECK (source_type IN ('task', 'message', 'manual')),
    source_id INTEGER,
    description TEXT,
    created_at TEXT NOT NULL,
    CHECK ((source_type = 'manual') = (source_id IS NULL))
)";

const CREATE_ARTIFACT_SOURCES_UNIQUE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
    idx_artifact_sources_unique ON artifact_sources (artifact_id, source_type, COALESCE(source_id, 0))";

const CREATE_ARTIFACT_EXPORTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS artifact_exports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_version_id INTEGER NOT NULL REFERENCES artifact_versions (id) ON DELETE CASCADE,
    format TEXT NOT NULL CHECK (format IN ('markdown', 'docx', 'png', 'plantuml')),
    content TEXT,
    location TEXT,
    created_at TEXT NOT NULL,
    CHECK (content IS NOT NULL OR location IS NOT NULL)
)";

const CREATE_ARTIFACT_EXPORTS_VERSION_INDEX: &str = "CREATE INDEX IF NOT EXISTS \
    idx_artifact_exports_version ON artifact_exports (artifact_version_id)";

/// Every idempotent schema statement, in dependency order.
const SCHEMA_STATEMENTS: &[(&str, &str)] = &[
    ("create tasks table", CREATE_TASKS_TABLE),
    ("create task code index", CREATE_TASK_CODE_INDEX),
    ("create task_links table", CREATE_TASK_LINKS_TABLE),
    ("create task_links child index", CREATE_TASK_LINKS_CHILD_INDEX),
    ("create artifacts table", CREATE_ARTIFACTS_TABLE),
    ("create artifact_versions table", CREATE_ARTIFACT_VERSIONS_TABLE),
    ("create artifact_sources table", CREATE_ARTIFACT_SOURCES_TABLE),
    (
        "create artifact_sources unique index",
        CREATE_ARTIFACT_SOURCES_UNIQUE_INDEX,
    ),
    ("create artifact_exports table", CREATE_ARTIFACT_EXPORTS_TABLE),
    (
        "create artifact_exports version index",
        CREATE_ARTIFACT_EXPORTS_VERSION_INDEX,
    ),
];

const CREATE_STATUS_REMAP_TABLE: &str = "DROP TABLE IF EXISTS temp.task_status_remap;
CREATE TEMP TABLE task_status_remap (
    legacy TEXT PRIMARY KEY,
    canonical TEXT NOT NULL
);";

const INSERT_STATUS_REMAP: &str =
    "INSERT INTO temp.task_status_remap (legacy, canonical) VALUES (?, ?)";

/// Copies legacy rows not yet present in the canonical table, so a resumed
/// rebuild does not duplicate rows copied before an interruption. Rows
/// without a code are numbered above every `TASK-` code already present in
/// either table.
const COPY_LEGACY_TASKS: &str = "WITH highest (sequence) AS (
    SELECT COALESCE(MAX(CAST(substr(existing.code, 6) AS INTEGER)), 0)
    FROM (SELECT code FROM main.tasks_legacy UNION ALL SELECT code FROM main.tasks) AS existing
    WHERE existing.code GLOB 'TASK-[0-9]*'
      AND substr(existing.code, 6) NOT GLOB '*[^0-9]*'
)
INSERT INTO main.tasks (id, type, title, description, status, code, created_at)
SELECT legacy.id,
       CASE WHEN lower(trim(legacy.type)) IN ('epic', 'task', 'subtask')
            THEN lower(trim(legacy.type)) ELSE 'task' END,
       COALESCE(legacy.title, ''),
       COALESCE(legacy.description, ''),
       COALESCE(
           (SELECT remap.canonical FROM temp.task_status_remap AS remap
            WHERE remap.legacy = lower(trim(legacy.status))),
           'todo'),
       COALESCE(
           legacy.code,
           'TASK-' || printf('%04d', highest.sequence + ROW_NUMBER() OVER (
               PARTITION BY legacy.code IS NULL ORDER BY legacy.id))),
       COALESCE(legacy.created_at, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
FROM main.tasks_legacy AS legacy CROSS JOIN highest
WHERE legacy.id NOT IN (SELECT id FROM main.tasks)";

/// Outcome of [`SchemaMigrator::ensure_schema`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Whether the task table was rebuilt with the canonical status set.
    pub status_rewritten: bool,
    /// Whether the rebuild resumed from a leftover legacy table.
    pub resumed: bool,
    /// Number of task rows copied by the rebuild.
    pub rows_copied: usize,
}

/// Brings the store schema up to date.
#[derive(Debug, Clone)]
pub struct SchemaMigrator {
    database: Database,
}

impl SchemaMigrator {
    /// Creates a migrator for the given store.
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Creates missing tables and indexes and rebuilds the task table when
    /// its status constraint is outdated. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] naming the failed step, or
    /// [`StoreError::Unavailable`] when no connection can be obtained.
    pub async fn ensure_schema(&self) -> Result<MigrationReport, StoreError> {
        self.database.run_blocking(ensure_schema_on).await
    }
}

#[derive(QueryableByName)]
struct MasterEntry {
    #[diesel(sql_type = Nullable<Text>)]
    sql: Option<String>,
}

fn ensure_schema_on(connection: &mut SqliteConnection) -> Result<MigrationReport, StoreError> {
    let resumed = master_entry(connection, LEGACY_TASKS_TABLE)?.is_some();
    let outdated = master_entry(connection, "tasks")?
        .and_then(|entry| entry.sql)
        .is_some_and(|sql| !has_canonical_status_check(&sql));

    let mut report = MigrationReport {
        resumed,
        ..MigrationReport::default()
    };
    if resumed || outdated {
        warn!(
            resumed,
            "task status constraint is outdated; rebuilding the tasks table"
        );
        report.rows_copied = rewrite_tasks_table(connection)
            .inspect_err(|err| error!(error = %err, "tasks table rebuild failed"))?;
        report.status_rewritten = true;
    }

    for &(step, statement) in SCHEMA_STATEMENTS {
        execute_step(connection, step, statement)?;
    }
    info!(
        status_rewritten = report.status_rewritten,
        "store schema ensured"
    );
    Ok(report)
}

fn rewrite_tasks_table(connection: &mut SqliteConnection) -> Result<usize, StoreError> {
    // The pragma is a no-op inside a transaction, so it brackets it.
    execute_step(connection, "disable foreign keys", "PRAGMA foreign_keys = OFF")?;
    let rewritten = connection.immediate_transaction(rewrite_in_transaction);
    let restored = execute_step(connection, "re-enable foreign keys", "PRAGMA foreign_keys = ON");
    let rows_copied = rewritten?;
    restored?;
    Ok(rows_copied)
}

fn rewrite_in_transaction(connection: &mut SqliteConnection) -> Result<usize, StoreError> {
    if master_entry(connection, LEGACY_TASKS_TABLE)?.is_none() {
        execute_step(
            connection,
            "rename tasks table aside",
            "ALTER TABLE tasks RENAME TO tasks_legacy",
        )?;
    } else if let Some(sql) = master_entry(connection, "tasks")?.and_then(|entry| entry.sql) {
        if !has_canonical_status_check(&sql) {
            return Err(StoreError::migration(
                "resume interrupted rebuild",
                "tasks and tasks_legacy both exist and tasks is not canonical",
            ));
        }
    }

    execute_step(connection, "create canonical tasks table", CREATE_TASKS_TABLE)?;
    execute_step(connection, "create status remap table", CREATE_STATUS_REMAP_TABLE)?;
    for &(legacy, canonical) in LEGACY_STATUS_REMAP {
        diesel::sql_query(INSERT_STATUS_REMAP)
            .bind::<Text, _>(legacy)
            .bind::<Text, _>(canonical)
            .execute(connection)
            .map_err(|err| StoreError::migration("fill status remap table", err))?;
    }

    let rows_copied = diesel::sql_query(COPY_LEGACY_TASKS)
        .execute(connection)
        .map_err(|err| StoreError::migration("copy task rows", err))?;

    execute_step(connection, "drop legacy tasks table", "DROP TABLE tasks_legacy")?;
    execute_step(
        connection,
        "drop status remap table",
        "DROP TABLE temp.task_status_remap",
    )?;
    execute_step(connection, "rebuild task code index", CREATE_TASK_CODE_INDEX)?;
    Ok(rows_copied)
}

fn master_entry(
    connection: &mut SqliteConnection,
    table: &str,
) -> Result<Option<MasterEntry>, StoreError> {
    diesel::sql_query("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?")
        .bind::<Text, _>(table)
        .get_result::<MasterEntry>(connection)
        .optional()
        .map_err(|err| StoreError::migration("inspect schema", err))
}

fn execute_step(
    connection: &mut SqliteConnection,
    step: &'static str,
    statement: &str,
) -> Result<(), StoreError> {
    connection
        .batch_execute(statement)
        .map_err(|err| StoreError::migration(step, err))
}

/// Compares constraint text ignoring whitespace and letter case.
fn has_canonical_status_check(table_sql: &str) -> bool {
    compact(table_sql).contains(&compact(CANONICAL_STATUS_CHECK))
}

fn compact(sql: &str) -> String {
    sql.chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}
