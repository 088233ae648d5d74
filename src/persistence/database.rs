//! Connection lifecycle for the shared SQLite store.

use super::{SchemaMigrator, StoreError};
use crate::config::StoreConfig;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use tracing::{error, info};

/// SQLite connection pool type shared by every adapter.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Handle to the shared store.
///
/// Cloning is cheap and every clone refers to the same pool. Adapters receive
/// a handle through their constructors; connections are released when the
/// last handle is dropped.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// Pragmas applied to every connection when the pool opens it.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!(
                "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
                self.busy_timeout_ms
            ))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

impl Database {
    /// Builds the connection pool without touching the schema.
    ///
    /// Prefer [`Database::open`] at process start; `connect` exists for
    /// callers that drive [`SchemaMigrator`] themselves.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the pool cannot open its
    /// initial connections.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url());
        let pragmas = ConnectionPragmas {
            busy_timeout_ms: config.busy_timeout_ms(),
        };
        let builder = SqlitePool::builder()
            .max_size(config.max_connections())
            .connection_customizer(Box::new(pragmas));
        // An in-memory database vanishes with its connection, so the single
        // pooled connection must never be reaped.
        let pool = if config.is_in_memory() {
            builder.idle_timeout(None).max_lifetime(None).build(manager)
        } else {
            builder.build(manager)
        }
        .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(Self { pool })
    }

    /// Opens the store and brings its schema up to date.
    ///
    /// No other component should receive the handle before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when no connection can be opened
    /// and [`StoreError::Migration`] when the schema cannot be brought up to
    /// date.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let database = Self::connect(config)?;
        let report = SchemaMigrator::new(database.clone())
            .ensure_schema()
            .await
            .inspect_err(|err| error!(error = %err, "store schema could not be ensured"))?;
        info!(
            database_url = config.database_url(),
            status_rewritten = report.status_rewritten,
            rows_copied = report.rows_copied,
            "store opened"
        );
        Ok(database)
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs a blocking Diesel operation on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or an error converted from
    /// [`StoreError`] when no connection is available or the blocking task
    /// fails.
    pub async fn run_blocking<F, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| E::from(StoreError::Unavailable(err.to_string())))?;
            operation(&mut connection)
        })
        .await
        .map_err(|err| E::from(StoreError::Join(err.to_string())))?
    }
}
